mod detail;
mod genres;
mod help;
mod list;

pub use list::LIST_OVERHEAD;

use crate::app::{App, Screen};
use ratatui::Frame;

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame, tick: usize) {
    match app.screen {
        Screen::List => list::render(app, frame, tick),
        Screen::Detail => detail::render(app, frame),
    }

    if app.show_genre_picker {
        genres::render(app, frame);
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}
