use super::help::centered_rect;
use crate::app::App;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

/// Genre picker popup over the list screen.
pub fn render(app: &App, frame: &mut Frame) {
    let area = centered_rect(40, 60, frame.area());
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = app
        .genres()
        .iter()
        .map(|genre| {
            let marker = if genre == app.genre_filter().as_str() { "● " } else { "  " };
            ListItem::new(format!("{}{}", marker, genre))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Genre ")
                .title_bottom(
                    Line::from(" Enter select · Esc close ").style(Style::default().fg(Color::DarkGray)),
                ),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = ListState::default().with_selected(Some(app.genre_cursor));
    frame.render_stateful_widget(list, area, &mut state);
}
