use crate::app::{App, InputMode};
use crate::omdb::MovieRecord;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Rows taken by everything on the list screen except the movie rows.
pub const LIST_OVERHEAD: u16 = 10;

const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

pub fn render(app: &App, frame: &mut Frame, tick: usize) {
    let area = frame.area();

    // Layout: header(3) + search(3) + genres(1) + list(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let source = if app.is_search_active() { "Search results" } else { "Catalog" };
    let mut header_spans = vec![
        Span::styled(
            " Movie Explorer ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} · {} of {}", source, app.filtered_len(), app.effective_len()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if app.loading() {
        header_spans.push(Span::styled(
            format!("  {} loading…", SPINNER[tick % SPINNER.len()]),
            Style::default().fg(Color::Yellow),
        ));
    }
    let header = Paragraph::new(Line::from(header_spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, chunks[0]);

    // ── Search bar ──
    let search_style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let search_label = if app.input_mode == InputMode::Editing {
        " Title (Enter to search, Esc to cancel): "
    } else {
        " Title (/): "
    };
    let search_bar = Paragraph::new(format!("{}{}", search_label, app.search_term))
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(search_style)
                .title(" Search "),
        );
    frame.render_widget(search_bar, chunks[1]);

    if app.input_mode == InputMode::Editing {
        let cursor_x = chunks[1].x
            + 1
            + search_label.width() as u16
            + app.search_term.width() as u16;
        frame.set_cursor_position((cursor_x.min(chunks[1].right().saturating_sub(2)), chunks[1].y + 1));
    }

    // ── Genre bar ──
    render_genre_bar(app, frame, chunks[2]);

    // ── Movie list ──
    let title_width = (area.width as usize).saturating_sub(40).max(10);
    let items: Vec<ListItem> = app
        .filtered_movies()
        .map(|movie| ListItem::new(movie_line(movie, title_width)))
        .collect();

    let mut list_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Movies ");
    if app.show_scroll_top() {
        list_block = list_block.title_bottom(
            Line::from(Span::styled(
                " ↑ Top (t) ",
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ))
            .alignment(Alignment::Right),
        );
    }

    let list_widget = List::new(items)
        .block(list_block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    // While smooth-scrolling the selection would pin the list, so leave it out
    let selected = if app.is_scrolling() { None } else { Some(app.selected) };
    let mut list_state = ListState::default()
        .with_offset(app.scroll_offset_rows())
        .with_selected(selected);
    frame.render_stateful_widget(list_widget, chunks[3], &mut list_state);

    // ── Status bar ──
    frame.render_widget(Paragraph::new(status_line(app)), chunks[4]);
}

fn render_genre_bar(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled(" Genre [ ]: ", Style::default().fg(Color::DarkGray))];
    for genre in app.genres() {
        let style = if genre == app.genre_filter().as_str() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", genre), style));
    }
    if !app.genres().iter().any(|g| g == app.genre_filter().as_str()) {
        spans.push(Span::styled(
            format!(" {} (not in list) ", app.genre_filter()),
            Style::default().fg(Color::Red),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn movie_line(movie: &MovieRecord, title_width: usize) -> Line<'_> {
    let title = match movie.year.as_deref() {
        Some(year) => format!("{} ({})", movie.display_title(), year),
        None => movie.display_title().to_string(),
    };
    Line::from(vec![
        Span::styled(
            format!("{:<10} ", movie.imdb_id),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(pad_to(&truncate_str(&title, title_width), title_width)),
        Span::styled(
            format!("  ★ {:<4}", movie.imdb_rating.as_deref().unwrap_or("-")),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("  {}", movie.genre.as_deref().unwrap_or("")),
            Style::default().fg(Color::Magenta),
        ),
    ])
}

fn status_line(app: &App) -> Line<'_> {
    if let Some(notice) = app.error() {
        let color = if notice.is_failure() { Color::Red } else { Color::Yellow };
        return Line::from(Span::styled(
            format!(" {}  (h: home)", notice.message()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    let key = |k: &'static str| {
        Span::styled(k, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    };
    Line::from(vec![
        key(" ↑↓"),
        Span::raw(" Navigate  "),
        key("/"),
        Span::raw(" Search  "),
        key("Enter"),
        Span::raw(" Detail  "),
        key("g"),
        Span::raw(" Genres  "),
        key("h"),
        Span::raw(" Home  "),
        key("?"),
        Span::raw(" Help  "),
        key("q"),
        Span::raw(" Quit"),
    ])
}

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        result.push(c);
        used += w;
    }
    result.push('…');
    result
}

fn pad_to(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(pad))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("Heat", 10), "Heat");
        assert_eq!(truncate_str("The Lord of the Rings", 8), "The Lor…");
        assert_eq!(truncate_str("千と千尋の神隠し", 7), "千と千…");
    }

    #[test]
    fn test_pad_to() {
        assert_eq!(pad_to("Up", 4), "Up  ");
        assert_eq!(pad_to("Heat", 2), "Heat");
    }
}
