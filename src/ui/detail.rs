use crate::app::App;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use serde_json::Value;

/// Extra OMDb fields worth showing when present.
const EXTRA_FIELDS: [&str; 8] = [
    "Rated", "Released", "Writer", "Language", "Country", "Awards", "BoxOffice", "Metascore",
];

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let movie = match app.selected_movie() {
        Some(m) => m,
        None => return,
    };

    // Layout: header(5) + content(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let label = |s: &'static str| Span::styled(s, Style::default().fg(Color::DarkGray));
    let na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());

    // ── Metadata header ──
    let meta_lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {}", movie.display_title()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  ({})", na(&movie.year)), Style::default().fg(Color::Gray)),
            Span::raw("   "),
            label("IMDb: "),
            Span::styled(&movie.imdb_id, Style::default().fg(Color::Cyan)),
            Span::raw("   "),
            label("Rating: "),
            Span::styled(na(&movie.imdb_rating), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![
            label(" Genre: "),
            Span::styled(na(&movie.genre), Style::default().fg(Color::Magenta)),
            Span::raw("   "),
            label("Runtime: "),
            Span::raw(na(&movie.runtime)),
        ]),
        Line::from(vec![
            label(" Director: "),
            Span::raw(na(&movie.director)),
        ]),
    ];
    let meta_block = Paragraph::new(meta_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Movie Detail "),
    );
    frame.render_widget(meta_block, chunks[0]);

    // ── Content area ──
    let mut content = vec![
        Line::from(label("Plot")),
        Line::from(na(&movie.plot)),
        Line::from(""),
        Line::from(vec![label("Actors: "), Span::raw(na(&movie.actors))]),
    ];
    for field in EXTRA_FIELDS {
        if let Some(Value::String(v)) = movie.extra.get(field) {
            content.push(Line::from(vec![
                Span::styled(format!("{}: ", field), Style::default().fg(Color::DarkGray)),
                Span::raw(v.clone()),
            ]));
        }
    }
    if let Some(Value::Array(ratings)) = movie.extra.get("Ratings") {
        content.push(Line::from(""));
        content.push(Line::from(label("Ratings")));
        for rating in ratings {
            let source = rating.get("Source").and_then(Value::as_str).unwrap_or("?");
            let value = rating.get("Value").and_then(Value::as_str).unwrap_or("?");
            content.push(Line::from(format!("  {:<26} {}", source, value)));
        }
    }
    if let Some(poster) = movie.poster.as_deref().filter(|p| *p != "N/A") {
        content.push(Line::from(""));
        content.push(Line::from(vec![
            label("Poster: "),
            Span::styled(poster, Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED)),
        ]));
    }

    let body = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title_bottom(
                    Line::from(format!(" scroll: {} ", app.detail_scroll))
                        .alignment(Alignment::Right),
                ),
        );
    frame.render_widget(body, chunks[1]);

    // ── Status bar ──
    let status_line = Line::from(vec![
        Span::styled(
            " ↑↓",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Scroll  "),
        Span::styled(
            "Esc",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Back  "),
        Span::styled(
            "h",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Home"),
    ]);
    frame.render_widget(Paragraph::new(status_line), chunks[2]);
}
