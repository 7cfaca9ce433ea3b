use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Footer shown under the overlay. Any key closes it.
const FOOTER: &str = " Press any key to close ";

pub fn render(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let help_text = help_lines();

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help · Keybindings ")
                .title_bottom(Line::from(FOOTER).style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}

fn help_lines() -> Vec<Line<'static>> {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
    };
    let binding = |keys: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(keys, Style::default().fg(Color::Yellow)),
            Span::raw(action),
        ])
    };

    vec![
        Line::from(""),
        section("  Global"),
        binding("    ?         ", "Toggle this help"),
        binding("    Ctrl+C    ", "Quit application"),
        Line::from(""),
        section("  List View"),
        binding("    ↑/k ↓/j   ", "Navigate up/down"),
        binding("    PgUp/PgDn ", "Move a page up/down"),
        binding("    Enter     ", "Open movie detail"),
        binding("    /         ", "Edit the search term, Enter to search"),
        binding("    g         ", "Pick a genre"),
        binding("    [ / ]     ", "Previous/next genre"),
        binding("    t         ", "Scroll back to the top"),
        binding("    G         ", "Jump to the last movie"),
        binding("    h / Home  ", "Back to the catalog (clears search and genre)"),
        binding("    q         ", "Quit application"),
        Line::from(""),
        section("  Genre Picker"),
        binding("    ↑/k ↓/j   ", "Move between genres"),
        binding("    Enter     ", "Apply the highlighted genre"),
        binding("    Esc/g/q   ", "Close the picker"),
        Line::from(""),
        section("  Detail View"),
        binding("    ↑/k ↓/j   ", "Scroll content"),
        binding("    h / Home  ", "Back to the catalog"),
        binding("    Esc/q     ", "Back to the list"),
        Line::from(""),
    ]
}

/// Create a centered rectangle using percentage of parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
