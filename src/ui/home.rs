use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::AppState;

/// Landing screen with the backend address and the main shortcuts.
pub fn render_home(f: &mut Frame, area: Rect, app: &AppState) {
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::BOLD),
        )
    };
    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            "User Management",
            Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Register new accounts and browse everyone already signed up.",
            Style::default().fg(app.theme.muted),
        )),
        Line::raw(""),
        Line::from(vec![Span::raw("Backend: "), Span::raw(app.api_url.clone())]),
        Line::raw(""),
        Line::from(vec![key("Enter"), Span::raw(" / "), key("2"), Span::raw("  Create an account")]),
        Line::from(vec![key("3"), Span::raw("  View the users dashboard")]),
        Line::from(vec![key("?"), Span::raw("  Help")]),
    ];
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Home")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}
