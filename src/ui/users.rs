use chrono::DateTime;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use crate::api::LoadingState;
use crate::app::AppState;

/// `Mon DD, YYYY` for RFC 3339 timestamps; anything else is shown as-is.
pub fn format_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%b %d, %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Users dashboard: count card, list and details, or the loading/error/empty state.
pub fn render_users(f: &mut Frame, area: Rect, app: &mut AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let count = if app.users.is_loading() {
        "...".to_string()
    } else {
        app.users.users_all.len().to_string()
    };
    let filtered = if app.search_query.is_empty() {
        String::new()
    } else {
        format!("   showing {} matching \"{}\"", app.users.users.len(), app.search_query)
    };
    let card = Paragraph::new(format!("Total Users: {count}{filtered}"))
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .title("Users Dashboard")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(card, rows[0]);

    let view = &app.users;
    if view.is_loading() && view.users_all.is_empty() {
        render_message(f, rows[1], app, "Loading users...", None);
        return;
    }
    if view.status == LoadingState::Error {
        let msg = view.error.clone().unwrap_or_default();
        render_message(f, rows[1], app, "Error loading users", Some(format!("{msg}\n\nPress r to try again.")));
        return;
    }
    if view.users_all.is_empty() && view.loaded_once {
        render_message(
            f,
            rows[1],
            app,
            "No users found",
            Some("Get started by registering a new user (press n).".to_string()),
        );
        return;
    }

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);
    render_users_table(f, body[0], app);
    render_user_details(f, body[1], app);
}

fn render_message(f: &mut Frame, area: Rect, app: &AppState, title: &str, detail: Option<String>) {
    let color = if app.users.status == LoadingState::Error {
        app.theme.error
    } else {
        app.theme.text
    };
    let mut text = title.to_string();
    if let Some(detail) = detail {
        text.push_str("\n\n");
        text.push_str(&detail);
    }
    let p = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let view = &app.users;
    let start = (view.selected / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(view.users.len());
    let slice = view.users.get(start..end).unwrap_or_default();

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let style = if start + i == view.selected {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(format_date(&u.created_at)),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Percentage(35),
        Constraint::Percentage(45),
        Constraint::Length(14),
    ];
    let header = Row::new(vec!["NAME", "EMAIL", "JOINED"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );
    let title = if view.is_loading() { "Users (refreshing...)" } else { "Users" };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.users.selected_user() {
        Some(u) => format!(
            "Name: {}\nEmail: {}\nID: {}\nJoined: {}\nUpdated: {}",
            u.name,
            u.email,
            u.id,
            format_date(&u.created_at),
            format_date(&u.updated_at)
        ),
        None => "No user selected".to_string(),
    };
    let p = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::format_date;

    #[test]
    fn formats_iso_timestamps() {
        assert_eq!(format_date("2024-03-09T14:05:00.000Z"), "Mar 09, 2024");
        assert_eq!(format_date("2024-03-09T14:05:00+02:00"), "Mar 09, 2024");
        assert_eq!(format_date("yesterday"), "yesterday");
    }
}
