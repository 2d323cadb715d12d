use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::api::LoadingState;
use crate::app::register::RegisterField;
use crate::app::{AppState, InputMode};

/// Registration form with its status banner.
pub fn render_register(f: &mut Frame, area: Rect, app: &AppState) {
    let form = &app.register;
    let editing = app.input_mode == InputMode::Form;

    let outer = Block::default()
        .title("Create an Account")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let card = crate::ui::components::centered_rect(60, 16, inner);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(card);
    f.render_widget(Clear, card);

    let banner = match (form.status, form.error.as_deref()) {
        (LoadingState::Success, _) => Some((
            "Registration successful! Redirecting...".to_string(),
            app.theme.success,
        )),
        (LoadingState::Error, Some(msg)) if !msg.is_empty() => Some((msg.to_string(), app.theme.error)),
        _ => None,
    };
    if let Some((text, color)) = banner {
        let p = Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
        f.render_widget(p, rows[0]);
    } else {
        let hint = if editing {
            "Tab/Up/Down: field  Enter: submit  Esc: stop editing"
        } else {
            "Enter: edit form  n: new registration"
        };
        f.render_widget(
            Paragraph::new(hint).style(Style::default().fg(app.theme.muted)),
            rows[0],
        );
    }

    let masked = "*".repeat(form.password.chars().count());
    let fields = [
        ("Full Name", form.name.as_str(), RegisterField::Name),
        ("Email Address", form.email.as_str(), RegisterField::Email),
        ("Password", masked.as_str(), RegisterField::Password),
    ];
    for (i, (label, value, field)) in fields.into_iter().enumerate() {
        let focused = editing && form.focus == field;
        let border = if focused { app.theme.highlight_fg } else { app.theme.border };
        let cursor = if focused { "_" } else { "" };
        let p = Paragraph::new(format!("{value}{cursor}"))
            .style(Style::default().fg(if form.is_locked() { app.theme.muted } else { app.theme.text }))
            .block(
                Block::default()
                    .title(label)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            );
        f.render_widget(p, rows[i + 1]);
    }

    let button = match form.status {
        LoadingState::Success => "Success!",
        LoadingState::Loading => "Creating Account...",
        LoadingState::Idle | LoadingState::Error => "Create Account",
    };
    let p = Paragraph::new(Line::from(Span::styled(
        format!("[ {button} ]"),
        Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
    )));
    f.render_widget(p, rows[4]);
}
