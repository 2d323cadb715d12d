//! Shared UI components (status bar, key-bindings panel, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::collections::{BTreeMap, BTreeSet};

use crate::api::LoadingState;
use crate::app::keymap::{KeyAction, Keymap};
use crate::app::{AppState, InputMode, ModalState};

fn state_label(state: LoadingState) -> &'static str {
    match state {
        LoadingState::Idle => "idle",
        LoadingState::Loading => "loading",
        LoadingState::Success => "ok",
        LoadingState::Error => "error",
    }
}

/// Render the bottom status bar with mode and request states.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::SearchUsers => "SEARCH",
        InputMode::Form => "EDIT",
        InputMode::Modal => "MODAL",
    };
    let msg = format!(
        "mode: {mode}  users:{} ({})  register:{}  rows/page:{}",
        app.users.users.len(),
        state_label(app.users.status),
        state_label(app.register.status),
        app.rows_per_page,
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Human label for an action, or `None` for actions not listed in the panel.
fn action_label(action: KeyAction) -> Option<(&'static str, &'static str)> {
    let entry = match action {
        KeyAction::Quit => ("General", "Quit"),
        KeyAction::OpenHelp => ("General", "Help"),
        KeyAction::NextTab => ("General", "Next tab"),
        KeyAction::PrevTab => ("General", "Previous tab"),
        KeyAction::GoHome => ("General", "Home"),
        KeyAction::GoRegister => ("General", "Register"),
        KeyAction::GoUsers => ("General", "Users"),
        KeyAction::ToggleKeybindsPane => ("General", "Toggle this panel"),
        KeyAction::ToggleTheme => ("General", "Light / dark theme"),
        KeyAction::NewRegistration => ("Register", "New registration"),
        KeyAction::EnterAction => ("Register", "Edit form / open"),
        KeyAction::Refresh => ("Users", "Refresh / try again"),
        KeyAction::StartSearch => ("Users", "Filter"),
        KeyAction::MoveUp => ("Users", "Move up"),
        KeyAction::MoveDown => ("Users", "Move down"),
        KeyAction::PageUp => ("Users", "Page up"),
        KeyAction::PageDown => ("Users", "Page down"),
        KeyAction::Ignore => return None,
    };
    Some(entry)
}

/// Render the right-side key-bindings viewer grouped by section.
pub fn render_keybinds_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title("Keybindings")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);

    let mut sections: BTreeMap<&'static str, BTreeMap<&'static str, BTreeSet<String>>> =
        BTreeMap::new();
    for ((mods, code), action) in app.keymap.all_bindings() {
        if let Some((section, label)) = action_label(action) {
            let key = match code {
                crossterm::event::KeyCode::BackTab => "Shift+Tab".to_string(),
                _ => Keymap::format_key(mods, code),
            };
            sections
                .entry(section)
                .or_default()
                .entry(label)
                .or_default()
                .insert(key);
        }
    }

    let label_w = sections
        .values()
        .flat_map(|s| s.keys())
        .map(|l| l.len())
        .max()
        .unwrap_or(0)
        .min((inner.width as usize).saturating_sub(8));

    let mut lines: Vec<Line> = Vec::new();
    for (section, entries) in &sections {
        if !lines.is_empty() {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(
            format!("{section}:"),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (label, keys) in entries {
            let label: String = label.chars().take(label_w).collect();
            let joined = keys.iter().cloned().collect::<Vec<_>>().join(", ");
            lines.push(Line::from(vec![
                Span::raw(format!("  {label:>label_w$} │ ")),
                Span::styled(joined, Style::default().add_modifier(Modifier::ITALIC)),
            ]));
        }
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(block, area);
    f.render_widget(p, inner);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        let width = 60u16.min(area.width.saturating_sub(4)).max(30);
        let line_count = message.lines().count() as u16;
        let height = (line_count + 4).min(area.height.saturating_sub(2)).max(5);
        let rect = centered_rect(width, height, area);
        let p = Paragraph::new(message.clone())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Info")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the help modal with usage information and key tips.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 76u16.min(area.width.saturating_sub(4)).max(40);
    let height = 22u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let bold = |s: &'static str| Line::from(Span::styled(s, Style::default().add_modifier(Modifier::BOLD)));
    let tip = |label: &'static str, keys: &'static str| {
        Line::from(vec![
            Span::raw(label),
            Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)),
        ])
    };

    let lines = vec![
        bold("Help"),
        Line::raw(""),
        tip("Switch tab: ", "Tab / Shift+Tab / 1 2 3"),
        tip("Keybindings panel: ", "Shift+K"),
        tip("Light / dark theme: ", "t"),
        tip("Quit: ", "q"),
        Line::raw(""),
        bold("Register"),
        tip("Edit the form: ", "Enter"),
        tip("Next / previous field: ", "Tab, Down / Shift+Tab, Up"),
        tip("Submit: ", "Enter (while editing)"),
        tip("Stop editing: ", "Esc"),
        tip("Start over: ", "n"),
        Line::raw(""),
        bold("Users"),
        tip("Move: ", "Up/Down, j/k, PageUp/PageDown"),
        tip("Details of selected user: ", "Enter"),
        tip("Filter by name, email or id: ", "/ (Enter keeps, Esc clears)"),
        tip("Refresh / try again: ", "r"),
        Line::raw(""),
        tip("Close help: ", "Esc / Enter"),
    ];

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_clamped_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        let r = centered_rect(40, 4, area);
        assert_eq!(r, Rect::new(0, 3, 20, 4));
    }
}
