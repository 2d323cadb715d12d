pub mod components;
pub mod home;
pub mod register;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{ActiveTab, AppState, InputMode, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());
    let (main, side) = if app.show_keybinds {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(44)])
            .split(root[1]);
        (cols[0], Some(cols[1]))
    } else {
        (root[1], None)
    };

    render_header(f, root[0], app);

    match app.active_tab {
        ActiveTab::Home => home::render_home(f, main, app),
        ActiveTab::Register => register::render_register(f, main, app),
        ActiveTab::Users => users::render_users(f, main, app),
    }

    if let Some(side) = side {
        components::render_keybinds_panel(f, side, app);
    }
    components::render_status_bar(f, root[2], app);

    let area = f.area();
    match app.modal.clone() {
        Some(ModalState::Help { scroll }) => components::render_help_modal(f, area, app, scroll),
        Some(state @ ModalState::Info { .. }) => components::render_info_modal(f, area, app, &state),
        None => {}
    }
}

fn render_header(f: &mut Frame, area: ratatui::layout::Rect, app: &AppState) {
    let tab = |label: &'static str, tab: ActiveTab| {
        if app.active_tab == tab {
            Span::styled(
                format!("[{label}]"),
                Style::default()
                    .fg(app.theme.highlight_fg)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::raw(format!(" {label} "))
        }
    };
    let mut spans = vec![
        tab("1 Home", ActiveTab::Home),
        Span::raw(" "),
        tab("2 Register", ActiveTab::Register),
        Span::raw(" "),
        tab("3 Users", ActiveTab::Users),
    ];
    if app.input_mode == InputMode::SearchUsers {
        spans.push(Span::raw(format!("   Search users: {}_", app.search_query)));
    } else {
        spans.push(Span::styled(
            "   Tab: switch; ?: help; q: quit",
            Style::default().fg(app.theme.muted),
        ));
    }
    let p = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .title(format!("userdesk @ {}", app.api_url))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}
