//! Event loop and state transitions.
//!
//! Key handling and API results are pure functions over [`AppState`] that return
//! the [`Command`] to run, so they can be tested without a terminal. The loop
//! runs commands as tokio tasks and feeds their results back over a channel;
//! the UI never waits on the network.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::api::{ClientProvider, LoadingState};
use crate::app::keymap::KeyAction;
use crate::app::{ActiveTab, ApiEvent, AppState, Command, InputMode, ModalState, REDIRECT_DELAY};
use crate::search::apply_search;
use crate::ui;

/// Run the TUI until the user quits.
///
/// # Arguments
///
/// * `terminal` - Terminal to draw on; raw mode is the caller's business.
/// * `app` - Application state, mutated in place.
/// * `provider` - Source of API clients for spawned requests.
/// * `runtime` - Handle of the tokio runtime the requests are spawned on.
///
/// # Returns
///
/// `Ok(())` when the user quits, or the first terminal I/O error.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    provider: ClientProvider,
    runtime: &Handle,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        while let Ok(api_event) = rx.try_recv() {
            if let Some(cmd) = apply_api_event(app, api_event) {
                dispatch(cmd, &provider, runtime, &tx);
            }
        }
        if let Some(cmd) = tick(app, Instant::now()) {
            dispatch(cmd, &provider, runtime, &tx);
        }

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match handle_key(app, key) {
                Some(Command::Quit) => break,
                Some(cmd) => dispatch(cmd, &provider, runtime, &tx),
                None => {}
            }
        }
    }

    tracing::info!(uptime_secs = app.started_at.elapsed().as_secs(), "exiting");
    Ok(())
}

/// Spawn the request behind `cmd`. Results arrive on the loop's channel; nothing cancels them.
fn dispatch(
    cmd: Command,
    provider: &ClientProvider,
    runtime: &Handle,
    tx: &UnboundedSender<ApiEvent>,
) {
    let provider = provider.clone();
    let tx = tx.clone();
    match cmd {
        Command::Register(data) => {
            runtime.spawn(async move {
                let res = provider.register(&data).await;
                let _ = tx.send(ApiEvent::Registered(res));
            });
        }
        Command::LoadUsers => {
            runtime.spawn(async move {
                let res = provider.get_users().await;
                let _ = tx.send(ApiEvent::UsersLoaded(res));
            });
        }
        Command::Quit => {}
    }
}

/// Handle one key press.
///
/// # Arguments
///
/// * `app` - Application state.
/// * `key` - The pressed key; Form and search modes read it raw, Normal mode resolves it through the keymap.
///
/// # Returns
///
/// The [`Command`] the key asks for, or `None` when it only changed state.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Option<Command> {
    match app.input_mode {
        InputMode::Modal => {
            handle_modal_key(app, key.code);
            None
        }
        InputMode::SearchUsers => {
            handle_search_key(app, key.code);
            None
        }
        InputMode::Form => handle_form_key(app, key),
        InputMode::Normal => {
            let action = app.keymap.resolve(&key)?;
            handle_action(app, action)
        }
    }
}

fn handle_action(app: &mut AppState, action: KeyAction) -> Option<Command> {
    let on_users = app.active_tab == ActiveTab::Users;
    match action {
        KeyAction::Quit => Some(Command::Quit),
        KeyAction::OpenHelp => {
            app.modal = Some(ModalState::Help { scroll: 0 });
            app.input_mode = InputMode::Modal;
            None
        }
        KeyAction::StartSearch => {
            if on_users {
                app.search_query.clear();
                app.input_mode = InputMode::SearchUsers;
            }
            None
        }
        KeyAction::NextTab => {
            let tab = app.active_tab.next();
            switch_tab(app, tab)
        }
        KeyAction::PrevTab => {
            let tab = app.active_tab.prev();
            switch_tab(app, tab)
        }
        KeyAction::GoHome => switch_tab(app, ActiveTab::Home),
        KeyAction::GoRegister => switch_tab(app, ActiveTab::Register),
        KeyAction::GoUsers => switch_tab(app, ActiveTab::Users),
        KeyAction::Refresh => {
            if on_users {
                start_users_load(app)
            } else {
                None
            }
        }
        KeyAction::NewRegistration => {
            app.register.reset();
            app.active_tab = ActiveTab::Register;
            app.input_mode = InputMode::Form;
            None
        }
        KeyAction::ToggleKeybindsPane => {
            app.show_keybinds = !app.show_keybinds;
            None
        }
        KeyAction::ToggleTheme => {
            app.toggle_theme();
            None
        }
        KeyAction::EnterAction => {
            match app.active_tab {
                ActiveTab::Home => return switch_tab(app, ActiveTab::Register),
                ActiveTab::Register => {
                    if !app.register.is_locked() {
                        app.input_mode = InputMode::Form;
                    }
                }
                ActiveTab::Users => {
                    if let Some(user) = app.users.selected_user() {
                        app.modal = Some(ModalState::Info {
                            message: format!(
                                "{}\n{}\n\nid: {}\ncreated: {}\nupdated: {}",
                                user.name, user.email, user.id, user.created_at, user.updated_at
                            ),
                        });
                        app.input_mode = InputMode::Modal;
                    }
                }
            }
            None
        }
        KeyAction::MoveUp | KeyAction::MoveDown | KeyAction::PageUp | KeyAction::PageDown
            if !on_users =>
        {
            None
        }
        KeyAction::MoveUp => {
            app.users.selected = app.users.selected.saturating_sub(1);
            None
        }
        KeyAction::MoveDown => {
            if app.users.selected + 1 < app.users.users.len() {
                app.users.selected += 1;
            }
            None
        }
        KeyAction::PageUp => {
            app.users.selected = app.users.selected.saturating_sub(app.rows_per_page.max(1));
            None
        }
        KeyAction::PageDown => {
            let new_idx = app.users.selected.saturating_add(app.rows_per_page.max(1));
            app.users.selected = new_idx.min(app.users.users.len().saturating_sub(1));
            None
        }
        KeyAction::Ignore => None,
    }
}

/// Change tab. Every entry into Users reloads the list.
///
/// # Returns
///
/// `Some(Command::LoadUsers)` when entering Users with no listing in flight.
pub fn switch_tab(app: &mut AppState, tab: ActiveTab) -> Option<Command> {
    let entering_users = tab == ActiveTab::Users && app.active_tab != ActiveTab::Users;
    app.active_tab = tab;
    app.input_mode = InputMode::Normal;
    if entering_users {
        return start_users_load(app);
    }
    None
}

/// Mark the users list as loading and request it.
///
/// While a listing is in flight no second request is sent; the reload is
/// remembered and issued once the running one completes.
///
/// # Returns
///
/// `Some(Command::LoadUsers)` to send now, or `None` when the reload was deferred.
pub fn start_users_load(app: &mut AppState) -> Option<Command> {
    if app.users.is_loading() {
        app.users.reload_pending = true;
        return None;
    }
    app.users.status = LoadingState::Loading;
    app.users.error = None;
    Some(Command::LoadUsers)
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    if let Some(ModalState::Help { scroll }) = &mut app.modal {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                *scroll = scroll.saturating_sub(1);
                return;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                *scroll = scroll.saturating_add(1);
                return;
            }
            _ => {}
        }
    }
    if matches!(
        code,
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Backspace
    ) {
        close_modal(app);
    }
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}

fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.search_query.clear();
            apply_search(app);
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            apply_search(app);
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            apply_search(app);
        }
        _ => {}
    }
}

fn handle_form_key(app: &mut AppState, key: KeyEvent) -> Option<Command> {
    let form = &mut app.register;
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
        KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
        KeyCode::Backspace => form.pop_char(),
        KeyCode::Enter => return submit_registration(app),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => form.push_char(c),
        _ => {}
    }
    None
}

/// Validate the form and request registration, or surface the validation message.
///
/// # Returns
///
/// `Some(Command::Register(_))` with the validated payload, or `None` when the
/// form is locked or invalid.
pub fn submit_registration(app: &mut AppState) -> Option<Command> {
    let form = &mut app.register;
    if form.is_locked() {
        return None;
    }
    match form.validate() {
        Ok(data) => {
            form.status = LoadingState::Loading;
            form.error = None;
            app.input_mode = InputMode::Normal;
            Some(Command::Register(data))
        }
        Err(message) => {
            form.status = LoadingState::Error;
            form.error = Some(message);
            None
        }
    }
}

/// Fold a finished API call into the state.
///
/// # Arguments
///
/// * `app` - Application state.
/// * `api_event` - Result of a request spawned earlier.
///
/// # Returns
///
/// `Some(Command::LoadUsers)` when a reload was deferred behind the listing
/// that just completed, otherwise `None`.
pub fn apply_api_event(app: &mut AppState, api_event: ApiEvent) -> Option<Command> {
    match api_event {
        ApiEvent::Registered(Ok(user)) => {
            tracing::info!(id = %user.id, email = %user.email, "user registered");
            let form = &mut app.register;
            form.status = LoadingState::Success;
            form.error = None;
            form.password.clear();
            form.succeeded_at = Some(Instant::now());
        }
        ApiEvent::Registered(Err(err)) => {
            tracing::error!(error = %err, status = ?err.status, "registration failed");
            let form = &mut app.register;
            form.status = LoadingState::Error;
            form.error = Some(non_empty_or(err.message, "Registration failed. Please try again."));
        }
        ApiEvent::UsersLoaded(Ok(users)) => {
            tracing::debug!(count = users.len(), "users loaded");
            app.users.users_all = users;
            app.users.status = LoadingState::Success;
            app.users.error = None;
            app.users.loaded_once = true;
            apply_search(app);
        }
        ApiEvent::UsersLoaded(Err(err)) => {
            tracing::error!(error = %err, status = ?err.status, "loading users failed");
            app.users.status = LoadingState::Error;
            app.users.error = Some(non_empty_or(err.message, "Failed to load users"));
            app.users.loaded_once = true;
        }
    }

    if app.users.reload_pending && !app.users.is_loading() {
        app.users.reload_pending = false;
        return start_users_load(app);
    }
    None
}

/// Time-driven transitions: after a successful registration, move to the Users tab.
///
/// # Arguments
///
/// * `app` - Application state.
/// * `now` - Current instant.
///
/// # Returns
///
/// The reload requested by switching to Users, if one can be sent now.
pub fn tick(app: &mut AppState, now: Instant) -> Option<Command> {
    let since = app.register.succeeded_at?;
    if now.duration_since(since) < REDIRECT_DELAY {
        return None;
    }
    app.register.reset();
    if app.active_tab == ActiveTab::Users {
        return start_users_load(app);
    }
    switch_tab(app, ActiveTab::Users)
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
