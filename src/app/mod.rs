//! Application state types and entry glue.
//!
//! Defines enums and structs that model the TUI state, the commands the state
//! machine asks the runtime to perform, and the API events fed back into it.
//! The event loop itself lives in [`update`] (re-exported as `run`).
//!
pub mod keymap;
pub mod register;
pub mod update;

use ratatui::style::Color;
use std::time::{Duration, Instant};

use crate::api::{ApiError, LoadingState, RegisterData, User};
use register::RegisterForm;

/// How long the registration success banner stays before switching to Users.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// Top-level active tab in the UI.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActiveTab {
    Home,
    Register,
    Users,
}

impl ActiveTab {
    pub fn next(self) -> Self {
        match self {
            Self::Home => Self::Register,
            Self::Register => Self::Users,
            Self::Users => Self::Home,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Home => Self::Users,
            Self::Register => Self::Home,
            Self::Users => Self::Register,
        }
    }
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    SearchUsers,
    Form,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0x89, 0xb4, 0xfa),        // blue
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    /// Catppuccin Latte, the light counterpart of `mocha`.
    pub fn latte() -> Self {
        Self {
            text: Color::Rgb(0x4c, 0x4f, 0x69),         // text
            muted: Color::Rgb(0x8c, 0x8f, 0xa1),        // overlay1
            title: Color::Rgb(0x1e, 0x66, 0xf5),        // blue
            border: Color::Rgb(0xac, 0xb0, 0xbe),       // surface2
            header_bg: Color::Rgb(0xcc, 0xd0, 0xda),    // surface0
            header_fg: Color::Rgb(0x72, 0x87, 0xfd),    // lavender
            status_bg: Color::Rgb(0xbc, 0xc0, 0xcc),    // surface1
            status_fg: Color::Rgb(0x4c, 0x4f, 0x69),    // text
            highlight_fg: Color::Rgb(0xdf, 0x8e, 0x1d), // yellow
            highlight_bg: Color::Rgb(0xbc, 0xc0, 0xcc), // surface1
            success: Color::Rgb(0x40, 0xa0, 0x2b),      // green
            error: Color::Rgb(0xd2, 0x0f, 0x39),        // red
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let (key, val) = (key.trim(), val.trim());
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "muted" => theme.muted = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "success" => theme.success = color,
                    "error" => theme.error = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userdesk theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{r:02X}{g:02X}{b:02X}"),
                Color::Reset => "reset".to_string(),
                // Named colors get a best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(_) => "reset".to_string(),
            }
        }

        for (k, v) in [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
            ("success", self.success),
            ("error", self.error),
        ] {
            let _ = writeln!(&mut buf, "{k} = {}", color_to_str(v));
        }

        std::fs::write(path, buf)
    }

    /// Load the theme at `path`, writing the `mocha` defaults there first if it is missing.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default theme");
        }
        t
    }
}

/// Modal dialogs layered over the active tab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Help { scroll: u16 },
    Info { message: String },
}

/// Users dashboard state.
#[derive(Clone, Debug, Default)]
pub struct UsersView {
    pub users_all: Vec<User>,
    pub users: Vec<User>,
    pub selected: usize,
    pub status: LoadingState,
    pub error: Option<String>,
    /// At least one listing has completed; gates the empty-state message.
    pub loaded_once: bool,
    /// A reload was asked for while a listing was in flight.
    pub reload_pending: bool,
}

impl UsersView {
    pub fn selected_user(&self) -> Option<&User> {
        self.users.get(self.selected)
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadingState::Loading
    }
}

/// Side effects the state machine asks the runtime to perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Register(RegisterData),
    LoadUsers,
}

/// Completed API calls, delivered back to the UI thread.
#[derive(Debug)]
pub enum ApiEvent {
    Registered(Result<User, ApiError>),
    UsersLoaded(Result<Vec<User>, ApiError>),
}

pub struct AppState {
    pub started_at: Instant,
    pub api_url: String,
    pub active_tab: ActiveTab,
    pub input_mode: InputMode,
    pub search_query: String,
    pub rows_per_page: usize,
    pub theme: Theme,
    /// Palette swapped in by the theme toggle.
    pub alt_theme: Theme,
    pub keymap: keymap::Keymap,
    pub modal: Option<ModalState>,
    pub show_keybinds: bool,
    pub register: RegisterForm,
    pub users: UsersView,
}

impl AppState {
    /// Fresh state for a backend at `api_url`.
    ///
    /// # Arguments
    ///
    /// * `api_url` - Base URL shown in the header and on the Home tab.
    /// * `theme` - Configured palette; the light `latte` palette is the toggle alternate.
    /// * `keymap` - Key bindings for Normal mode.
    pub fn new(api_url: impl Into<String>, theme: Theme, keymap: keymap::Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            api_url: api_url.into(),
            active_tab: ActiveTab::Home,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            rows_per_page: 10,
            theme,
            alt_theme: Theme::latte(),
            keymap,
            modal: None,
            show_keybinds: false,
            register: RegisterForm::default(),
            users: UsersView::default(),
        }
    }

    /// Swap the active palette with the alternate one.
    pub fn toggle_theme(&mut self) {
        std::mem::swap(&mut self.theme, &mut self.alt_theme);
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_cycle_both_ways() {
        let mut tab = ActiveTab::Home;
        for _ in 0..3 {
            tab = tab.next();
        }
        assert_eq!(tab, ActiveTab::Home);
        assert_eq!(ActiveTab::Home.prev(), ActiveTab::Users);
    }

    #[test]
    fn parse_color_rejects_malformed_values() {
        assert_eq!(Theme::parse_color("#A6E3A1"), Some(Color::Rgb(0xa6, 0xe3, 0xa1)));
        assert_eq!(Theme::parse_color("reset"), Some(Color::Reset));
        assert_eq!(Theme::parse_color("#12345"), None);
        assert_eq!(Theme::parse_color("zzzzzz"), None);
    }
}
