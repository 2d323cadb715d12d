//! Registration form state and client-side validation.
//!
//! The API client performs no validation of its own; this form checks fields in
//! a fixed order and reports the first problem only.

use std::time::Instant;

use crate::api::{LoadingState, RegisterData};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Which input of the form has focus.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RegisterField {
    #[default]
    Name,
    Email,
    Password,
}

impl RegisterField {
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Email => Self::Password,
            Self::Password => Self::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Name => Self::Password,
            Self::Email => Self::Name,
            Self::Password => Self::Email,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub focus: RegisterField,
    pub status: LoadingState,
    pub error: Option<String>,
    /// Set when registration succeeded; drives the delayed switch to the Users tab.
    pub succeeded_at: Option<Instant>,
}

impl RegisterForm {
    /// Inputs are frozen while a request is in flight and after success.
    pub fn is_locked(&self) -> bool {
        matches!(self.status, LoadingState::Loading | LoadingState::Success)
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            RegisterField::Name => &mut self.name,
            RegisterField::Email => &mut self.email,
            RegisterField::Password => &mut self.password,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if self.is_locked() {
            return;
        }
        self.focused_mut().push(c);
        self.error = None;
    }

    pub fn pop_char(&mut self) {
        if self.is_locked() {
            return;
        }
        self.focused_mut().pop();
        self.error = None;
    }

    /// Check the fields and build the payload, or return the first validation message.
    pub fn validate(&self) -> Result<RegisterData, String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if self.email.trim().is_empty() {
            return Err("Email is required".to_string());
        }
        if !looks_like_email(&self.email) {
            return Err("Please enter a valid email address".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        // counted in UTF-16 code units
        if self.password.encode_utf16().count() < MIN_PASSWORD_LEN {
            return Err(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters long"
            ));
        }
        Ok(RegisterData {
            email: self.email.clone(),
            name: self.name.clone(),
            password: self.password.clone(),
        })
    }

    /// Clear inputs and status for another registration.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// True when some whitespace-free run contains `x@y.z` with non-empty parts.
pub fn looks_like_email(s: &str) -> bool {
    s.split_whitespace().any(|token| {
        let chars: Vec<char> = token.chars().collect();
        let Some(at) = chars.iter().skip(1).position(|&c| c == '@').map(|i| i + 1) else {
            return false;
        };
        chars
            .iter()
            .enumerate()
            .any(|(i, &c)| c == '.' && i >= at + 2 && i + 1 < chars.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, password: &str) -> RegisterForm {
        RegisterForm {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    #[test]
    fn validation_reports_first_problem() {
        assert_eq!(form(" ", "", "").validate().unwrap_err(), "Name is required");
        assert_eq!(form("Ann", "  ", "").validate().unwrap_err(), "Email is required");
        assert_eq!(
            form("Ann", "ann@example", "secret1").validate().unwrap_err(),
            "Please enter a valid email address"
        );
        assert_eq!(form("Ann", "ann@ex.io", "").validate().unwrap_err(), "Password is required");
        assert_eq!(
            form("Ann", "ann@ex.io", "12345").validate().unwrap_err(),
            "Password must be at least 6 characters long"
        );
        let data = form("Ann", "ann@ex.io", "123456").validate().unwrap();
        assert_eq!(data.email, "ann@ex.io");
    }

    #[test]
    fn password_length_counts_utf16_units() {
        // three astral-plane emoji are six UTF-16 units
        assert!(form("Ann", "ann@ex.io", "\u{1F600}\u{1F600}\u{1F600}").validate().is_ok());
        assert_eq!(
            form("Ann", "ann@ex.io", "\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}").validate().unwrap_err(),
            "Password must be at least 6 characters long"
        );
    }

    #[test]
    fn email_heuristic() {
        assert!(looks_like_email("a@b.c"));
        assert!(looks_like_email("first.last@sub.example.org"));
        assert!(looks_like_email("junk a@b.c"));
        assert!(looks_like_email("a@@b.c"));
        assert!(!looks_like_email("@b.c"));
        assert!(!looks_like_email("a@.c"));
        assert!(!looks_like_email("a@b."));
        assert!(!looks_like_email("a @b.c"));
    }

    #[test]
    fn typing_clears_error_unless_locked() {
        let mut f = form("", "", "");
        f.error = Some("Name is required".into());
        f.push_char('A');
        assert_eq!(f.name, "A");
        assert!(f.error.is_none());

        f.status = LoadingState::Loading;
        f.push_char('x');
        assert_eq!(f.name, "A");
    }
}
