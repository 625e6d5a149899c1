//! Toolkit-agnostic screen controllers.
//!
//! A controller owns the state of one screen and turns user actions into
//! [`Effect`]s (toasts, field errors, navigation). Whatever renders the
//! screens applies those effects; the controllers never draw anything.

pub mod login;
pub mod profile;

pub use login::{LoginField, LoginScreen, TextField};
pub use profile::{EditDialog, EditableField, MenuItem, ProfileScreen};

use crate::auth::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Profile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Toast(String),
    FieldError(LoginField, ValidationError),
    /// The given email passed authentication or registration.
    SignedIn(String),
    /// Open a screen on top of the current one.
    Push(Screen),
    /// Clear the back stack and open a screen as its only entry.
    ResetTo(Screen),
}

impl Effect {
    pub(crate) fn toast(msg: impl Into<String>) -> Self {
        Effect::Toast(msg.into())
    }
}

/// Back stack of open screens; the last entry is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    stack: Vec<Screen>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            stack: vec![Screen::Login],
        }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Screen {
        // The stack is never empty: `back` refuses to pop the root.
        self.stack.last().copied().unwrap_or(Screen::Login)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn push(&mut self, screen: Screen) {
        self.stack.push(screen);
    }

    pub fn reset_to(&mut self, screen: Screen) {
        self.stack.clear();
        self.stack.push(screen);
    }

    /// Pop the visible screen. Returns `false` when it is the root, which
    /// means the app should exit.
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Apply the navigation part of an effect; other effects are ignored.
    pub fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::Push(screen) => self.push(*screen),
            Effect::ResetTo(screen) => self.reset_to(*screen),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_login() {
        let nav = Navigator::new();
        assert_eq!(nav.current(), Screen::Login);
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn back_returns_to_previous_screen() {
        let mut nav = Navigator::new();
        nav.apply(&Effect::Push(Screen::Profile));
        assert_eq!(nav.current(), Screen::Profile);
        assert!(nav.back());
        assert_eq!(nav.current(), Screen::Login);
        assert!(!nav.back());
        assert_eq!(nav.current(), Screen::Login);
    }

    #[test]
    fn reset_clears_back_stack() {
        let mut nav = Navigator::new();
        nav.push(Screen::Profile);
        nav.apply(&Effect::ResetTo(Screen::Login));
        assert_eq!(nav.depth(), 1);
        assert!(!nav.back());
    }

    #[test]
    fn non_navigation_effects_are_ignored() {
        let mut nav = Navigator::new();
        nav.apply(&Effect::toast("hi"));
        nav.apply(&Effect::SignedIn("a@b.cd".into()));
        assert_eq!(nav, Navigator::new());
    }
}
