//! View switching with role gating.
//!
//! Six mutually exclusive views; exactly one is current at a time, plus
//! the persistent header rendered alongside whichever is active. There is
//! no history integration and no deep-linking: the only entry points are
//! login (role decides the landing view), nav actions, and logout.

use cornershop_client::types::User;
use thiserror::Error;

/// The six screens of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    Products,
    Cart,
    Checkout,
    Orders,
    Admin,
}

impl View {
    /// Human-readable title, used as the page heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Sign In",
            Self::Products => "Products",
            Self::Cart => "Your Cart",
            Self::Checkout => "Checkout",
            Self::Orders => "Order History",
            Self::Admin => "Admin Panel",
        }
    }
}

/// Why a navigation request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("Please sign in first")]
    NotSignedIn,
    #[error("Admin access required")]
    AdminOnly,
    #[error("Not available for admin accounts")]
    CustomerOnly,
}

/// Tracks the visible view and the signed-in user.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    current: Option<ViewSession>,
}

#[derive(Debug, Clone)]
struct ViewSession {
    view: View,
    user: User,
}

impl ViewState {
    /// Fresh state: login view, nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently visible view.
    #[must_use]
    pub fn current(&self) -> View {
        self.current
            .as_ref()
            .map_or(View::Login, |session| session.view)
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|session| &session.user)
    }

    /// Successful login: land on the role's main view.
    pub fn enter(&mut self, user: User) -> View {
        let view = if user.role.is_admin() {
            View::Admin
        } else {
            View::Products
        };
        self.current = Some(ViewSession { view, user });
        view
    }

    /// Whether a nav action to `target` would be allowed, without moving.
    ///
    /// `View::Login` is never a nav target (only logout returns there).
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] when the target is not available to the
    /// current user.
    pub fn check(&self, target: View) -> Result<View, NavError> {
        let Some(session) = self.current.as_ref() else {
            return Err(NavError::NotSignedIn);
        };

        let is_admin = session.user.role.is_admin();
        match target {
            View::Login => Err(NavError::NotSignedIn),
            View::Admin if !is_admin => Err(NavError::AdminOnly),
            View::Products | View::Cart | View::Checkout if is_admin => {
                Err(NavError::CustomerOnly)
            }
            _ => Ok(target),
        }
    }

    /// A nav action: [`Self::check`], then switch.
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] when the target is not available to the
    /// current user.
    pub fn navigate(&mut self, target: View) -> Result<View, NavError> {
        self.check(target)?;
        if let Some(session) = self.current.as_mut() {
            session.view = target;
        }
        Ok(target)
    }

    /// Logout: clear the user and return to the login view.
    pub fn sign_out(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cornershop_core::{Role, UserId};

    use super::*;

    fn user(role: Role) -> User {
        User {
            user_id: UserId::new(1),
            email: "someone@example.com".parse().unwrap(),
            role,
            name: None,
            address: None,
        }
    }

    #[test]
    fn test_starts_on_login() {
        let state = ViewState::new();
        assert_eq!(state.current(), View::Login);
        assert!(state.user().is_none());
    }

    #[test]
    fn test_customer_lands_on_products() {
        let mut state = ViewState::new();
        assert_eq!(state.enter(user(Role::Customer)), View::Products);
        assert_eq!(state.current(), View::Products);
    }

    #[test]
    fn test_admin_lands_on_admin_panel() {
        let mut state = ViewState::new();
        assert_eq!(state.enter(user(Role::Admin)), View::Admin);
    }

    #[test]
    fn test_navigation_requires_sign_in() {
        let mut state = ViewState::new();
        assert_eq!(state.navigate(View::Products), Err(NavError::NotSignedIn));
    }

    #[test]
    fn test_customer_cannot_open_admin_panel() {
        let mut state = ViewState::new();
        state.enter(user(Role::Customer));
        assert_eq!(state.navigate(View::Admin), Err(NavError::AdminOnly));
        // Refused navigation leaves the view unchanged.
        assert_eq!(state.current(), View::Products);
    }

    #[test]
    fn test_admin_cannot_browse_store_views() {
        let mut state = ViewState::new();
        state.enter(user(Role::Admin));
        assert_eq!(state.navigate(View::Cart), Err(NavError::CustomerOnly));
        assert_eq!(state.navigate(View::Orders), Ok(View::Orders));
    }

    #[test]
    fn test_customer_nav_cycle() {
        let mut state = ViewState::new();
        state.enter(user(Role::Customer));
        for target in [View::Cart, View::Checkout, View::Orders, View::Products] {
            assert_eq!(state.navigate(target), Ok(target));
            assert_eq!(state.current(), target);
        }
    }

    #[test]
    fn test_login_is_not_a_nav_target() {
        let mut state = ViewState::new();
        state.enter(user(Role::Customer));
        assert!(state.navigate(View::Login).is_err());
    }

    #[test]
    fn test_sign_out_resets_everything() {
        let mut state = ViewState::new();
        state.enter(user(Role::Admin));
        state.sign_out();
        assert_eq!(state.current(), View::Login);
        assert!(state.user().is_none());
    }
}
