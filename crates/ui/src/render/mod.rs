//! Typed view models and their templates.
//!
//! Each screen section has a view-model struct built from wire records
//! (display strings pre-formatted, prices to two decimals) and an askama
//! template that renders it. Templates auto-escape, so server-supplied
//! text can never splice markup into the page.

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod documents;
pub mod orders;
pub mod products;

use askama::Template;

use cornershop_client::types::User;

/// Image shown when a record has no image URL of its own.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.jpg";

/// The persistent header: user info, nav, cart badge.
#[derive(Template)]
#[template(path = "header.html")]
pub struct HeaderTemplate {
    pub user_email: String,
    pub is_admin: bool,
    pub cart_count: u32,
}

impl HeaderTemplate {
    /// Build the header for the signed-in user.
    #[must_use]
    pub fn new(user: &User, cart_count: u32) -> Self {
        Self {
            user_email: user.email.to_string(),
            is_admin: user.role.is_admin(),
            cart_count,
        }
    }
}

/// The login form.
#[derive(Template, Default)]
#[template(path = "login.html")]
pub struct LoginTemplate {}

/// Fall back to the placeholder for records without an image.
pub(crate) fn image_or_placeholder(url: &str) -> String {
    if url.is_empty() {
        PLACEHOLDER_IMAGE.to_owned()
    } else {
        url.to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cornershop_core::{Role, UserId};

    use super::*;

    #[test]
    fn test_header_shows_email_and_badge() {
        let user = User {
            user_id: UserId::new(1),
            email: "a@b.com".parse().unwrap(),
            role: Role::Customer,
            name: None,
            address: None,
        };
        let html = HeaderTemplate::new(&user, 3).render().unwrap();
        assert!(html.contains("a@b.com"));
        assert!(html.contains("cart-count"));
        assert!(html.contains(">3<"));
        // Customers get the store nav, not the admin nav.
        assert!(html.contains("nav-menu"));
        assert!(!html.contains("admin-nav"));
    }

    #[test]
    fn test_header_admin_nav() {
        let user = User {
            user_id: UserId::new(2),
            email: "admin@example.com".parse().unwrap(),
            role: Role::Admin,
            name: None,
            address: None,
        };
        let html = HeaderTemplate::new(&user, 0).render().unwrap();
        assert!(html.contains("admin-nav"));
        assert!(!html.contains("nav-menu"));
    }

    #[test]
    fn test_login_renders_form() {
        let html = LoginTemplate::default().render().unwrap();
        assert!(html.contains("login-form"));
        assert!(html.contains("type=\"password\""));
    }

    #[test]
    fn test_image_fallback() {
        assert_eq!(image_or_placeholder(""), PLACEHOLDER_IMAGE);
        assert_eq!(image_or_placeholder("/img/x.jpg"), "/img/x.jpg");
    }
}
