//! Newtype IDs for type-safe entity references.
//!
//! The backend hands out small integer IDs for users, products, orders and
//! payments. Wrapping each in its own type keeps an `OrderId` from being
//! passed where a `ProductId` belongs.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper around `i32`.
///
/// # Example
///
/// ```rust
/// # use cornershop_core::define_id;
/// define_id!(WidgetId);
///
/// let id = WidgetId::new(7);
/// assert_eq!(id.as_i32(), 7);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.parse::<i32>().map(Self)
            }
        }
    };
}

// Entity IDs handed out by the backend
define_id!(UserId);
define_id!(ProductId);
define_id!(OrderId);
define_id!(PaymentId);

/// Opaque session token issued at login.
///
/// The backend treats this as a bare bearer token sent as a `session_id`
/// query parameter on every authenticated call. The client never inspects
/// its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a raw token string.
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    /// The raw token, for query parameters.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for SessionId {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for SessionId {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct_types() {
        let user = UserId::new(1);
        let product = ProductId::new(1);
        // Same value, different types; equality only within a type.
        assert_eq!(user.as_i32(), product.as_i32());
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = OrderId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let back: OrderId = serde_json::from_str("42").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_from_str() {
        let id: ProductId = "7".parse().unwrap();
        assert_eq!(id, ProductId::new(7));
        assert!("seven".parse::<ProductId>().is_err());
    }

    #[test]
    fn test_session_id_round_trip() {
        let sid = SessionId::from("session_1");
        assert_eq!(sid.as_str(), "session_1");
        assert_eq!(serde_json::to_string(&sid).unwrap(), "\"session_1\"");
    }
}
