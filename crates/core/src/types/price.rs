//! Money display formatting.
//!
//! The backend quotes every amount in US dollars as a plain decimal number.
//! Amounts are carried as [`rust_decimal::Decimal`] end to end; the client
//! only ever formats them for display and never does arithmetic on them.

use rust_decimal::Decimal;

/// Format a dollar amount for display, e.g. `$19.99`.
///
/// Always renders exactly two decimal places, matching how the backend
/// quotes prices and totals.
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    format!("${amount:.2}")
}
