//! Checkout section: order summary plus the payment form.

use askama::Template;

use cornershop_client::types::Cart;
use cornershop_core::format_usd;

use crate::payment::{PaymentErrors, PaymentField, PaymentMethod};

/// One summary row: `name xN` and its line total.
#[derive(Clone)]
pub struct SummaryLineView {
    pub label: String,
    pub amount: String,
}

/// Display data for the order summary box.
#[derive(Clone)]
pub struct CheckoutSummaryView {
    pub lines: Vec<SummaryLineView>,
    pub total: String,
    pub is_empty: bool,
}

impl From<&Cart> for CheckoutSummaryView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart
                .items
                .iter()
                .map(|item| SummaryLineView {
                    label: format!("{} x{}", item.product_name, item.quantity),
                    amount: format_usd(item.line_total),
                })
                .collect(),
            total: format_usd(cart.total),
            is_empty: cart.is_empty(),
        }
    }
}

impl CheckoutSummaryView {
    /// Summary for a cart that could not be fetched: rendered as empty.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            lines: Vec::new(),
            total: String::new(),
            is_empty: true,
        }
    }
}

/// A payment method option in the form's select.
#[derive(Clone)]
pub struct MethodOptionView {
    pub value: &'static str,
    pub label: &'static str,
}

/// The checkout section. Inline field errors reflect the last failed
/// validation attempt; a fresh render clears them.
#[derive(Template)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub summary: CheckoutSummaryView,
    pub methods: Vec<MethodOptionView>,
    pub card_number_error: bool,
    pub expiry_error: bool,
    pub cvc_error: bool,
}

impl CheckoutTemplate {
    /// Build the section with no inline errors.
    #[must_use]
    pub fn new(summary: CheckoutSummaryView) -> Self {
        Self {
            summary,
            methods: PaymentMethod::ALL
                .iter()
                .map(|m| MethodOptionView {
                    value: m.as_str(),
                    label: m.label(),
                })
                .collect(),
            card_number_error: false,
            expiry_error: false,
            cvc_error: false,
        }
    }

    /// Mark the fields a failed validation flagged.
    #[must_use]
    pub fn with_errors(mut self, errors: &PaymentErrors) -> Self {
        self.card_number_error = errors.contains(PaymentField::CardNumber);
        self.expiry_error = errors.contains(PaymentField::Expiry);
        self.cvc_error = errors.contains(PaymentField::Cvc);
        self
    }
}
