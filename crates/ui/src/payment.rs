//! Checkout payment input: masking, validation, and details synthesis.
//!
//! Three client-side guards run before any checkout request leaves the
//! machine: the card number must be exactly 16 digits, the expiry must be
//! `MM/YYYY` with a month of 01-12, and the CVC exactly 3 digits. Inputs
//! are masked the way the original form masked keystrokes (digits only,
//! truncated, slash auto-inserted), so validation always sees the masked
//! shape. Failure blocks submission entirely; there is no partial send.

use std::sync::LazyLock;

use regex::Regex;

static CARD_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{16}$").expect("valid card number regex"));
static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{4}$").expect("valid expiry regex"));
static CVC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}$").expect("valid cvc regex"));

/// Payment methods the backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Wallet,
    Bank,
    Paypal,
}

impl PaymentMethod {
    /// The wire name sent in the checkout form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wallet => "wallet",
            Self::Bank => "bank",
            Self::Paypal => "paypal",
        }
    }

    /// Label shown in the payment method select.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Wallet => "Digital Wallet",
            Self::Bank => "Bank Debit",
            Self::Paypal => "PayPal",
        }
    }

    /// All methods, in the order the form offers them.
    pub const ALL: [Self; 3] = [Self::Wallet, Self::Bank, Self::Paypal];
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wallet" => Ok(Self::Wallet),
            "bank" => Ok(Self::Bank),
            "paypal" => Ok(Self::Paypal),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// The three validated checkout fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentField {
    CardNumber,
    Expiry,
    Cvc,
}

impl PaymentField {
    /// The rule text shown inline and in the aggregate notice.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::CardNumber => "Invalid card number (16 digits)",
            Self::Expiry => "Invalid expiry date (MM/YYYY)",
            Self::Cvc => "Invalid CVC/CVV2 (3 digits)",
        }
    }
}

/// Every rule a submission attempt violated, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentErrors {
    pub fields: Vec<PaymentField>,
}

impl std::fmt::Display for PaymentErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.aggregate_message())
    }
}

impl std::error::Error for PaymentErrors {}

impl PaymentErrors {
    /// Whether a specific field failed.
    #[must_use]
    pub fn contains(&self, field: PaymentField) -> bool {
        self.fields.contains(&field)
    }

    /// The aggregate notice listing every violated rule.
    #[must_use]
    pub fn aggregate_message(&self) -> String {
        let reasons: Vec<&str> = self.fields.iter().map(|f| f.message()).collect();
        format!("Some payment fields are invalid: {}", reasons.join(", "))
    }
}

/// Keep only digits, truncated to `max` characters.
fn digits(input: &str, max: usize) -> String {
    input.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Mask a card number: digits only, at most 16.
#[must_use]
pub fn mask_card_number(input: &str) -> String {
    digits(input, 16)
}

/// Mask an expiry: digits only, at most 6, with `/` auto-inserted after
/// the month once a third digit is typed.
#[must_use]
pub fn mask_expiry(input: &str) -> String {
    let raw = digits(input, 6);
    if raw.len() >= 3 {
        let (month, year) = raw.split_at(2);
        format!("{month}/{year}")
    } else {
        raw
    }
}

/// Mask a CVC: digits only, at most 3.
#[must_use]
pub fn mask_cvc(input: &str) -> String {
    digits(input, 3)
}

/// Raw card fields from the checkout form.
#[derive(Debug, Clone, Default)]
pub struct CardDetails {
    pub number: String,
    pub expiry: String,
    pub cvc: String,
}

impl CardDetails {
    /// The fields as the live-masked inputs would hold them.
    #[must_use]
    pub fn masked(&self) -> Self {
        Self {
            number: mask_card_number(&self.number),
            expiry: mask_expiry(&self.expiry),
            cvc: mask_cvc(&self.cvc),
        }
    }

    /// Run all three guards against the masked fields.
    ///
    /// # Errors
    ///
    /// Returns every violated rule; submission must not proceed on `Err`.
    pub fn validate(&self) -> Result<(), PaymentErrors> {
        let masked = self.masked();
        let mut fields = Vec::new();
        if !CARD_NUMBER_RE.is_match(&masked.number) {
            fields.push(PaymentField::CardNumber);
        }
        if !EXPIRY_RE.is_match(&masked.expiry) {
            fields.push(PaymentField::Expiry);
        }
        if !CVC_RE.is_match(&masked.cvc) {
            fields.push(PaymentField::Cvc);
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(PaymentErrors { fields })
        }
    }

    /// Synthesized `payment_details` value: `Card ****<last4>`, or just
    /// `Card` when no digits were entered.
    #[must_use]
    pub fn payment_details(&self) -> String {
        let number = mask_card_number(&self.number);
        if number.is_empty() {
            "Card".to_owned()
        } else {
            let last4_start = number.len().saturating_sub(4);
            format!("Card ****{}", &number[last4_start..])
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn card(number: &str, expiry: &str, cvc: &str) -> CardDetails {
        CardDetails {
            number: number.to_owned(),
            expiry: expiry.to_owned(),
            cvc: cvc.to_owned(),
        }
    }

    #[test]
    fn test_mask_card_number_strips_and_truncates() {
        assert_eq!(mask_card_number("4111-1111 1111 1111"), "4111111111111111");
        assert_eq!(mask_card_number("41111111111111112222"), "4111111111111111");
        assert_eq!(mask_card_number("abc"), "");
    }

    #[test]
    fn test_mask_expiry_inserts_slash() {
        assert_eq!(mask_expiry("0"), "0");
        assert_eq!(mask_expiry("08"), "08");
        assert_eq!(mask_expiry("082"), "08/2");
        assert_eq!(mask_expiry("082026"), "08/2026");
        assert_eq!(mask_expiry("08/2026"), "08/2026");
        assert_eq!(mask_expiry("08202699"), "08/2026");
    }

    #[test]
    fn test_mask_cvc() {
        assert_eq!(mask_cvc("12x34"), "123");
    }

    #[test]
    fn test_valid_card_passes() {
        assert!(card("4111111111111111", "08/2026", "123").validate().is_ok());
        // Separators in the raw input are masked away before the check.
        assert!(card("4111 1111 1111 1111", "082026", "123").validate().is_ok());
    }

    #[test]
    fn test_card_number_must_be_16_digits() {
        let errors = card("411111111111111", "08/2026", "123")
            .validate()
            .unwrap_err();
        assert_eq!(errors.fields, vec![PaymentField::CardNumber]);
    }

    #[test]
    fn test_expiry_month_range() {
        assert!(card("4111111111111111", "00/2026", "123").validate().is_err());
        assert!(card("4111111111111111", "13/2026", "123").validate().is_err());
        assert!(card("4111111111111111", "01/2026", "123").validate().is_ok());
        assert!(card("4111111111111111", "12/2026", "123").validate().is_ok());
    }

    #[test]
    fn test_cvc_must_be_3_digits() {
        assert!(card("4111111111111111", "08/2026", "12").validate().is_err());
        assert!(card("4111111111111111", "08/2026", "1234").validate().is_ok());
        // 4 raw digits mask down to 3, so the guard passes - same as typing
        // into the original's length-limited input.
    }

    #[test]
    fn test_all_failures_reported_together() {
        let errors = card("", "", "").validate().unwrap_err();
        assert_eq!(
            errors.fields,
            vec![
                PaymentField::CardNumber,
                PaymentField::Expiry,
                PaymentField::Cvc
            ]
        );
        assert_eq!(
            errors.aggregate_message(),
            "Some payment fields are invalid: Invalid card number (16 digits), \
             Invalid expiry date (MM/YYYY), Invalid CVC/CVV2 (3 digits)"
        );
    }

    #[test]
    fn test_payment_details_synthesis() {
        assert_eq!(
            card("4111111111111111", "", "").payment_details(),
            "Card ****1111"
        );
        assert_eq!(card("98", "", "").payment_details(), "Card ****98");
        assert_eq!(card("", "", "").payment_details(), "Card");
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(PaymentMethod::Wallet.as_str(), "wallet");
        assert_eq!("paypal".parse::<PaymentMethod>().unwrap(), PaymentMethod::Paypal);
        assert!("cash".parse::<PaymentMethod>().is_err());
    }
}
