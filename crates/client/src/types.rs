//! Wire records for the Cornershop REST API.
//!
//! Every struct here mirrors a JSON payload exactly as the backend emits
//! it. Records are transient: the client deserializes, renders, and throws
//! them away - it never mutates one to derive a new total or status.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cornershop_core::datetime::{wire_date, wire_datetime};
use cornershop_core::{
    Email, InvoiceStatus, OrderId, OrderStatus, PaymentId, ProductId, Role, SessionId, UserId,
};

const fn default_true() -> bool {
    true
}

/// A logged-in user, as returned by `/api/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub email: Email,
    pub role: Role,
    /// Display name; customers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Shipping address; customers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl User {
    /// Name to show in the header and on documents: the display name when
    /// present, otherwise the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.email.as_str(),
        }
    }
}

/// Successful response from `/api/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub session_id: SessionId,
    pub user: User,
}

/// A catalog product from `/api/products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub sku: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    pub stock: u32,
    pub active: bool,
    /// Server-computed: active and in stock.
    pub available: bool,
    #[serde(default)]
    pub image_url: String,
}

/// A product-quantity-price tuple inside an order, receipt, or invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default)]
    pub sku: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    #[serde(default)]
    pub image_url: String,
}

/// Why a cart line cannot currently be fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockIssue {
    OutOfStock,
    ExceedsStock,
}

/// A cart line from `/api/cart`.
///
/// Carries the same fields as [`LineItem`] plus the server's live stock
/// verdict. A missing `stock_ok` is treated as `true` - only an explicit
/// `false` blocks checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default)]
    pub sku: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub current_stock: Option<u32>,
    #[serde(default = "default_true")]
    pub stock_ok: bool,
    #[serde(default)]
    pub stock_issue: Option<StockIssue>,
    #[serde(default)]
    pub stock_message: String,
}

/// Cart snapshot from `/api/cart`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub item_count: u32,
    /// Server verdict on whether checkout may proceed. Authoritative when
    /// present; older backends omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_checkout: Option<bool>,
}

impl Cart {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether checkout may proceed, ignoring emptiness.
    ///
    /// The server's `can_checkout` wins when supplied; the every-line
    /// `stock_ok` fallback only applies when the field is absent.
    #[must_use]
    pub fn checkout_allowed(&self) -> bool {
        self.can_checkout
            .unwrap_or_else(|| self.items.iter().all(|item| item.stock_ok))
    }
}

/// An order from `/api/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub customer_id: UserId,
    #[serde(with = "wire_datetime")]
    pub order_date: NaiveDateTime,
    pub status: OrderStatus,
    pub total: Decimal,
    pub items: Vec<LineItem>,
}

/// Proof-of-payment document from `/api/orders/{id}/receipt`.
///
/// Immutable once issued; the status field is rendered verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub receipt_number: String,
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub customer_name: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub amount_paid: Decimal,
    pub payment_method: String,
    #[serde(with = "wire_datetime")]
    pub payment_date: NaiveDateTime,
    pub status: String,
}

/// Billing document from `/api/orders/{id}/invoice` (admin view).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_number: String,
    pub order_id: OrderId,
    pub customer_name: String,
    #[serde(with = "wire_date")]
    pub issue_date: NaiveDate,
    #[serde(with = "wire_date")]
    pub due_date: NaiveDate,
    pub items: Vec<LineItem>,
    pub total_amount: Decimal,
    pub status: InvoiceStatus,
}

/// Payment summary inside a checkout response.
#[derive(Debug, Clone, Deserialize)]
pub struct Payment {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub amount: Decimal,
    pub method: String,
    pub status: String,
    #[serde(with = "wire_datetime")]
    pub payment_date: NaiveDateTime,
    /// Present once the backend has issued the receipt.
    #[serde(default)]
    pub receipt: Option<Receipt>,
}

/// Successful response from `/api/checkout`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub order: Order,
    pub payment: Payment,
}

/// Full-field product update sent to `/api/admin/products/{id}`.
///
/// The admin editor always submits every field, pre-filled from the last
/// rendered values.
#[derive(Debug, Clone, Serialize)]
pub struct ProductUpdate {
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub description: String,
}

/// Error body the backend attaches to non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_decodes_backend_json() {
        let json = r#"{
            "product_id": 1,
            "sku": "SNACK001",
            "name": "Spicy ahh Chips",
            "price": 2.99,
            "description": "Crispy hot potato chips",
            "stock": 50,
            "active": true,
            "available": true,
            "image_url": "/static/images/chips.jpg"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.product_id, ProductId::new(1));
        assert_eq!(product.price, Decimal::new(299, 2));
        assert!(product.available);
    }

    #[test]
    fn test_cart_item_stock_ok_defaults_true() {
        let json = r#"{
            "product_id": 2,
            "product_name": "Nitro Fuel",
            "quantity": 3,
            "unit_price": 1.99,
            "line_total": 5.97
        }"#;
        let item: CartItem = serde_json::from_str(json).unwrap();
        assert!(item.stock_ok);
        assert!(item.stock_issue.is_none());
        assert!(item.stock_message.is_empty());
    }

    #[test]
    fn test_checkout_allowed_server_flag_wins() {
        let item = r#"{
            "product_id": 2,
            "product_name": "Nitro Fuel",
            "quantity": 3,
            "unit_price": 1.99,
            "line_total": 5.97,
            "stock_ok": true
        }"#;
        let cart: Cart = serde_json::from_str(&format!(
            r#"{{"items": [{item}], "total": 5.97, "item_count": 3, "can_checkout": false}}"#
        ))
        .unwrap();
        // Every line is fine, but the server said no.
        assert!(!cart.checkout_allowed());
    }

    #[test]
    fn test_checkout_allowed_falls_back_to_stock_ok() {
        let json = r#"{
            "items": [{
                "product_id": 2,
                "product_name": "Nitro Fuel",
                "quantity": 300,
                "unit_price": 1.99,
                "line_total": 597.0,
                "stock_ok": false,
                "stock_issue": "exceeds_stock",
                "stock_message": "Nitro Fuel has exceeded limited stock (Instock: 100)"
            }],
            "total": 597.0,
            "item_count": 300
        }"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert!(!cart.checkout_allowed());
    }

    #[test]
    fn test_order_date_format() {
        let json = r#"{
            "order_id": 1,
            "customer_id": 1,
            "order_date": "2026-08-06 14:30:00",
            "status": "Placed",
            "total": 4.98,
            "items": []
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.order_date.format("%Y").to_string(), "2026");
    }

    #[test]
    fn test_user_display_name_falls_back_to_email() {
        let admin: User = serde_json::from_str(
            r#"{"user_id": 2, "email": "admin@example.com", "role": "admin"}"#,
        )
        .unwrap();
        assert_eq!(admin.display_name(), "admin@example.com");

        let customer: User = serde_json::from_str(
            r#"{"user_id": 1, "email": "customer@example.com", "role": "customer",
                "name": "John Doe", "address": "123 Main St"}"#,
        )
        .unwrap();
        assert_eq!(customer.display_name(), "John Doe");
    }
}
