//! Cart rendering and checkout gating.

use askama::Template;

use cornershop_client::types::{Cart, CartItem};
use cornershop_core::format_usd;

use super::image_or_placeholder;

/// Title shown on the disabled checkout button when the cart is empty.
pub const EMPTY_CART_TITLE: &str = "Add items to proceed to checkout";

/// Title shown on the disabled checkout button when stock issues block it.
pub const STOCK_ISSUE_TITLE: &str = "Resolve stock issues in your cart before checkout";

/// Notice shown when a stock-blocked checkout is attempted anyway.
pub const STOCK_BLOCKED_MESSAGE: &str = "Some products are out of stock or exceeded stock limit";

/// Display data for one cart row.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    pub image_url: String,
    pub stock_ok: bool,
    pub stock_message: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.to_string(),
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            unit_price: format_usd(item.unit_price),
            line_total: format_usd(item.line_total),
            image_url: image_or_placeholder(&item.image_url),
            stock_ok: item.stock_ok,
            stock_message: item.stock_message.clone(),
        }
    }
}

/// Display data for the whole cart section.
#[derive(Clone)]
pub struct CartViewModel {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
    pub is_empty: bool,
    /// Whether the checkout button is live.
    pub checkout_allowed: bool,
    /// Tooltip on the checkout button; empty when checkout is allowed.
    pub checkout_title: &'static str,
}

impl From<&Cart> for CartViewModel {
    fn from(cart: &Cart) -> Self {
        let is_empty = cart.is_empty();
        let allowed = !is_empty && cart.checkout_allowed();
        let title = if allowed {
            ""
        } else if is_empty {
            EMPTY_CART_TITLE
        } else {
            STOCK_ISSUE_TITLE
        };

        Self {
            items: cart.items.iter().map(CartItemView::from).collect(),
            total: format_usd(cart.total),
            item_count: cart.item_count,
            is_empty,
            checkout_allowed: allowed,
            checkout_title: title,
        }
    }
}

impl CartViewModel {
    /// The notice to show when checkout is attempted while blocked.
    #[must_use]
    pub const fn blocked_message(&self) -> &'static str {
        if self.is_empty {
            EMPTY_CART_TITLE
        } else {
            STOCK_BLOCKED_MESSAGE
        }
    }
}

/// The cart section: empty state or one row per item, plus the total and
/// the checkout button.
#[derive(Template)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub cart: CartViewModel,
}

impl CartTemplate {
    /// Build the section from a cart snapshot.
    #[must_use]
    pub fn new(cart: &Cart) -> Self {
        Self {
            cart: CartViewModel::from(cart),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cornershop_core::ProductId;
    use rust_decimal::Decimal;

    use super::*;

    fn item(name: &str, stock_ok: bool, stock_message: &str) -> CartItem {
        CartItem {
            product_id: ProductId::new(1),
            product_name: name.to_owned(),
            sku: String::new(),
            quantity: 2,
            unit_price: Decimal::new(199, 2),
            line_total: Decimal::new(398, 2),
            image_url: String::new(),
            current_stock: None,
            stock_ok,
            stock_issue: None,
            stock_message: stock_message.to_owned(),
        }
    }

    fn cart(items: Vec<CartItem>, can_checkout: Option<bool>) -> Cart {
        let total: Decimal = items.iter().map(|i| i.line_total).sum();
        let item_count = items.iter().map(|i| i.quantity).sum();
        Cart {
            items,
            total,
            item_count,
            can_checkout,
        }
    }

    #[test]
    fn test_empty_cart_shows_empty_state() {
        let html = CartTemplate::new(&cart(vec![], None)).render().unwrap();
        assert!(html.contains("Your cart is empty"));
        assert!(html.contains(EMPTY_CART_TITLE));
        assert!(html.contains("disabled"));
    }

    #[test]
    fn test_cart_rows_and_total() {
        let html = CartTemplate::new(&cart(vec![item("Nitro Fuel", true, "")], None))
            .render()
            .unwrap();
        assert!(html.contains("Nitro Fuel"));
        assert!(html.contains("Price: $1.99"));
        assert!(html.contains("Subtotal: $3.98"));
        assert!(html.contains("Total: $3.98"));
        assert!(!html.contains("disabled"));
    }

    #[test]
    fn test_stock_issue_disables_checkout() {
        let bad = item("Nitro Fuel", false, "Nitro Fuel is out of stock");
        let model = CartViewModel::from(&cart(vec![item("Chips", true, ""), bad], None));
        assert!(!model.checkout_allowed);
        assert_eq!(model.checkout_title, STOCK_ISSUE_TITLE);
        assert_eq!(model.blocked_message(), STOCK_BLOCKED_MESSAGE);

        let html = CartTemplate {
            cart: model,
        }
        .render()
        .unwrap();
        assert!(html.contains("Nitro Fuel is out of stock"));
        assert!(html.contains("disabled"));
    }

    #[test]
    fn test_server_can_checkout_overrides_line_flags() {
        // Lines look fine but the server says no.
        let model = CartViewModel::from(&cart(vec![item("Chips", true, "")], Some(false)));
        assert!(!model.checkout_allowed);
    }
}
