//! Order history rendering, customer and admin flavors.

use askama::Template;

use cornershop_client::types::{LineItem, Order};
use cornershop_core::{OrderStatus, datetime::DATETIME_FORMAT, format_usd};

/// One order line: `name xN` and its line total.
#[derive(Clone)]
pub struct OrderLineView {
    pub label: String,
    pub line_total: String,
}

impl From<&LineItem> for OrderLineView {
    fn from(item: &LineItem) -> Self {
        Self {
            label: format!("{} x{}", item.product_name, item.quantity),
            line_total: format_usd(item.line_total),
        }
    }
}

/// Display data for one order card.
#[derive(Clone)]
pub struct OrderView {
    pub order_id: String,
    pub customer_id: String,
    pub date: String,
    pub status: String,
    pub total: String,
    pub items: Vec<OrderLineView>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id.to_string(),
            customer_id: order.customer_id.to_string(),
            date: order.order_date.format(DATETIME_FORMAT).to_string(),
            status: order.status.to_string(),
            total: format_usd(order.total),
            items: order.items.iter().map(OrderLineView::from).collect(),
        }
    }
}

/// One `<option>` in the admin status select.
#[derive(Clone)]
pub struct StatusOptionView {
    pub value: &'static str,
    pub selected: bool,
}

/// An order card in the admin panel: same data plus the customer id and
/// the status select.
#[derive(Clone)]
pub struct AdminOrderView {
    pub order: OrderView,
    pub status_options: Vec<StatusOptionView>,
}

impl From<&Order> for AdminOrderView {
    fn from(order: &Order) -> Self {
        Self {
            order: OrderView::from(order),
            status_options: OrderStatus::ALL
                .iter()
                .map(|status| StatusOptionView {
                    value: status.as_str(),
                    selected: *status == order.status,
                })
                .collect(),
        }
    }
}

/// The customer order history section.
#[derive(Template)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub orders: Vec<OrderView>,
}

impl OrdersTemplate {
    /// Build the section from an order list response.
    #[must_use]
    pub fn new(orders: &[Order]) -> Self {
        Self {
            orders: orders.iter().map(OrderView::from).collect(),
        }
    }
}

/// The admin "All Orders" tab with status selects and invoice actions.
#[derive(Template)]
#[template(path = "admin_orders.html")]
pub struct AdminOrdersTemplate {
    pub orders: Vec<AdminOrderView>,
}

impl AdminOrdersTemplate {
    /// Build the tab from an order list response.
    #[must_use]
    pub fn new(orders: &[Order]) -> Self {
        Self {
            orders: orders.iter().map(AdminOrderView::from).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use cornershop_core::{OrderId, ProductId, UserId};
    use rust_decimal::Decimal;

    use super::*;

    fn order(status: OrderStatus) -> Order {
        Order {
            order_id: OrderId::new(7),
            customer_id: UserId::new(1),
            order_date: NaiveDate::from_ymd_opt(2026, 8, 6)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap(),
            status,
            total: Decimal::new(498, 2),
            items: vec![LineItem {
                product_id: ProductId::new(1),
                product_name: "Spicy ahh Chips".to_owned(),
                sku: String::new(),
                quantity: 1,
                unit_price: Decimal::new(299, 2),
                line_total: Decimal::new(299, 2),
                image_url: String::new(),
            }],
        }
    }

    #[test]
    fn test_no_orders_message() {
        let html = OrdersTemplate::new(&[]).render().unwrap();
        assert!(html.contains("No orders yet"));
    }

    #[test]
    fn test_order_card_fields() {
        let html = OrdersTemplate::new(&[order(OrderStatus::Placed)]).render().unwrap();
        assert!(html.contains("Order #7"));
        assert!(html.contains("2026-08-06 14:30:00"));
        assert!(html.contains("Placed"));
        assert!(html.contains("$4.98"));
        assert!(html.contains("Spicy ahh Chips x1"));
        assert!(html.contains("View Receipt"));
    }

    #[test]
    fn test_admin_select_marks_current_status() {
        let view = AdminOrderView::from(&order(OrderStatus::Shipped));
        let selected: Vec<&str> = view
            .status_options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value)
            .collect();
        assert_eq!(selected, vec!["Shipped"]);

        let html = AdminOrdersTemplate::new(&[order(OrderStatus::Shipped)])
            .render()
            .unwrap();
        assert!(html.contains("Customer ID: 1"));
        assert!(html.contains("View Invoice"));
        assert!(html.contains("<option value=\"Shipped\" selected"));
        assert!(html.contains("<option value=\"Placed\">"));
    }
}
