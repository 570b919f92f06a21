//! Admin product editor rendering.

use askama::Template;

use cornershop_client::types::Product;

/// One inline edit form, pre-filled with the product's current values.
///
/// Price and stock stay in their raw wire form here (`2.99`, not `$2.99`)
/// because they populate form inputs that are sent back on submit.
#[derive(Clone)]
pub struct AdminProductFormView {
    pub product_id: String,
    pub name: String,
    pub price: String,
    pub stock: u32,
    pub description: String,
}

impl From<&Product> for AdminProductFormView {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.product_id.to_string(),
            name: product.name.clone(),
            price: product.price.to_string(),
            stock: product.stock,
            description: product.description.clone(),
        }
    }
}

/// The admin "Manage Products" tab: one form per product.
#[derive(Template)]
#[template(path = "admin_products.html")]
pub struct AdminProductsTemplate {
    pub products: Vec<AdminProductFormView>,
}

impl AdminProductsTemplate {
    /// Build the tab from a catalog response.
    #[must_use]
    pub fn new(products: &[Product]) -> Self {
        Self {
            products: products.iter().map(AdminProductFormView::from).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cornershop_core::ProductId;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_forms_prefilled_with_current_values() {
        let product = Product {
            product_id: ProductId::new(4),
            sku: "SNACK002".to_owned(),
            name: "Red Bean Buns".to_owned(),
            price: Decimal::new(349, 2),
            description: "Sweet n Tasty Red Bean Buns".to_owned(),
            stock: 30,
            active: true,
            available: true,
            image_url: String::new(),
        };
        let html = AdminProductsTemplate::new(&[product]).render().unwrap();
        assert!(html.contains("Manage Products"));
        assert!(html.contains("Red Bean Buns (ID: 4)"));
        assert!(html.contains("value=\"3.49\""));
        assert!(html.contains("value=\"30\""));
        assert!(html.contains("Sweet n Tasty Red Bean Buns"));
        assert!(html.contains("Update"));
    }
}
