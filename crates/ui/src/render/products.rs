//! Product grid rendering.

use askama::Template;

use cornershop_client::types::Product;
use cornershop_core::format_usd;

use super::image_or_placeholder;

/// Display data for one product card.
#[derive(Clone)]
pub struct ProductCardView {
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: u32,
    pub available: bool,
    pub image_url: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.product_id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: format_usd(product.price),
            stock: product.stock,
            available: product.available,
            image_url: image_or_placeholder(&product.image_url),
        }
    }
}

/// The product grid. Available products get a quantity stepper bounded by
/// `[1, stock]`; unavailable ones show "Out of Stock" instead.
#[derive(Template)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub products: Vec<ProductCardView>,
}

impl ProductsTemplate {
    /// Build the grid from a catalog response.
    #[must_use]
    pub fn new(products: &[Product]) -> Self {
        Self {
            products: products.iter().map(ProductCardView::from).collect(),
        }
    }
}
