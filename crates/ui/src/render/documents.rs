//! Receipt and invoice documents, rendered into the shared modal slot or
//! the inline overlay depending on shell configuration.

use askama::Template;

use cornershop_client::types::{Invoice, LineItem, Receipt};
use cornershop_core::datetime::{DATE_FORMAT, DATETIME_FORMAT};
use cornershop_core::format_usd;

/// One document line: `name xN @ $unit` and its line total.
#[derive(Clone)]
pub struct DocumentLineView {
    pub label: String,
    pub amount: String,
}

impl From<&LineItem> for DocumentLineView {
    fn from(item: &LineItem) -> Self {
        Self {
            label: format!(
                "{} x{} @ {}",
                item.product_name,
                item.quantity,
                format_usd(item.unit_price)
            ),
            amount: format_usd(item.line_total),
        }
    }
}

/// Display data for a payment receipt.
#[derive(Clone)]
pub struct ReceiptView {
    pub receipt_number: String,
    pub order_id: String,
    pub payment_date: String,
    pub customer_name: String,
    pub payment_method: String,
    pub amount_paid: String,
    pub status: String,
    pub items: Vec<DocumentLineView>,
}

impl From<&Receipt> for ReceiptView {
    fn from(receipt: &Receipt) -> Self {
        Self {
            receipt_number: receipt.receipt_number.clone(),
            order_id: receipt.order_id.to_string(),
            payment_date: receipt.payment_date.format(DATETIME_FORMAT).to_string(),
            customer_name: receipt.customer_name.clone(),
            payment_method: receipt.payment_method.clone(),
            amount_paid: format_usd(receipt.amount_paid),
            status: receipt.status.clone(),
            items: receipt.items.iter().map(DocumentLineView::from).collect(),
        }
    }
}

/// The receipt document.
#[derive(Template)]
#[template(path = "receipt.html")]
pub struct ReceiptTemplate {
    pub receipt: ReceiptView,
}

impl ReceiptTemplate {
    /// Build the document from a receipt response.
    #[must_use]
    pub fn new(receipt: &Receipt) -> Self {
        Self {
            receipt: ReceiptView::from(receipt),
        }
    }
}

/// Display data for an invoice.
#[derive(Clone)]
pub struct InvoiceView {
    pub invoice_number: String,
    pub order_id: String,
    pub issue_date: String,
    pub due_date: String,
    pub customer_name: String,
    pub total_amount: String,
    pub status: String,
    pub paid: bool,
    pub items: Vec<DocumentLineView>,
}

impl From<&Invoice> for InvoiceView {
    fn from(invoice: &Invoice) -> Self {
        Self {
            invoice_number: invoice.invoice_number.clone(),
            order_id: invoice.order_id.to_string(),
            issue_date: invoice.issue_date.format(DATE_FORMAT).to_string(),
            due_date: invoice.due_date.format(DATE_FORMAT).to_string(),
            customer_name: invoice.customer_name.clone(),
            total_amount: format_usd(invoice.total_amount),
            status: invoice.status.to_string(),
            paid: invoice.status == cornershop_core::InvoiceStatus::Paid,
            items: invoice.items.iter().map(DocumentLineView::from).collect(),
        }
    }
}

/// The invoice document (admin view).
#[derive(Template)]
#[template(path = "invoice.html")]
pub struct InvoiceTemplate {
    pub invoice: InvoiceView,
}

impl InvoiceTemplate {
    /// Build the document from an invoice response.
    #[must_use]
    pub fn new(invoice: &Invoice) -> Self {
        Self {
            invoice: InvoiceView::from(invoice),
        }
    }
}
