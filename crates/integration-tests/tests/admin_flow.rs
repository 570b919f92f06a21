//! Admin journey: product editor, order status changes, invoices.

use rust_decimal::Decimal;
use secrecy::SecretString;

use cornershop_client::types::ProductUpdate;
use cornershop_core::{OrderId, OrderStatus, ProductId};
use cornershop_integration_tests::{CUSTOMER_EMAIL, CUSTOMER_PASSWORD, TestContext};
use cornershop_ui::{NoticeKind, View};

/// Place one order as the seeded customer through the raw API, so admin
/// tests have something to manage.
async fn place_customer_order(ctx: &TestContext) -> OrderId {
    let login = ctx
        .api
        .login(CUSTOMER_EMAIL, &SecretString::from(CUSTOMER_PASSWORD))
        .await
        .expect("customer login");
    ctx.api
        .add_to_cart(&login.session_id, ProductId::new(2), 2)
        .await
        .expect("add to cart");
    let response = ctx
        .api
        .checkout(&login.session_id, "wallet", "Card ****1111")
        .await
        .expect("checkout");
    response.order.order_id
}

#[tokio::test]
async fn test_admin_lands_on_product_editor() {
    let mut ctx = TestContext::new().await;
    ctx.login_admin().await;

    let page = ctx.shell.page();
    assert_eq!(page.view, View::Admin);
    assert!(page.header.as_deref().expect("header").contains("admin-nav"));
    assert!(page.section.contains("Manage Products"));
    assert!(page.section.contains("Spicy ahh Chips (ID: 1)"));
    assert!(page.section.contains("value=\"2.99\""));
}

#[tokio::test]
async fn test_product_update_round_trips_without_refetch() {
    let mut ctx = TestContext::new().await;
    ctx.login_admin().await;

    ctx.shell
        .update_product(
            ProductId::new(1),
            ProductUpdate {
                name: "Spicy ahh Chips".to_owned(),
                price: "3.25".parse().expect("price"),
                stock: 40,
                description: "Crispy hot potato chips".to_owned(),
            },
        )
        .await
        .expect("render");

    assert_eq!(ctx.shell.notice().expect("notice").text, "Product updated!");
    // No re-fetch after edit: the editor still shows the submitted-from
    // values until the next explicit reload.
    assert!(ctx.shell.page().section.contains("value=\"2.99\""));

    // The server did apply the update.
    let products = ctx.api.products().await.expect("products");
    let chips = products
        .iter()
        .find(|p| p.product_id == ProductId::new(1))
        .expect("product 1");
    assert_eq!(chips.price, "3.25".parse::<Decimal>().expect("price"));
    assert_eq!(chips.stock, 40);

    // An explicit reload of the panel picks it up.
    ctx.shell.show_admin_panel().await.expect("render");
    assert!(ctx.shell.page().section.contains("value=\"3.25\""));
}

#[tokio::test]
async fn test_admin_orders_status_change() {
    let mut ctx = TestContext::new().await;
    let order_id = place_customer_order(&ctx).await;
    ctx.login_admin().await;

    ctx.shell.show_admin_orders().await.expect("render");
    let section = &ctx.shell.page().section;
    assert!(section.contains("All Orders"));
    assert!(section.contains("Customer ID: 1"));
    assert!(section.contains("<option value=\"Placed\" selected"));

    ctx.shell
        .update_order_status(order_id, OrderStatus::Shipped)
        .await
        .expect("render");
    assert_eq!(
        ctx.shell.notice().expect("notice").text,
        "Order status updated!"
    );
    // Notice only - the rendered row is untouched until the next reload.
    assert!(ctx.shell.page().section.contains("<option value=\"Placed\" selected"));

    let session = ctx.store.load().expect("admin session");
    let orders = ctx.api.orders(&session.id).await.expect("orders");
    assert_eq!(orders[0].status, OrderStatus::Shipped);

    ctx.shell.show_admin_orders().await.expect("render");
    assert!(ctx.shell.page().section.contains("<option value=\"Shipped\" selected"));
}

#[tokio::test]
async fn test_admin_views_invoice() {
    let mut ctx = TestContext::new().await;
    let order_id = place_customer_order(&ctx).await;
    ctx.login_admin().await;

    ctx.shell.view_invoice(order_id).await.expect("render");
    let document = ctx.shell.page().document.as_ref().expect("invoice shown");
    for expected in ["INVOICE", "INV-1000", "John Doe", "$3.98", "Paid", "2026-08-06"] {
        assert!(document.html.contains(expected), "missing {expected:?}");
    }

    ctx.shell.close_document();
    assert!(ctx.shell.page().document.is_none());
}

#[tokio::test]
async fn test_missing_documents_reduce_to_notices() {
    let mut ctx = TestContext::new().await;
    ctx.login_admin().await;

    ctx.shell.view_invoice(OrderId::new(99)).await.expect("render");
    assert_eq!(ctx.shell.notice().expect("notice").text, "Invoice not available");

    ctx.shell.view_receipt(OrderId::new(99)).await.expect("render");
    assert_eq!(ctx.shell.notice().expect("notice").text, "Receipt not available");
}

#[tokio::test]
async fn test_customer_is_refused_admin_endpoints() {
    let ctx = TestContext::new().await;
    let login = ctx
        .api
        .login(CUSTOMER_EMAIL, &SecretString::from(CUSTOMER_PASSWORD))
        .await
        .expect("customer login");

    let err = ctx
        .api
        .update_product(
            &login.session_id,
            ProductId::new(1),
            &ProductUpdate {
                name: "Hacked".to_owned(),
                price: "0.01".parse().expect("price"),
                stock: 0,
                description: String::new(),
            },
        )
        .await
        .expect_err("non-admin product update must fail");
    assert_eq!(err.status().map(|s| s.as_u16()), Some(403));
    assert_eq!(err.detail(), Some("Admin access required"));
}

#[tokio::test]
async fn test_admin_cannot_browse_store_views() {
    let mut ctx = TestContext::new().await;
    ctx.login_admin().await;

    ctx.shell.show_cart().await.expect("render");
    let notice = ctx.shell.notice().expect("notice");
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.text, "Not available for admin accounts");
    assert_eq!(ctx.shell.page().view, View::Admin);
}
