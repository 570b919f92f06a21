//! Payment guards: bad card input never reaches the backend.

use cornershop_core::ProductId;
use cornershop_integration_tests::TestContext;
use cornershop_ui::{CardDetails, NoticeKind, PaymentMethod, View};

async fn at_checkout() -> TestContext {
    let mut ctx = TestContext::new().await;
    ctx.login_customer().await;
    ctx.shell
        .add_to_cart(ProductId::new(4), 1)
        .await
        .expect("render");
    ctx.shell.show_checkout().await.expect("render");
    assert_eq!(ctx.shell.page().view, View::Checkout);
    ctx
}

#[tokio::test]
async fn test_all_invalid_fields_reported_and_blocked() {
    let mut ctx = at_checkout().await;

    let card = CardDetails {
        number: "4111".to_owned(),
        expiry: "132026".to_owned(),
        cvc: "12".to_owned(),
    };
    ctx.shell
        .submit_checkout(PaymentMethod::Wallet, &card)
        .await
        .expect("render");

    let notice = ctx.shell.notice().expect("notice");
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(
        notice.text,
        "Some payment fields are invalid: Invalid card number (16 digits), \
         Invalid expiry date (MM/YYYY), Invalid CVC/CVV2 (3 digits)"
    );

    // Inline markers for every failing field, summary intact.
    let section = &ctx.shell.page().section;
    assert!(section.contains("card-number-error"));
    assert!(section.contains("expiry-date-error"));
    assert!(section.contains("cvc-error"));
    assert!(section.contains("Red Bean Buns x1"));

    // Blocked before any network call: no order reached the backend.
    assert_eq!(ctx.backend.order_count(), 0);
}

#[tokio::test]
async fn test_single_failing_rule_is_the_only_one_reported() {
    let mut ctx = at_checkout().await;

    let card = CardDetails {
        number: "4111111111111111".to_owned(),
        expiry: "00/2026".to_owned(),
        cvc: "123".to_owned(),
    };
    ctx.shell
        .submit_checkout(PaymentMethod::Wallet, &card)
        .await
        .expect("render");

    let notice = ctx.shell.notice().expect("notice");
    assert_eq!(
        notice.text,
        "Some payment fields are invalid: Invalid expiry date (MM/YYYY)"
    );

    let section = &ctx.shell.page().section;
    assert!(section.contains("expiry-date-error"));
    assert!(!section.contains("card-number-error"));
    assert!(!section.contains("cvc-error"));
    assert_eq!(ctx.backend.order_count(), 0);
}

#[tokio::test]
async fn test_separators_are_masked_away_before_validation() {
    let mut ctx = at_checkout().await;

    let card = CardDetails {
        number: "4111 1111 1111 1111".to_owned(),
        expiry: "082026".to_owned(),
        cvc: "123".to_owned(),
    };
    ctx.shell
        .submit_checkout(PaymentMethod::Bank, &card)
        .await
        .expect("render");

    // Masked input passes the guards and the order goes through, with the
    // details synthesized from the masked digits.
    assert_eq!(ctx.backend.order_count(), 1);
    let document = ctx.shell.page().document.as_ref().expect("receipt");
    assert!(document.html.contains("Bank Debit (****1111)"));
}
