//! In-process stub of the Cornershop REST backend.
//!
//! Faithful to the real backend's observable contract: form-encoded
//! writes, `session_id` query auth, `detail` error bodies, server-computed
//! cart totals and stock verdicts, receipts and invoices issued at
//! checkout. State is in-memory and seeded with the standard sample
//! catalog and two users.

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

/// Fixed timestamp used for every order, payment, and invoice the stub
/// issues; tests never assert on wall-clock freshness.
const STAMP: &str = "2026-08-06 12:00:00";
const STAMP_DATE: &str = "2026-08-06";

type Shared = Arc<Mutex<StoreState>>;
type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn reject(status: StatusCode, detail: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": detail })))
}

// =============================================================================
// Server-side state
// =============================================================================

#[derive(Clone)]
struct ProductRow {
    product_id: i32,
    sku: &'static str,
    name: String,
    price: Decimal,
    description: String,
    stock: i64,
    active: bool,
    image_url: &'static str,
}

impl ProductRow {
    fn available(&self) -> bool {
        self.active && self.stock > 0
    }

    fn details(&self) -> Value {
        json!({
            "product_id": self.product_id,
            "sku": self.sku,
            "name": self.name,
            "price": self.price,
            "description": self.description,
            "stock": self.stock.max(0),
            "active": self.active,
            "available": self.available(),
            "image_url": self.image_url,
        })
    }
}

#[derive(Clone)]
struct UserRow {
    user_id: i32,
    email: &'static str,
    password: &'static str,
    role: &'static str,
    name: Option<&'static str>,
    address: Option<&'static str>,
}

impl UserRow {
    fn info(&self) -> Value {
        let mut info = json!({
            "user_id": self.user_id,
            "email": self.email,
            "role": self.role,
        });
        if let Some(name) = self.name {
            info["name"] = json!(name);
        }
        if let Some(address) = self.address {
            info["address"] = json!(address);
        }
        info
    }

    fn display_name(&self) -> &'static str {
        self.name.unwrap_or(self.email)
    }
}

#[derive(Clone)]
struct CartLine {
    product_id: i32,
    quantity: i64,
    /// Price captured when the line was added.
    unit_price: Decimal,
}

#[derive(Clone)]
struct OrderLine {
    product_id: i32,
    product_name: String,
    sku: &'static str,
    quantity: i64,
    unit_price: Decimal,
    image_url: &'static str,
}

impl OrderLine {
    fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    fn details(&self) -> Value {
        json!({
            "product_id": self.product_id,
            "product_name": self.product_name,
            "sku": self.sku,
            "quantity": self.quantity,
            "unit_price": self.unit_price,
            "line_total": self.line_total(),
            "image_url": self.image_url,
        })
    }
}

#[derive(Clone)]
struct OrderRow {
    order_id: i32,
    customer_id: i32,
    status: String,
    items: Vec<OrderLine>,
}

impl OrderRow {
    fn total(&self) -> Decimal {
        self.items.iter().map(OrderLine::line_total).sum()
    }

    fn details(&self) -> Value {
        json!({
            "order_id": self.order_id,
            "customer_id": self.customer_id,
            "order_date": STAMP,
            "status": self.status,
            "total": self.total(),
            "items": self.items.iter().map(OrderLine::details).collect::<Vec<_>>(),
        })
    }
}

#[derive(Clone)]
struct PaymentRow {
    payment_id: i32,
    order_id: i32,
    amount: Decimal,
    method: String,
    receipt_number: i32,
    customer_name: String,
    items: Vec<OrderLine>,
}

impl PaymentRow {
    fn receipt(&self) -> Value {
        json!({
            "receipt_number": format!("RCP-{}", self.receipt_number),
            "payment_id": self.payment_id,
            "order_id": self.order_id,
            "customer_name": self.customer_name,
            "items": self.items.iter().map(OrderLine::details).collect::<Vec<_>>(),
            "amount_paid": self.amount,
            "payment_method": self.method,
            "payment_date": STAMP,
            "status": "Paid",
        })
    }

    fn details(&self) -> Value {
        json!({
            "payment_id": self.payment_id,
            "order_id": self.order_id,
            "amount": self.amount,
            "method": self.method,
            "status": "Success",
            "payment_date": STAMP,
            "receipt": self.receipt(),
        })
    }
}

#[derive(Clone)]
struct InvoiceRow {
    invoice_number: i32,
    order_id: i32,
    customer_name: String,
    items: Vec<OrderLine>,
    total_amount: Decimal,
    status: &'static str,
}

impl InvoiceRow {
    fn details(&self) -> Value {
        json!({
            "invoice_number": format!("INV-{}", self.invoice_number),
            "order_id": self.order_id,
            "customer_name": self.customer_name,
            "issue_date": STAMP_DATE,
            "due_date": STAMP_DATE,
            "items": self.items.iter().map(OrderLine::details).collect::<Vec<_>>(),
            "total_amount": self.total_amount,
            "status": self.status,
        })
    }
}

struct StoreState {
    products: BTreeMap<i32, ProductRow>,
    users: Vec<UserRow>,
    sessions: HashMap<String, i32>,
    carts: HashMap<i32, Vec<CartLine>>,
    orders: BTreeMap<i32, OrderRow>,
    payments: Vec<PaymentRow>,
    invoices: HashMap<i32, InvoiceRow>,
    next_order_id: i32,
    next_payment_id: i32,
    next_invoice_number: i32,
    next_receipt_number: i32,
    /// When true, `/api/logout` answers 500 - for testing that local
    /// logout is unconditional.
    fail_logout: bool,
    /// When true, checkout responses omit the receipt object - for
    /// testing the deferred navigation path.
    omit_receipt: bool,
}

fn product(
    product_id: i32,
    sku: &'static str,
    name: &str,
    price: &str,
    description: &str,
    stock: i64,
    image_url: &'static str,
) -> ProductRow {
    ProductRow {
        product_id,
        sku,
        name: name.to_owned(),
        price: price.parse().expect("seed price"),
        description: description.to_owned(),
        stock,
        active: true,
        image_url,
    }
}

impl StoreState {
    fn seeded() -> Self {
        let rows = [
            product(1, "SNACK001", "Spicy ahh Chips", "2.99", "Crispy hot potato chips", 50, "/static/images/chips.jpg"),
            product(2, "DRINK001", "Nitro Fuel", "1.99", "Refreshing Nitro Fuel", 100, "/static/images/fuel.jpg"),
            product(3, "CANDY001", "Chocolate Bar", "1.49", "Delicious chocolate", 75, "/static/images/bar.jpg"),
            product(4, "SNACK002", "Red Bean Buns", "3.49", "Sweet n Tasty Red Bean Buns", 30, "/static/images/buns.jpg"),
            product(5, "DRINK002", "Goddess Water", "0.99", "Bottled water", 200, "/static/images/water.jpg"),
            product(6, "DRINK003", "Sam Dua", "5.19", "Vietnamese tea", 150, "/static/images/samdua.jpg"),
        ];

        Self {
            products: rows.into_iter().map(|p| (p.product_id, p)).collect(),
            users: vec![
                UserRow {
                    user_id: 1,
                    email: "customer@example.com",
                    password: "password123",
                    role: "customer",
                    name: Some("John Doe"),
                    address: Some("123 Main St"),
                },
                UserRow {
                    user_id: 2,
                    email: "admin@example.com",
                    password: "admin123",
                    role: "admin",
                    name: None,
                    address: None,
                },
            ],
            sessions: HashMap::new(),
            carts: HashMap::new(),
            orders: BTreeMap::new(),
            payments: Vec::new(),
            invoices: HashMap::new(),
            next_order_id: 1,
            next_payment_id: 1,
            next_invoice_number: 1000,
            next_receipt_number: 2000,
            fail_logout: false,
            omit_receipt: false,
        }
    }

    fn user(&self, user_id: i32) -> Option<&UserRow> {
        self.users.iter().find(|u| u.user_id == user_id)
    }

    fn authed_user(&self, session_id: &str) -> Option<&UserRow> {
        let user_id = *self.sessions.get(session_id)?;
        self.user(user_id)
    }

    /// Cart items with live stock verdicts, as `get_items()` computes them.
    fn cart_items(&self, user_id: i32) -> Vec<Value> {
        let Some(lines) = self.carts.get(&user_id) else {
            return Vec::new();
        };
        lines
            .iter()
            .map(|line| {
                let product = self.products.get(&line.product_id).expect("seeded product");
                let current_stock = product.stock.max(0);
                let (stock_ok, stock_issue, stock_message) = if product.stock <= 0 {
                    (
                        false,
                        json!("out_of_stock"),
                        format!("{} is out of stock", product.name),
                    )
                } else if line.quantity > product.stock {
                    (
                        false,
                        json!("exceeds_stock"),
                        format!(
                            "{} has exceeded limited stock (Instock: {current_stock})",
                            product.name
                        ),
                    )
                } else {
                    (true, Value::Null, String::new())
                };

                json!({
                    "product_id": line.product_id,
                    "product_name": product.name,
                    "sku": product.sku,
                    "quantity": line.quantity,
                    "unit_price": line.unit_price,
                    "line_total": line.unit_price * Decimal::from(line.quantity),
                    "image_url": product.image_url,
                    "current_stock": current_stock,
                    "stock_ok": stock_ok,
                    "stock_issue": stock_issue,
                    "stock_message": stock_message,
                })
            })
            .collect()
    }
}

// =============================================================================
// Extractor payloads
// =============================================================================

#[derive(Deserialize)]
struct SessionQuery {
    session_id: String,
}

#[derive(Deserialize)]
struct StatusQuery {
    session_id: String,
    status: String,
}

#[derive(Deserialize)]
struct LoginForm {
    email: String,
    password: String,
}

const fn default_quantity() -> i64 {
    1
}

#[derive(Deserialize)]
struct CartItemForm {
    product_id: i32,
    #[serde(default = "default_quantity")]
    quantity: i64,
}

#[derive(Deserialize)]
struct CheckoutForm {
    payment_method: String,
    payment_details: String,
}

#[derive(Deserialize)]
struct ProductForm {
    name: Option<String>,
    price: Option<Decimal>,
    description: Option<String>,
    stock: Option<i64>,
}

// =============================================================================
// Handlers
// =============================================================================

fn lock(state: &Shared) -> MutexGuard<'_, StoreState> {
    state.lock().expect("stub state lock")
}

async fn login(State(state): State<Shared>, Form(form): Form<LoginForm>) -> ApiResult {
    let mut state = lock(&state);
    let Some(user) = state
        .users
        .iter()
        .find(|u| u.email == form.email && u.password == form.password)
        .cloned()
    else {
        return Err(reject(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    };

    let session_id = format!("session_{}", user.user_id);
    state.sessions.insert(session_id.clone(), user.user_id);
    if user.role == "customer" {
        state.carts.entry(user.user_id).or_default();
    }

    Ok(Json(json!({
        "message": "Login successful",
        "session_id": session_id,
        "user": user.info(),
    })))
}

async fn logout(State(state): State<Shared>, Query(query): Query<SessionQuery>) -> ApiResult {
    let mut state = lock(&state);
    if state.fail_logout {
        return Err(reject(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Session backend unavailable",
        ));
    }
    state.sessions.remove(&query.session_id);
    Ok(Json(json!({ "message": "Logout successful" })))
}

async fn list_products(State(state): State<Shared>) -> ApiResult {
    let state = lock(&state);
    let products: Vec<Value> = state
        .products
        .values()
        .filter(|p| p.active)
        .map(ProductRow::details)
        .collect();
    Ok(Json(json!(products)))
}

async fn get_product(State(state): State<Shared>, Path(product_id): Path<i32>) -> ApiResult {
    let state = lock(&state);
    state.products.get(&product_id).map_or_else(
        || Err(reject(StatusCode::NOT_FOUND, "Product not found")),
        |p| Ok(Json(p.details())),
    )
}

async fn get_cart(State(state): State<Shared>, Query(query): Query<SessionQuery>) -> ApiResult {
    let state = lock(&state);
    let Some(user) = state.authed_user(&query.session_id) else {
        return Err(reject(StatusCode::UNAUTHORIZED, "Not authenticated"));
    };
    let user_id = user.user_id;

    let items = state.cart_items(user_id);
    let total: Decimal = state
        .carts
        .get(&user_id)
        .map(|lines| {
            lines
                .iter()
                .map(|l| l.unit_price * Decimal::from(l.quantity))
                .sum()
        })
        .unwrap_or_default();
    let item_count: i64 = state
        .carts
        .get(&user_id)
        .map(|lines| lines.iter().map(|l| l.quantity).sum())
        .unwrap_or_default();
    let can_checkout = items
        .iter()
        .all(|item| item["stock_ok"].as_bool().unwrap_or(true));

    Ok(Json(json!({
        "items": items,
        "total": total,
        "item_count": item_count,
        "can_checkout": can_checkout,
    })))
}

async fn add_to_cart(
    State(state): State<Shared>,
    Query(query): Query<SessionQuery>,
    Form(form): Form<CartItemForm>,
) -> ApiResult {
    let mut state = lock(&state);
    let Some(user) = state.authed_user(&query.session_id) else {
        return Err(reject(StatusCode::UNAUTHORIZED, "Not authenticated"));
    };
    let user_id = user.user_id;

    let Some(product) = state.products.get(&form.product_id).cloned() else {
        return Err(reject(StatusCode::NOT_FOUND, "Product not found"));
    };
    if !product.available() || form.quantity > product.stock || form.quantity <= 0 {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            "Cannot add item (out of stock or invalid quantity)",
        ));
    }

    let lines = state.carts.entry(user_id).or_default();
    if let Some(line) = lines.iter_mut().find(|l| l.product_id == form.product_id) {
        line.quantity += form.quantity;
    } else {
        lines.push(CartLine {
            product_id: form.product_id,
            quantity: form.quantity,
            unit_price: product.price,
        });
    }

    Ok(Json(json!({ "message": "Item added to cart" })))
}

async fn update_cart(
    State(state): State<Shared>,
    Query(query): Query<SessionQuery>,
    Form(form): Form<CartItemForm>,
) -> ApiResult {
    let mut state = lock(&state);
    let Some(user) = state.authed_user(&query.session_id) else {
        return Err(reject(StatusCode::UNAUTHORIZED, "Not authenticated"));
    };
    let user_id = user.user_id;

    let stock = state
        .products
        .get(&form.product_id)
        .map_or(0, |p| p.stock);
    let Some(lines) = state.carts.get_mut(&user_id) else {
        return Err(reject(StatusCode::NOT_FOUND, "Cart not found"));
    };

    if form.quantity <= 0 {
        let before = lines.len();
        lines.retain(|l| l.product_id != form.product_id);
        if lines.len() == before {
            return Err(reject(StatusCode::BAD_REQUEST, "Cannot update item"));
        }
        return Ok(Json(json!({ "message": "Cart updated" })));
    }

    match lines.iter_mut().find(|l| l.product_id == form.product_id) {
        Some(line) if form.quantity <= stock => {
            line.quantity = form.quantity;
            Ok(Json(json!({ "message": "Cart updated" })))
        }
        _ => Err(reject(StatusCode::BAD_REQUEST, "Cannot update item")),
    }
}

async fn remove_from_cart(
    State(state): State<Shared>,
    Path(product_id): Path<i32>,
    Query(query): Query<SessionQuery>,
) -> ApiResult {
    let mut state = lock(&state);
    let Some(user) = state.authed_user(&query.session_id) else {
        return Err(reject(StatusCode::UNAUTHORIZED, "Not authenticated"));
    };
    let user_id = user.user_id;

    let Some(lines) = state.carts.get_mut(&user_id) else {
        return Err(reject(StatusCode::NOT_FOUND, "Cart not found"));
    };
    let before = lines.len();
    lines.retain(|l| l.product_id != product_id);
    if lines.len() == before {
        return Err(reject(StatusCode::NOT_FOUND, "Item not found in cart"));
    }
    Ok(Json(json!({ "message": "Item removed" })))
}

async fn checkout(
    State(state): State<Shared>,
    Query(query): Query<SessionQuery>,
    Form(form): Form<CheckoutForm>,
) -> ApiResult {
    let mut state = lock(&state);
    let Some(user) = state.authed_user(&query.session_id).cloned() else {
        return Err(reject(StatusCode::UNAUTHORIZED, "Not authenticated"));
    };

    let lines = state.carts.get(&user.user_id).cloned().unwrap_or_default();
    if lines.is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "Cart is empty"));
    }

    // Stock validation before any mutation
    for line in &lines {
        let product = state.products.get(&line.product_id).expect("seeded product");
        if product.stock <= 0 {
            return Err(reject(
                StatusCode::BAD_REQUEST,
                &format!("{} is out of stock", product.name),
            ));
        }
        if line.quantity > product.stock {
            return Err(reject(
                StatusCode::BAD_REQUEST,
                &format!(
                    "{} has exceeded limited stock (Instock: {})",
                    product.name, product.stock
                ),
            ));
        }
    }

    let method = match form.payment_method.as_str() {
        "wallet" => format!("Digital Wallet ({})", form.payment_details),
        "bank" => {
            let details = &form.payment_details;
            let last4_start = details.len().saturating_sub(4);
            format!("Bank Debit (****{})", &details[last4_start..])
        }
        "paypal" => format!("PayPal ({})", form.payment_details),
        _ => return Err(reject(StatusCode::BAD_REQUEST, "Invalid payment method")),
    };

    let items: Vec<OrderLine> = lines
        .iter()
        .map(|line| {
            let product = state.products.get(&line.product_id).expect("seeded product");
            OrderLine {
                product_id: line.product_id,
                product_name: product.name.clone(),
                sku: product.sku,
                quantity: line.quantity,
                unit_price: line.unit_price,
                image_url: product.image_url,
            }
        })
        .collect();

    // Reduce stock
    for line in &lines {
        if let Some(product) = state.products.get_mut(&line.product_id) {
            product.stock = (product.stock - line.quantity).max(0);
        }
    }

    let order_id = state.next_order_id;
    state.next_order_id += 1;
    let order = OrderRow {
        order_id,
        customer_id: user.user_id,
        status: "Placed".to_owned(),
        items: items.clone(),
    };
    let total = order.total();
    state.orders.insert(order_id, order.clone());

    let invoice_number = state.next_invoice_number;
    state.next_invoice_number += 1;
    state.invoices.insert(
        order_id,
        InvoiceRow {
            invoice_number,
            order_id,
            customer_name: user.display_name().to_owned(),
            items: items.clone(),
            total_amount: total,
            status: "Paid",
        },
    );

    let payment_id = state.next_payment_id;
    state.next_payment_id += 1;
    let receipt_number = state.next_receipt_number;
    state.next_receipt_number += 1;
    let payment = PaymentRow {
        payment_id,
        order_id,
        amount: total,
        method,
        receipt_number,
        customer_name: user.display_name().to_owned(),
        items,
    };

    let mut payment_details = payment.details();
    if state.omit_receipt
        && let Some(object) = payment_details.as_object_mut()
    {
        object.remove("receipt");
    }
    state.payments.push(payment);
    state.carts.insert(user.user_id, Vec::new());

    Ok(Json(json!({
        "message": "Order placed successfully",
        "order": order.details(),
        "payment": payment_details,
    })))
}

async fn list_orders(State(state): State<Shared>, Query(query): Query<SessionQuery>) -> ApiResult {
    let state = lock(&state);
    let Some(user) = state.authed_user(&query.session_id) else {
        return Err(reject(StatusCode::UNAUTHORIZED, "Not authenticated"));
    };

    let orders: Vec<Value> = state
        .orders
        .values()
        .filter(|order| user.role == "admin" || order.customer_id == user.user_id)
        .map(OrderRow::details)
        .collect();
    Ok(Json(json!(orders)))
}

async fn order_receipt(
    State(state): State<Shared>,
    Path(order_id): Path<i32>,
    Query(query): Query<SessionQuery>,
) -> ApiResult {
    let state = lock(&state);
    let Some(user) = state.authed_user(&query.session_id) else {
        return Err(reject(StatusCode::UNAUTHORIZED, "Not authenticated"));
    };
    let Some(order) = state.orders.get(&order_id) else {
        return Err(reject(StatusCode::NOT_FOUND, "Order not found"));
    };
    if user.role == "customer" && order.customer_id != user.user_id {
        return Err(reject(StatusCode::FORBIDDEN, "Unauthorized"));
    }

    state
        .payments
        .iter()
        .find(|p| p.order_id == order_id)
        .map_or_else(
            || Err(reject(StatusCode::NOT_FOUND, "Payment not found")),
            |payment| Ok(Json(payment.receipt())),
        )
}

async fn order_invoice(
    State(state): State<Shared>,
    Path(order_id): Path<i32>,
    Query(query): Query<SessionQuery>,
) -> ApiResult {
    let state = lock(&state);
    if state.authed_user(&query.session_id).is_none() {
        return Err(reject(StatusCode::UNAUTHORIZED, "Not authenticated"));
    }
    state.invoices.get(&order_id).map_or_else(
        || Err(reject(StatusCode::NOT_FOUND, "Invoice not found")),
        |invoice| Ok(Json(invoice.details())),
    )
}

async fn admin_update_product(
    State(state): State<Shared>,
    Path(product_id): Path<i32>,
    Query(query): Query<SessionQuery>,
    Form(form): Form<ProductForm>,
) -> ApiResult {
    let mut state = lock(&state);
    let Some(user) = state.authed_user(&query.session_id) else {
        return Err(reject(StatusCode::UNAUTHORIZED, "Not authenticated"));
    };
    if user.role != "admin" {
        return Err(reject(StatusCode::FORBIDDEN, "Admin access required"));
    }

    let Some(product) = state.products.get_mut(&product_id) else {
        return Err(reject(StatusCode::NOT_FOUND, "Product not found"));
    };
    if let Some(name) = form.name.filter(|n| !n.is_empty()) {
        product.name = name;
    }
    if let Some(price) = form.price {
        product.price = price;
    }
    if let Some(description) = form.description.filter(|d| !d.is_empty()) {
        product.description = description;
    }
    if let Some(stock) = form.stock {
        product.stock = stock;
    }

    Ok(Json(json!({
        "message": "Product updated",
        "product": product.details(),
    })))
}

async fn admin_update_order_status(
    State(state): State<Shared>,
    Path(order_id): Path<i32>,
    Query(query): Query<StatusQuery>,
) -> ApiResult {
    let mut state = lock(&state);
    let Some(user) = state.authed_user(&query.session_id) else {
        return Err(reject(StatusCode::UNAUTHORIZED, "Not authenticated"));
    };
    if user.role != "admin" {
        return Err(reject(StatusCode::FORBIDDEN, "Admin access required"));
    }

    let Some(order) = state.orders.get_mut(&order_id) else {
        return Err(reject(StatusCode::NOT_FOUND, "Order not found"));
    };
    let valid = ["Placed", "Processing", "Shipped", "Delivered", "Cancelled"];
    if valid.contains(&query.status.as_str()) {
        order.status.clone_from(&query.status);
    }

    Ok(Json(json!({
        "message": "Order status updated",
        "order": order.details(),
    })))
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/products", get(list_products))
        .route("/api/products/{product_id}", get(get_product))
        .route("/api/cart", get(get_cart))
        .route("/api/cart/add", post(add_to_cart))
        .route("/api/cart/update", put(update_cart))
        .route("/api/cart/remove/{product_id}", delete(remove_from_cart))
        .route("/api/checkout", post(checkout))
        .route("/api/orders", get(list_orders))
        .route("/api/orders/{order_id}/receipt", get(order_receipt))
        .route("/api/orders/{order_id}/invoice", get(order_invoice))
        .route("/api/admin/products/{product_id}", put(admin_update_product))
        .route(
            "/api/admin/orders/{order_id}/status",
            put(admin_update_order_status),
        )
        .with_state(state)
}

// =============================================================================
// TestBackend
// =============================================================================

/// A running stub backend bound to an ephemeral local port.
pub struct TestBackend {
    addr: SocketAddr,
    state: Shared,
    server: JoinHandle<()>,
}

impl TestBackend {
    /// Bind and serve on `127.0.0.1:0`.
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(StoreState::seeded()));
        let app = router(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let addr = listener.local_addr().expect("stub backend addr");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL for client configuration.
    pub fn url(&self) -> Url {
        format!("http://{}", self.addr).parse().expect("stub url")
    }

    /// Overwrite a product's stock level (to manufacture stock issues).
    pub fn set_stock(&self, product_id: i32, stock: i64) {
        if let Some(product) = lock(&self.state).products.get_mut(&product_id) {
            product.stock = stock;
        }
    }

    /// Make `/api/logout` answer 500 from now on.
    pub fn fail_logout(&self, fail: bool) {
        lock(&self.state).fail_logout = fail;
    }

    /// Omit the receipt object from checkout responses from now on.
    pub fn omit_receipt(&self, omit: bool) {
        lock(&self.state).omit_receipt = omit;
    }

    /// Number of orders the backend has accepted.
    pub fn order_count(&self) -> usize {
        lock(&self.state).orders.len()
    }

    /// Whether a server-side session with this id exists.
    pub fn has_session(&self, session_id: &str) -> bool {
        lock(&self.state).sessions.contains_key(session_id)
    }
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}
