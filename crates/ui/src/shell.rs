//! The view-controller shell.
//!
//! Owns the API client, the persisted session, the view switcher, the
//! scheduler, and the currently rendered [`Page`]. Every handler follows
//! the same shape as the browser original: call the backend, then
//! re-render the relevant section - with the server as the only source of
//! truth, so mutations are followed by a fresh fetch rather than any
//! optimistic patching.
//!
//! Backend failures are reduced to a notice and leave the page in its
//! last-rendered state; only template failures surface as `Err`.

use std::time::Duration;

use askama::Template;
use secrecy::SecretString;

use cornershop_client::types::{ProductUpdate, User};
use cornershop_client::{ApiClient, ApiError, Session, SessionStore};
use cornershop_core::{OrderId, OrderStatus, ProductId, Role};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::Result;
use crate::notice::{NOTICE_DURATION, Notice, NoticeKind};
use crate::payment::{CardDetails, PaymentMethod};
use crate::render::admin::AdminProductsTemplate;
use crate::render::cart::{CartTemplate, CartViewModel};
use crate::render::checkout::{CheckoutSummaryView, CheckoutTemplate};
use crate::render::documents::{InvoiceTemplate, ReceiptTemplate};
use crate::render::orders::{AdminOrdersTemplate, OrdersTemplate};
use crate::render::products::ProductsTemplate;
use crate::render::{HeaderTemplate, LoginTemplate};
use crate::scheduler::{Scheduler, TimedEvent, TimerSlot};
use crate::views::{View, ViewState};

/// Delay before a receipt-less checkout success navigates to order
/// history.
pub const CHECKOUT_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// Where receipt and invoice documents are rendered.
///
/// A configuration choice made when the shell is built, not a probe of
/// whatever happens to be on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentSurface {
    /// A dialog layered over the current view.
    #[default]
    Modal,
    /// An inline overlay within the page flow.
    Inline,
}

/// A rendered receipt or invoice awaiting display.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub html: String,
    pub surface: DocumentSurface,
}

/// The rendered state of the client: the persistent header, the active
/// section, and an optional document overlay.
#[derive(Debug, Clone)]
pub struct Page {
    pub view: View,
    /// `None` on the login view; otherwise the user info / nav / badge bar.
    pub header: Option<String>,
    pub section: String,
    pub document: Option<RenderedDocument>,
}

/// Build-time shell configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellOptions {
    pub document_surface: DocumentSurface,
}

/// The client's view-controller.
pub struct Shell {
    api: ApiClient,
    store: SessionStore,
    session: Option<Session>,
    views: ViewState,
    scheduler: Scheduler,
    options: ShellOptions,
    notice: Option<Notice>,
    cart_count: u32,
    /// Last summary shown on the checkout view, so a failed validation can
    /// re-render the section without another fetch.
    checkout_summary: Option<CheckoutSummaryView>,
    page: Page,
}

impl Shell {
    /// Build a shell, resuming any persisted session. Returns the receiver
    /// the host must drain for timed events.
    #[must_use]
    pub fn new(
        api: ApiClient,
        store: SessionStore,
        options: ShellOptions,
    ) -> (Self, UnboundedReceiver<TimedEvent>) {
        let (scheduler, events) = Scheduler::new();
        let mut views = ViewState::new();
        let session = store.load();
        if let Some(session) = &session {
            views.enter(session.user.clone());
        }

        let page = Page {
            view: views.current(),
            header: None,
            section: String::new(),
            document: None,
        };

        (
            Self {
                api,
                store,
                session,
                views,
                scheduler,
                options,
                notice: None,
                cart_count: 0,
                checkout_summary: None,
                page,
            },
            events,
        )
    }

    /// Render the initial view: the role's main view for a resumed
    /// session, the login form otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn start(&mut self) -> Result<()> {
        match self.views.user().map(|user| user.role) {
            Some(Role::Customer) => self.reload_products().await,
            Some(Role::Admin) => self.reload_admin_products().await,
            None => self.render_login(),
        }
    }

    /// The current rendered page.
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// The visible notice, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.views.user()
    }

    /// Current cart badge count.
    #[must_use]
    pub const fn cart_count(&self) -> u32 {
        self.cart_count
    }

    /// Dismiss the open receipt/invoice document.
    pub fn close_document(&mut self) {
        self.page.document = None;
    }

    /// Apply a fired timer event.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn handle_timed(&mut self, event: TimedEvent) -> Result<()> {
        match event {
            TimedEvent::HideNotice => {
                self.notice = None;
                Ok(())
            }
            TimedEvent::OpenOrders => self.show_orders().await,
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Handle a login form submit.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn login(&mut self, email: &str, password: SecretString) -> Result<()> {
        match self.api.login(email, &password).await {
            Ok(response) => {
                let session = Session {
                    id: response.session_id,
                    user: response.user,
                };
                if let Err(e) = self.store.save(&session) {
                    tracing::warn!("failed to persist session: {e}");
                }
                let user = session.user.clone();
                self.session = Some(session);
                self.views.enter(user.clone());
                self.show_notice("Login successful!", NoticeKind::Success);
                match user.role {
                    Role::Customer => self.reload_products().await,
                    Role::Admin => self.reload_admin_products().await,
                }
            }
            Err(err @ ApiError::Api { .. }) => {
                tracing::debug!("login rejected: {err}");
                self.show_notice("Invalid credentials", NoticeKind::Error);
                Ok(())
            }
            Err(err) => {
                self.show_notice(format!("Login failed: {err}"), NoticeKind::Error);
                Ok(())
            }
        }
    }

    /// Handle logout: best-effort server call, then unconditionally clear
    /// local state and return to the login view.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn logout(&mut self) -> Result<()> {
        if let Some(session) = self.session.take() {
            if let Err(e) = self.api.logout(&session.id).await {
                tracing::error!("Logout error: {e}");
            }
        }
        if let Err(e) = self.store.clear() {
            tracing::error!("failed to clear session store: {e}");
        }

        self.scheduler.cancel_all();
        self.notice = None;
        self.cart_count = 0;
        self.checkout_summary = None;
        self.views.sign_out();
        self.render_login()
    }

    // =========================================================================
    // Storefront views
    // =========================================================================

    /// Nav action: product listing.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn show_products(&mut self) -> Result<()> {
        if self.gate(View::Products) {
            return Ok(());
        }
        self.reload_products().await
    }

    /// Nav action: cart.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn show_cart(&mut self) -> Result<()> {
        if self.gate(View::Cart) {
            return Ok(());
        }
        let Some(session) = self.session.clone() else {
            return Ok(());
        };

        match self.api.cart(&session.id).await {
            Ok(cart) => {
                self.cart_count = cart.item_count;
                let section = CartTemplate::new(&cart).render()?;
                self.show_section(View::Cart, section)?;
            }
            Err(e) => {
                tracing::warn!("failed to load cart: {e}");
                self.show_notice("Failed to load cart", NoticeKind::Error);
            }
        }
        Ok(())
    }

    /// The checkout button: refused with a notice while the cart is empty
    /// or a line has stock issues, otherwise renders the summary and
    /// payment form.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn show_checkout(&mut self) -> Result<()> {
        if self.gate(View::Checkout) {
            return Ok(());
        }
        let Some(session) = self.session.clone() else {
            return Ok(());
        };

        match self.api.cart(&session.id).await {
            Ok(cart) => {
                let model = CartViewModel::from(&cart);
                if !model.checkout_allowed {
                    self.show_notice(model.blocked_message(), NoticeKind::Error);
                    return Ok(());
                }
                let summary = CheckoutSummaryView::from(&cart);
                self.checkout_summary = Some(summary.clone());
                let section = CheckoutTemplate::new(summary).render()?;
                self.show_section(View::Checkout, section)?;
            }
            Err(e) => {
                // Summary population is best-effort; an unreadable cart
                // renders as empty rather than blocking the view.
                tracing::warn!("failed to load cart for checkout summary: {e}");
                self.checkout_summary = None;
                let section = CheckoutTemplate::new(CheckoutSummaryView::unavailable()).render()?;
                self.show_section(View::Checkout, section)?;
            }
        }
        Ok(())
    }

    /// Nav action: order history.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn show_orders(&mut self) -> Result<()> {
        if self.gate(View::Orders) {
            return Ok(());
        }
        let Some(session) = self.session.clone() else {
            return Ok(());
        };

        match self.api.orders(&session.id).await {
            Ok(orders) => {
                let section = OrdersTemplate::new(&orders).render()?;
                self.show_section(View::Orders, section)?;
            }
            Err(e) => {
                tracing::warn!("failed to load orders: {e}");
                self.show_notice("Failed to load orders", NoticeKind::Error);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Cart mutations
    // =========================================================================

    /// Add a product to the cart, then re-fetch and re-render.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn add_to_cart(&mut self, product_id: ProductId, quantity: u32) -> Result<()> {
        let Some(session) = self.session.clone() else {
            return Ok(());
        };

        match self.api.add_to_cart(&session.id, product_id, quantity).await {
            Ok(()) => {
                self.show_notice("Added to cart!", NoticeKind::Success);
                self.refresh_cart(&session).await?;
            }
            Err(err) => {
                let text = err.detail().unwrap_or("Failed to add to cart").to_owned();
                self.show_notice(text, NoticeKind::Error);
            }
        }
        Ok(())
    }

    /// Set a cart line's quantity, then re-fetch and re-render.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn update_cart_item(&mut self, product_id: ProductId, quantity: u32) -> Result<()> {
        let Some(session) = self.session.clone() else {
            return Ok(());
        };

        match self
            .api
            .update_cart_item(&session.id, product_id, quantity)
            .await
        {
            Ok(()) => self.refresh_cart(&session).await?,
            Err(e) => {
                tracing::warn!("failed to update cart: {e}");
                self.show_notice("Failed to update cart", NoticeKind::Error);
            }
        }
        Ok(())
    }

    /// Remove a cart line, then re-fetch and re-render.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn remove_from_cart(&mut self, product_id: ProductId) -> Result<()> {
        let Some(session) = self.session.clone() else {
            return Ok(());
        };

        match self.api.remove_from_cart(&session.id, product_id).await {
            Ok(()) => {
                self.show_notice("Item removed", NoticeKind::Success);
                self.refresh_cart(&session).await?;
            }
            Err(e) => {
                tracing::warn!("failed to remove cart item: {e}");
                self.show_notice("Failed to remove item", NoticeKind::Error);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Checkout submission
    // =========================================================================

    /// Handle the checkout form submit.
    ///
    /// The three payment guards run first; any violation blocks submission
    /// entirely, marks the failing fields inline, and shows the aggregate
    /// notice. On success the response either carries a receipt (shown on
    /// the configured document surface) or a success notice plus a
    /// deferred navigation to order history.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn submit_checkout(
        &mut self,
        method: PaymentMethod,
        card: &CardDetails,
    ) -> Result<()> {
        let Some(session) = self.session.clone() else {
            return Ok(());
        };

        if let Err(errors) = card.validate() {
            let summary = self
                .checkout_summary
                .clone()
                .unwrap_or_else(CheckoutSummaryView::unavailable);
            self.page.section = CheckoutTemplate::new(summary)
                .with_errors(&errors)
                .render()?;
            self.show_notice(errors.aggregate_message(), NoticeKind::Error);
            return Ok(());
        }

        let details = card.payment_details();
        match self
            .api
            .checkout(&session.id, method.as_str(), &details)
            .await
        {
            Ok(response) => {
                self.checkout_summary = None;
                if let Some(receipt) = response.payment.receipt.as_ref() {
                    let html = ReceiptTemplate::new(receipt).render()?;
                    self.open_document(html);
                } else {
                    self.show_notice("Order placed successfully!", NoticeKind::Success);
                    self.scheduler.schedule(
                        TimerSlot::Navigation,
                        CHECKOUT_REDIRECT_DELAY,
                        TimedEvent::OpenOrders,
                    );
                }
            }
            Err(err) => {
                let text = err.detail().unwrap_or("Checkout failed").to_owned();
                self.show_notice(text, NoticeKind::Error);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// Fetch and display an order's receipt.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn view_receipt(&mut self, order_id: OrderId) -> Result<()> {
        let Some(session) = self.session.clone() else {
            return Ok(());
        };

        match self.api.order_receipt(&session.id, order_id).await {
            Ok(receipt) => {
                let html = ReceiptTemplate::new(&receipt).render()?;
                self.open_document(html);
            }
            Err(err @ ApiError::Api { .. }) => {
                tracing::debug!("no receipt for order {order_id}: {err}");
                self.show_notice("Receipt not available", NoticeKind::Error);
            }
            Err(e) => {
                tracing::warn!("failed to load receipt: {e}");
                self.show_notice("Failed to load receipt", NoticeKind::Error);
            }
        }
        Ok(())
    }

    /// Fetch and display an order's invoice (admin).
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn view_invoice(&mut self, order_id: OrderId) -> Result<()> {
        let Some(session) = self.session.clone() else {
            return Ok(());
        };

        match self.api.order_invoice(&session.id, order_id).await {
            Ok(invoice) => {
                let html = InvoiceTemplate::new(&invoice).render()?;
                self.open_document(html);
            }
            Err(err @ ApiError::Api { .. }) => {
                tracing::debug!("no invoice for order {order_id}: {err}");
                self.show_notice("Invoice not available", NoticeKind::Error);
            }
            Err(e) => {
                tracing::warn!("failed to load invoice: {e}");
                self.show_notice("Failed to load invoice", NoticeKind::Error);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Admin panel
    // =========================================================================

    /// Nav action: the admin panel, landing on the product editor tab.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn show_admin_panel(&mut self) -> Result<()> {
        if self.gate(View::Admin) {
            return Ok(());
        }
        self.reload_admin_products().await
    }

    /// The admin panel's "All Orders" tab.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn show_admin_orders(&mut self) -> Result<()> {
        if self.gate(View::Admin) {
            return Ok(());
        }
        let Some(session) = self.session.clone() else {
            return Ok(());
        };

        match self.api.orders(&session.id).await {
            Ok(orders) => {
                let section = AdminOrdersTemplate::new(&orders).render()?;
                self.show_section(View::Admin, section)?;
            }
            Err(e) => {
                tracing::warn!("failed to load orders: {e}");
                self.show_notice("Failed to load orders", NoticeKind::Error);
            }
        }
        Ok(())
    }

    /// Submit a full-field product update. Success or failure surfaces as
    /// a notice only; the editor keeps its current contents and the list
    /// is not re-fetched.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn update_product(
        &mut self,
        product_id: ProductId,
        update: ProductUpdate,
    ) -> Result<()> {
        let Some(session) = self.session.clone() else {
            return Ok(());
        };

        match self.api.update_product(&session.id, product_id, &update).await {
            Ok(()) => self.show_notice("Product updated!", NoticeKind::Success),
            Err(e) => {
                tracing::warn!("failed to update product {product_id}: {e}");
                self.show_notice("Failed to update product", NoticeKind::Error);
            }
        }
        Ok(())
    }

    /// Change an order's status from the admin select. Notice only; the
    /// row is not re-rendered.
    ///
    /// # Errors
    ///
    /// Returns an error only when a template fails to render.
    pub async fn update_order_status(
        &mut self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<()> {
        let Some(session) = self.session.clone() else {
            return Ok(());
        };

        match self
            .api
            .update_order_status(&session.id, order_id, status)
            .await
        {
            Ok(()) => self.show_notice("Order status updated!", NoticeKind::Success),
            Err(e) => {
                tracing::warn!("failed to update order {order_id} status: {e}");
                self.show_notice("Failed to update order status", NoticeKind::Error);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Role/sign-in gate for a nav action. Returns `true` (and shows a
    /// notice) when the navigation is refused. A manual nav action also
    /// cancels any pending automatic navigation.
    fn gate(&mut self, target: View) -> bool {
        self.scheduler.cancel(TimerSlot::Navigation);
        if let Err(e) = self.views.check(target) {
            self.show_notice(e.to_string(), NoticeKind::Error);
            return true;
        }
        false
    }

    fn show_notice(&mut self, text: impl Into<String>, kind: NoticeKind) {
        self.notice = Some(Notice::new(text, kind));
        self.scheduler
            .schedule(TimerSlot::Notice, NOTICE_DURATION, TimedEvent::HideNotice);
    }

    fn open_document(&mut self, html: String) {
        self.page.document = Some(RenderedDocument {
            html,
            surface: self.options.document_surface,
        });
    }

    /// Switch to `view` with freshly rendered section content.
    fn show_section(&mut self, view: View, section: String) -> Result<()> {
        if let Err(e) = self.views.navigate(view) {
            tracing::warn!("refused navigation to {view:?} after render: {e}");
            return Ok(());
        }
        self.page.view = view;
        self.page.section = section;
        self.page.header = self.render_header()?;
        Ok(())
    }

    fn render_header(&self) -> Result<Option<String>> {
        Ok(match self.views.user() {
            Some(user) => Some(HeaderTemplate::new(user, self.cart_count).render()?),
            None => None,
        })
    }

    fn render_login(&mut self) -> Result<()> {
        self.page = Page {
            view: View::Login,
            header: None,
            section: LoginTemplate::default().render()?,
            document: None,
        };
        Ok(())
    }

    /// Fetch and render the product grid (customer main view).
    async fn reload_products(&mut self) -> Result<()> {
        match self.api.products().await {
            Ok(products) => {
                let section = ProductsTemplate::new(&products).render()?;
                self.show_section(View::Products, section)?;
            }
            Err(e) => {
                tracing::warn!("failed to load products: {e}");
                self.show_notice("Failed to load products", NoticeKind::Error);
            }
        }
        Ok(())
    }

    /// Fetch and render the admin product editor (admin main view).
    async fn reload_admin_products(&mut self) -> Result<()> {
        match self.api.products().await {
            Ok(products) => {
                let section = AdminProductsTemplate::new(&products).render()?;
                self.show_section(View::Admin, section)?;
            }
            Err(e) => {
                tracing::warn!("failed to load products: {e}");
                self.show_notice("Failed to load products", NoticeKind::Error);
            }
        }
        Ok(())
    }

    /// Re-fetch the cart after a mutation: the badge always updates, and
    /// the cart section re-renders when it is the visible view.
    async fn refresh_cart(&mut self, session: &Session) -> Result<()> {
        match self.api.cart(&session.id).await {
            Ok(cart) => {
                self.cart_count = cart.item_count;
                if self.views.current() == View::Cart {
                    self.page.section = CartTemplate::new(&cart).render()?;
                }
                self.page.header = self.render_header()?;
            }
            Err(e) => {
                tracing::warn!("failed to reload cart: {e}");
                self.show_notice("Failed to load cart", NoticeKind::Error);
            }
        }
        Ok(())
    }
}
