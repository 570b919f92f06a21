//! Cornershop CLI - interactive terminal storefront client.
//!
//! Drives the view-controller shell from stdin commands and writes the
//! rendered page to an HTML file after every action, so a browser pointed
//! at that file shows whatever a user of the original single-page client
//! would see.
//!
//! # Usage
//!
//! ```bash
//! # Connect to a local backend, writing the page next to the cwd
//! cornershop
//!
//! # Explicit backend and page file
//! cornershop --api-url http://127.0.0.1:8000 --page-file /tmp/shop.html
//! ```
//!
//! # Commands
//!
//! - `login <email> <password>` / `logout`
//! - `products`, `cart`, `orders`, `checkout`
//! - `add <product-id> [qty]`, `set <product-id> <qty>`, `remove <product-id>`
//! - `pay <wallet|bank|paypal> <card-number> <expiry> <cvc>`
//! - `receipt <order-id>`, `invoice <order-id>`, `close`
//! - `admin`, `admin-orders`, `edit <id> <price> <stock> <name> [description..]`,
//!   `status <order-id> <Placed|Processing|Shipped|Delivered|Cancelled>`

#![cfg_attr(not(test), forbid(unsafe_code))]
// Interactive REPL: stdout is the user interface.
#![allow(clippy::print_stdout)]

use std::path::{Path, PathBuf};

use clap::Parser;
use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

use cornershop_client::{ApiClient, ClientConfig, SessionStore};
use cornershop_core::{OrderId, OrderStatus, ProductId};
use cornershop_ui::{CardDetails, DocumentSurface, PaymentMethod, Shell, ShellOptions};

#[derive(Parser)]
#[command(name = "cornershop")]
#[command(author, version, about = "Cornershop terminal storefront client")]
struct Cli {
    /// Backend base URL (overrides CORNERSHOP_API_URL)
    #[arg(long)]
    api_url: Option<Url>,

    /// Session directory (overrides CORNERSHOP_SESSION_DIR)
    #[arg(long)]
    session_dir: Option<PathBuf>,

    /// File the rendered page is written to after every action
    #[arg(long, default_value = "cornershop-page.html")]
    page_file: PathBuf,

    /// Render receipts and invoices inline instead of as a modal dialog
    #[arg(long)]
    inline_documents: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing; default to info for our crates
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cornershop=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(session_dir) = cli.session_dir {
        config.session_dir = session_dir;
    }

    let api = ApiClient::new(&config);
    let store = SessionStore::new(config.session_dir.clone());
    let options = ShellOptions {
        document_surface: if cli.inline_documents {
            DocumentSurface::Inline
        } else {
            DocumentSurface::Modal
        },
    };

    let (mut shell, mut events) = Shell::new(api, store, options);
    shell.start().await?;
    write_page(&cli.page_file, &shell)?;
    println!(
        "Connected to {} - page at {} - type 'help' for commands",
        config.api_url,
        cli.page_file.display()
    );
    print_status(&shell);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match handle_command(&mut shell, line.trim()).await? {
                    Flow::Continue => {}
                    Flow::Quit => break,
                }
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                shell.handle_timed(event).await?;
            }
        }
        write_page(&cli.page_file, &shell)?;
        print_status(&shell);
    }

    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

async fn handle_command(
    shell: &mut Shell,
    line: &str,
) -> Result<Flow, Box<dyn std::error::Error>> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(Flow::Continue);
    };
    let args: Vec<&str> = words.collect();

    match (command, args.as_slice()) {
        ("help", _) => print_help(),
        ("quit" | "exit", _) => return Ok(Flow::Quit),

        ("login", [email, password]) => {
            shell
                .login(email, SecretString::from((*password).to_owned()))
                .await?;
        }
        ("logout", _) => shell.logout().await?,

        ("products", _) => shell.show_products().await?,
        ("cart", _) => shell.show_cart().await?,
        ("orders", _) => shell.show_orders().await?,
        ("checkout", _) => shell.show_checkout().await?,

        ("add", [product_id, rest @ ..]) => {
            let product_id: ProductId = product_id.parse()?;
            let quantity = match rest {
                [] => 1,
                [qty, ..] => qty.parse()?,
            };
            shell.add_to_cart(product_id, quantity).await?;
        }
        ("set", [product_id, quantity]) => {
            shell
                .update_cart_item(product_id.parse()?, quantity.parse()?)
                .await?;
        }
        ("remove", [product_id]) => {
            shell.remove_from_cart(product_id.parse()?).await?;
        }

        ("pay", [method, number, expiry, cvc]) => {
            let method: PaymentMethod = method.parse().map_err(string_error)?;
            let card = CardDetails {
                number: (*number).to_owned(),
                expiry: (*expiry).to_owned(),
                cvc: (*cvc).to_owned(),
            };
            shell.submit_checkout(method, &card).await?;
        }

        ("receipt", [order_id]) => shell.view_receipt(order_id.parse()?).await?,
        ("invoice", [order_id]) => shell.view_invoice(order_id.parse()?).await?,
        ("close", _) => shell.close_document(),

        ("admin", _) => shell.show_admin_panel().await?,
        ("admin-orders", _) => shell.show_admin_orders().await?,
        ("edit", [product_id, price, stock, name, description @ ..]) => {
            let update = cornershop_client::types::ProductUpdate {
                name: (*name).to_owned(),
                price: price.parse()?,
                stock: stock.parse()?,
                description: description.join(" "),
            };
            shell.update_product(product_id.parse()?, update).await?;
        }
        ("status", [order_id, status]) => {
            let order_id: OrderId = order_id.parse()?;
            let status: OrderStatus = status.parse().map_err(string_error)?;
            shell.update_order_status(order_id, status).await?;
        }

        _ => println!("Unknown or malformed command - type 'help'"),
    }

    Ok(Flow::Continue)
}

/// Wrap a `String` parse error so it boxes as a std error.
fn string_error(message: String) -> Box<dyn std::error::Error> {
    message.into()
}

fn print_help() {
    println!(
        "Commands:\n\
         \x20 login <email> <password>     sign in\n\
         \x20 logout                       sign out and clear the session\n\
         \x20 products | cart | orders     switch views\n\
         \x20 add <product-id> [qty]       add to cart\n\
         \x20 set <product-id> <qty>       change a cart line's quantity\n\
         \x20 remove <product-id>          remove a cart line\n\
         \x20 checkout                     open the checkout view\n\
         \x20 pay <method> <card> <MM/YYYY> <cvc>   place the order\n\
         \x20 receipt <order-id>           view an order's receipt\n\
         \x20 invoice <order-id>           view an order's invoice (admin)\n\
         \x20 close                        dismiss the open document\n\
         \x20 admin | admin-orders         admin panel tabs\n\
         \x20 edit <id> <price> <stock> <name> [description..]   update a product (admin)\n\
         \x20 status <order-id> <status>   change an order's status (admin)\n\
         \x20 quit"
    );
}

fn print_status(shell: &Shell) {
    if let Some(notice) = shell.notice() {
        println!("[{}] {}", notice.kind.css_class(), notice.text);
    }
    let user = shell
        .current_user()
        .map_or_else(|| "signed out".to_owned(), |u| u.email.to_string());
    println!(
        "-- {} | {} | cart: {}",
        shell.page().view.title(),
        user,
        shell.cart_count()
    );
}

/// Minimal HTML escaping for text the page assembler splices in itself.
/// Section content is already escaped by the templates.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Assemble and write the full page: header, notice bar, active section,
/// and the document overlay when one is open.
fn write_page(path: &Path, shell: &Shell) -> std::io::Result<()> {
    let page = shell.page();
    let mut html = String::new();
    html.push_str(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Cornershop</title>\n<link rel=\"stylesheet\" href=\"static/style.css\">\n\
         </head>\n<body>\n",
    );

    if let Some(header) = &page.header {
        html.push_str(header);
    }
    if let Some(notice) = shell.notice() {
        html.push_str(&format!(
            "<div id=\"message\" class=\"message {}\">{}</div>\n",
            notice.kind.css_class(),
            escape_html(&notice.text)
        ));
    }
    html.push_str(&page.section);
    if let Some(document) = &page.document {
        match document.surface {
            DocumentSurface::Modal => {
                html.push_str("<div id=\"receipt-modal\" class=\"modal show\"><div id=\"receipt-content\" class=\"modal-content\">\n");
                html.push_str(&document.html);
                html.push_str("</div></div>\n");
            }
            DocumentSurface::Inline => {
                html.push_str("<div class=\"overlay-inline\">\n");
                html.push_str(&document.html);
                html.push_str("</div>\n");
            }
        }
    }
    html.push_str("</body>\n</html>\n");

    std::fs::write(path, html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"fish" & chips</b>"#),
            "&lt;b&gt;&quot;fish&quot; &amp; chips&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
