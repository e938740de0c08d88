use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use techmart_storefront::{
    client::{CartReconciler, CatalogQuery, HttpStore, RemoteStore, Session, SortBy, StoreError},
    config::ClientConfig,
    models::{Cart, Category, format_price},
};

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Browse the TechMart catalog, manage the cart and place orders")]
struct Cli {
    /// API base URL; falls back to TECHMART_API_URL.
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in seconds; falls back to TECHMART_TIMEOUT_SECS.
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[arg(short, long, env = "TECHMART_USERNAME", default_value = "admin")]
    username: String,

    #[arg(short, long, env = "TECHMART_PASSWORD")]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the catalog.
    Items {
        #[arg(short, long, default_value = "")]
        search: String,
        /// Display name or slug, e.g. "electronics" or "food-beverages".
        #[arg(short, long)]
        category: Option<Category>,
        /// name, price-low, price-high or rating.
        #[arg(long, default_value = "name")]
        sort: SortBy,
    },
    /// Show the cart and its total.
    Cart,
    /// Add an item to the cart.
    Add {
        item_id: i32,
        #[arg(short, long, default_value_t = 1)]
        quantity: i32,
    },
    /// Remove an item's line from the cart.
    Remove { item_id: i32 },
    /// Turn the cart into an order.
    Checkout,
    /// Show order history.
    Orders,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(api_url) = cli.api_url.clone() {
        config.api_url = api_url;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }

    let store = HttpStore::new(&config)?;
    let reconciler = CartReconciler::new(store);

    if let Err(err) = run(&cli, &reconciler).await {
        match err.downcast_ref::<StoreError>() {
            Some(store_err) => bail!("{}", store_err.user_message()),
            None => return Err(err),
        }
    }
    Ok(())
}

async fn run(cli: &Cli, reconciler: &CartReconciler<HttpStore>) -> anyhow::Result<()> {
    if let Command::Items {
        search,
        category,
        sort,
    } = &cli.command
    {
        let items = reconciler.store().list_items().await?;
        let query = CatalogQuery {
            search: search.clone(),
            category: *category,
            sort_by: *sort,
        };
        for item in query.apply(&items) {
            let stock = if item.in_stock { "" } else { "  (out of stock)" };
            println!(
                "#{:<3} {:<40} {:>12}  {:<18} {:.1}★ ({} reviews){stock}",
                item.id,
                item.name,
                format_price(item.price),
                item.category.as_str(),
                item.rating,
                item.reviews,
            );
        }
        return Ok(());
    }

    let mut session = login(cli, reconciler.store()).await?;

    match &cli.command {
        Command::Items { .. } => {}
        Command::Cart => {
            let cart = reconciler.load_cart(&session).await?;
            print_cart(&cart);
        }
        Command::Add { item_id, quantity } => {
            reconciler.load_cart_count(&session).await;
            let count = reconciler.add_to_cart(&session, *item_id, *quantity).await?;
            println!("Item added to cart! Cart: {count} item(s)");
        }
        Command::Remove { item_id } => {
            let cart = reconciler.remove_from_cart(&session, *item_id).await?;
            println!("Item removed from cart");
            print_cart(&cart);
        }
        Command::Checkout => {
            let receipt = reconciler.checkout(&session).await?;
            println!(
                "Order #{} created with total: {}",
                receipt.order_id,
                format_price(receipt.total)
            );
        }
        Command::Orders => {
            let orders = reconciler.store().list_orders(&session).await?;
            let badge = reconciler.load_cart_count(&session).await;
            println!("Cart: {badge} item(s)");
            if orders.is_empty() {
                println!("No orders yet");
            }
            for order in orders {
                println!(
                    "Order #{}  {}  {}  [{}]",
                    order.id,
                    order.created_at.format("%B %-d, %Y %H:%M"),
                    format_price(order.total),
                    order.status
                );
                for line in &order.cart.items {
                    println!(
                        "    {} x{}  {} each  {} total",
                        line.item.name,
                        line.quantity,
                        format_price(line.price),
                        format_price(line.line_total())
                    );
                }
            }
        }
    }

    reconciler.teardown().await;
    session.logout();
    Ok(())
}

async fn login(cli: &Cli, store: &HttpStore) -> anyhow::Result<Session> {
    let password = cli
        .password
        .as_deref()
        .context("a password is required: pass --password or set TECHMART_PASSWORD")?;
    Ok(Session::login(store, &cli.username, password).await?)
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }
    for line in &cart.items {
        println!(
            "#{:<3} {:<40} x{:<3} {:>12} each {:>12}",
            line.item_id,
            line.item.name,
            line.quantity,
            format_price(line.price),
            format_price(line.line_total())
        );
    }
    println!("Total: {} ({} item(s))", format_price(cart.total()), cart.item_count());
}
