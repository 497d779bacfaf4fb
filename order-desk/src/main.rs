//! order-desk - headless restaurant order desk
//!
//! Loads `.env`, scopes itself to the owner's active restaurant and either
//! runs a single order action or watches the order list until Ctrl-C.

mod cli;
mod logger;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use desk_client::{
    ClientConfig, FileSession, Gateways, MemorySession, MenuNameResolver, Order, OrderPoller,
    OrderSyncEngine, RestaurantDirectory, Session, SessionProvider,
};
use shared::OrderStatus;
use tracing::{info, warn};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = logger::init_logger(cli.log_level.as_deref(), cli.log_dir.as_deref());

    let mut config = ClientConfig::from_env();
    let session = open_session(&cli, &config)?;

    if cli.command() == Command::Logout {
        session.clear()?;
        info!("Session cleared");
        return Ok(());
    }

    if config.access_token.is_none()
        && let Some(token) = session.access_token()
    {
        config = config.with_token(token);
    }

    info!(
        orders = %config.order_api_url,
        restaurants = %config.restaurant_api_url,
        menus = %config.menu_api_url,
        "Starting order desk"
    );
    let gateways = config
        .build_gateways()
        .context("Failed to build HTTP gateways")?;

    let directory = RestaurantDirectory::from_gateways(&gateways, session.clone());
    select_restaurant(&cli, &directory, session.as_ref()).await?;

    let engine = Arc::new(OrderSyncEngine::from_gateways(&gateways, session.clone()));

    match cli.command() {
        Command::Watch => watch(engine, &gateways, &config).await,
        Command::Restaurants => {
            let active = session.active_restaurant_id();
            for restaurant in directory.load_owned().await? {
                let marker = if active.as_deref() == Some(restaurant.restaurant_id.as_str()) {
                    "*"
                } else {
                    " "
                };
                info!(
                    "{marker} {} {} (open: {}, verified: {})",
                    restaurant.restaurant_id, restaurant.name, restaurant.is_open, restaurant.is_verified
                );
            }
            Ok(())
        }
        Command::Accept { order_id } => {
            engine.refresh_active().await?;
            let order = engine.accept(&order_id).await?;
            info!(order_id = %order.order_id, status = %order.status, "Done");
            Ok(())
        }
        Command::Prepare { order_id } => {
            engine.refresh_active().await?;
            let order = engine.accept_and_prepare(&order_id).await?;
            info!(order_id = %order.order_id, status = %order.status, "Done");
            Ok(())
        }
        Command::Pickup { order_id } => {
            engine.refresh_active().await?;
            let order = engine.mark_waiting_for_pickup(&order_id).await?;
            info!(order_id = %order.order_id, status = %order.status, "Done");
            Ok(())
        }
        Command::Open | Command::Close => {
            let Some(restaurant_id) = session.active_restaurant_id() else {
                bail!("No active restaurant");
            };
            let is_open = cli.command() == Command::Open;
            directory.set_open(&restaurant_id, is_open).await?;
            Ok(())
        }
        Command::Logout => Ok(()),
    }
}

/// Open the session store and make sure it belongs to the requested user
fn open_session(cli: &Cli, config: &ClientConfig) -> Result<Arc<dyn SessionProvider>> {
    let session: Arc<dyn SessionProvider> = match &cli.session_file {
        Some(path) => Arc::new(
            FileSession::load(path)
                .with_context(|| format!("Failed to load session from {}", path.display()))?,
        ),
        None => Arc::new(MemorySession::default()),
    };

    if let Some(user_id) = &cli.user_id
        && session.user_id().as_ref() != Some(user_id)
    {
        let fresh = Session::new(user_id.clone(), config.access_token.clone());
        session.update(&mut |s| *s = fresh.clone())?;
    }

    if cli.command() != Command::Logout && session.user_id().is_none() {
        bail!("No user: pass --user-id or set DESK_USER_ID");
    }
    Ok(session)
}

/// Load owned restaurants when needed and apply `--restaurant`
async fn select_restaurant(
    cli: &Cli,
    directory: &RestaurantDirectory,
    session: &dyn SessionProvider,
) -> Result<()> {
    if session.active_restaurant_id().is_none() || cli.restaurant.is_some() {
        directory.load_owned().await?;
    }

    if let Some(restaurant_id) = &cli.restaurant
        && !session.select_restaurant(restaurant_id)?
    {
        bail!("Restaurant {restaurant_id} is not owned by this user");
    }

    match session.active_restaurant_id() {
        Some(id) => info!(restaurant_id = %id, "Active restaurant"),
        None => warn!("User owns no restaurants"),
    }
    Ok(())
}

async fn watch(engine: Arc<OrderSyncEngine>, gateways: &Gateways, config: &ClientConfig) -> Result<()> {
    let resolver = MenuNameResolver::new(gateways.menus.clone());
    if let Some(restaurant_id) = engine.session().active_restaurant_id()
        && let Err(e) = resolver.prime_restaurant(&restaurant_id).await
    {
        warn!(error = %e, "Could not preload menu");
    }

    let poller = OrderPoller::start(engine, config.poll_interval());
    let mut updates = poller.subscribe();
    let mut known: HashMap<String, OrderStatus> = HashMap::new();
    let mut last_error: Option<String> = None;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = updates.borrow_and_update().clone();
                if status.error != last_error {
                    match &status.error {
                        Some(e) => warn!(error = %e, "Orders are stale"),
                        None if last_error.is_some() => info!("Order sync recovered"),
                        None => {}
                    }
                    last_error = status.error.clone();
                }
                report_changes(&resolver, &mut known, &status.orders).await;
            }
        }
    }

    poller.stop().await;
    resolver.clear();
    Ok(())
}

async fn report_changes(
    resolver: &MenuNameResolver,
    known: &mut HashMap<String, OrderStatus>,
    orders: &[Order],
) {
    let changed: Vec<&Order> = orders
        .iter()
        .filter(|o| known.get(&o.order_id) != Some(&o.status))
        .collect();
    if changed.is_empty() {
        return;
    }

    let names = resolver.resolve_orders(orders).await;
    for order in changed {
        match known.get(&order.order_id) {
            Some(previous) => info!(
                order_id = %order.order_id,
                "{previous} -> {}", order.status
            ),
            None => info!(
                order_id = %order.order_id,
                status = %order.status,
                "{}",
                describe(order, &names)
            ),
        }
    }
    *known = orders
        .iter()
        .map(|o| (o.order_id.clone(), o.status.clone()))
        .collect();
}

/// One-line order summary, e.g. `2x Chicken Kottu, 1x Egg Hopper (1050.00)`
fn describe(order: &Order, names: &HashMap<String, String>) -> String {
    let items: Vec<String> = order
        .items
        .iter()
        .map(|item| {
            let name = names
                .get(&item.menu_id)
                .map(String::as_str)
                .unwrap_or(desk_client::UNKNOWN_ITEM);
            format!("{}x {name}", item.quantity)
        })
        .collect();
    format!("{} ({:.2})", items.join(", "), order.total_price)
}
