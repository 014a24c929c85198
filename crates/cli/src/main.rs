//! Sleep Outside CLI - drive the cart against an on-disk store.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart (normalizing and rewriting the stored cart)
//! so-cli show
//!
//! # Add a product from the catalog
//! so-cli add --id 880RR --name "Marmot Ajax Tent" --price 199.99 --quantity 2
//!
//! # Change a quantity (invalid or sub-one input becomes 1)
//! so-cli set-quantity 880RR 3
//!
//! # Remove a product
//! so-cli remove 880RR
//!
//! # Fire UI events at rendered controls
//! so-cli click cart-item-0-remove
//! so-cli change cart-item-0-quantity 4
//! ```
//!
//! # Commands
//!
//! - `show` - Display the cart
//! - `add` - Add a product to the cart
//! - `remove` - Remove a product
//! - `set-quantity` - Set a line's quantity
//! - `count` - Print the item-count badge value
//! - `click` / `change` - Dispatch UI events through the event registry

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use sleep_outside_core::Price;
use sleep_outside_storefront::cart::CartController;
use sleep_outside_storefront::config::StorefrontConfig;
use sleep_outside_storefront::error::AppError;
use sleep_outside_storefront::storage::FileStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::cart::NewItem;

#[derive(Parser)]
#[command(name = "so-cli")]
#[command(author, version, about = "Sleep Outside cart tools")]
struct Cli {
    /// Store file (overrides `SO_STORAGE_PATH`)
    #[arg(short, long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the cart
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Product name
        #[arg(long)]
        name: String,

        /// Unit price (e.g. 199.99)
        #[arg(long)]
        price: Price,

        /// Quantity (invalid or sub-one values become 1)
        #[arg(short, long, allow_hyphen_values = true)]
        quantity: Option<String>,

        /// Image URL
        #[arg(long)]
        image: Option<String>,

        /// Primary color name
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: String,
    },
    /// Set the quantity of a product in the cart
    SetQuantity {
        /// Product ID
        id: String,

        /// New quantity, as typed into the quantity input
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Print the number of items in the cart
    Count,
    /// Click a rendered control (e.g. `cart-item-0-remove`)
    Click {
        /// Control element id
        control: String,
    },
    /// Change the value of a rendered input (e.g. `cart-item-0-quantity`)
    Change {
        /// Control element id
        control: String,

        /// New input value
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn main() {
    let cli = Cli::parse();

    // Load configuration first: the Sentry DSN comes from it
    let config = StorefrontConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sleep_outside_storefront=info,so_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = config
        .map_err(|e| Box::new(AppError::from(e)) as Box<dyn std::error::Error>)
        .and_then(|config| run(cli, config));

    if let Err(e) = result {
        match e.downcast_ref::<AppError>() {
            Some(app_error) => app_error.capture(),
            None => tracing::error!("Command failed: {e}"),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage_path = cli.storage.unwrap_or(config.storage_path);
    tracing::debug!(path = %storage_path.display(), "Using store file");

    let mut cart = CartController::new(FileStore::new(storage_path), &config.cart);

    match cli.command {
        Commands::Show => commands::cart::show(&mut cart)?,
        Commands::Add {
            id,
            name,
            price,
            quantity,
            image,
            color,
        } => commands::cart::add(
            &mut cart,
            NewItem {
                id,
                name,
                price,
                quantity,
                image,
                color,
            },
        )?,
        Commands::Remove { id } => commands::cart::remove(&mut cart, &id)?,
        Commands::SetQuantity { id, value } => {
            commands::cart::set_quantity(&mut cart, &id, &value)?;
        }
        Commands::Count => commands::cart::count(&mut cart)?,
        Commands::Click { control } => commands::cart::click(&mut cart, &control)?,
        Commands::Change { control, value } => {
            commands::cart::change(&mut cart, &control, &value)?;
        }
    }
    Ok(())
}
