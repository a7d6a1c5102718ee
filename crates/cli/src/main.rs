//! Cartkit CLI - a storefront page session in the terminal.
//!
//! Each invocation loads the persisted cart, runs one page against the
//! storefront backend and prints the resulting page.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog
//! cartkit products
//!
//! # Add one unit of product 1, then drop it again
//! cartkit add 1
//! cartkit remove 1
//!
//! # Show the cart and place the order
//! cartkit show
//! cartkit checkout
//!
//! # Order history of the signed-in customer
//! CARTKIT_SESSION_COOKIE="session=..." cartkit orders
//! ```
//!
//! # Environment Variables
//!
//! - `CARTKIT_API_URL` - Backend base URL (default `http://127.0.0.1:5000`)
//! - `CARTKIT_STORAGE_PATH` - File the cart is persisted in
//! - `CARTKIT_SESSION_COOKIE` - Cookie sent with API requests
//! - `SENTRY_DSN` - Enables error reporting when set

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use cartkit_core::ProductId;
use cartkit_storefront::config::StorefrontConfig;
use cartkit_storefront::error::AppError;
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod terminal;

#[derive(Parser)]
#[command(name = "cartkit")]
#[command(author, version, about = "Cartkit storefront session")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the products on sale
    Products,
    /// Add one unit of a product to the cart
    Add {
        /// Product id as shown by `cartkit products`
        id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Show the cart
    Show,
    /// Place an order for the cart
    Checkout,
    /// Show the signed-in customer's order history
    Orders,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
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

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", AppError::from(e));
            return ExitCode::FAILURE;
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cartkit_cli=info,cartkit_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    tracing::debug!(?config, "Configuration loaded");

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Products => commands::catalog::list(config).await,
        Commands::Add { id } => commands::cart::add(config, id).await,
        Commands::Remove { id } => commands::cart::remove(config, id).await,
        Commands::Show => commands::cart::show(config).await,
        Commands::Checkout => commands::cart::checkout(config).await,
        Commands::Orders => commands::orders::history(config).await,
    }
}
