//! Catalog CLI - Product API and local cart from the command line.
//!
//! # Usage
//!
//! ```bash
//! # List all products
//! catalog products list
//!
//! # Create a product from JSON
//! catalog products add '{"id": 5, "name": "Pineapple chips", "price": 4.5}'
//!
//! # Change one field
//! catalog products update 5 '{"price": 3.99}'
//!
//! # Put product 5 in the cart (fetched from the API), then inspect the cart
//! catalog cart add 5
//! catalog cart show
//! ```
//!
//! # Commands
//!
//! - `products` - list, get, exists, add, update, delete
//! - `cart` - show, add, add-json, increment, decrement, clear
//!
//! Results are written to stdout as pretty-printed JSON; logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use catalog_client::{CatalogClient, CatalogConfig};

mod commands;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about = "Product catalog and cart tools")]
struct Cli {
    /// Product API base endpoint (overrides `CATALOG_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Cart storage directory (overrides `CATALOG_STORAGE_DIR`)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query and manage products on the backend
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Inspect and change the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List all products
    List,
    /// Show one product
    Get {
        /// Product ID
        id: String,
    },
    /// Check whether a product ID is taken
    Exists {
        /// Product ID
        id: String,
    },
    /// Create a product from a JSON object
    Add {
        /// Product JSON, must include `id`
        json: String,
    },
    /// Update some fields of a product
    Update {
        /// Product ID
        id: String,
        /// JSON object with the fields to change
        json: String,
    },
    /// Delete a product
    Delete {
        /// Product ID
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart
    Show,
    /// Fetch a product from the API and add one unit to the cart
    Add {
        /// Product ID
        id: String,
    },
    /// Add one unit of a product given as JSON, without calling the API
    AddJson {
        /// Product JSON, must include `id`
        json: String,
    },
    /// Add one more unit of a product already in the cart
    Increment {
        /// Product ID
        id: String,
    },
    /// Remove one unit; the product leaves the cart at zero
    Decrement {
        /// Product ID
        id: String,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays machine-readable.
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "catalog_client=info,catalog=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let mut config = CatalogConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config = CatalogConfig::new(&api_url, config.storage_dir)?;
    }
    if let Some(storage_dir) = cli.storage_dir {
        config.storage_dir = storage_dir;
    }

    let client = CatalogClient::from_config(&config)?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductAction::List => commands::products::list(&client).await,
            ProductAction::Get { id } => commands::products::get(&client, &id).await,
            ProductAction::Exists { id } => commands::products::exists(&client, &id).await,
            ProductAction::Add { json } => commands::products::add(&client, &json).await,
            ProductAction::Update { id, json } => {
                commands::products::update(&client, &id, &json).await
            }
            ProductAction::Delete { id } => commands::products::delete(&client, &id).await,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&client),
            CartAction::Add { id } => commands::cart::add(&client, &id).await,
            CartAction::AddJson { json } => commands::cart::add_json(&client, &json),
            CartAction::Increment { id } => commands::cart::increment(&client, &id),
            CartAction::Decrement { id } => commands::cart::decrement(&client, &id),
            CartAction::Clear => commands::cart::clear(&client),
        },
    }
}
