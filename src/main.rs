//! Trolley storefront CLI

use std::{
    io::{self, Write},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use thiserror::Error;

use trolley::{
    config::{ConfigError, StorefrontConfig},
    logging::{self, LoggingError},
    prelude::*,
};

/// Trolley storefront
#[derive(Debug, Parser)]
#[command(name = "trolley", about = "Storefront shopping cart", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: StorefrontConfig,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Load configuration from `.env`, the environment and CLI arguments
    fn load() -> Result<Self, clap::Error> {
        // A missing .env file is fine
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the catalog
    Products,

    /// Add one unit of a catalog product to the cart
    Add {
        /// Product id
        id: String,
    },

    /// Remove a product from the cart
    Remove {
        /// Product id
        id: String,
    },

    /// Add one more unit of a product already in the cart
    Increase {
        /// Product id
        id: String,
    },

    /// Take one unit of a product off the cart
    Decrease {
        /// Product id
        id: String,
    },

    /// Set the quantity of a product in the cart; zero or less removes it
    Set {
        /// Product id
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Show the cart
    Show,

    /// Purchase and clear the cart
    Checkout,

    /// Empty the cart
    Clear,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let cli = match Cli::load() {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            #[expect(
                clippy::print_stderr,
                reason = "command errors are reported to the user regardless of log level"
            )]
            {
                eprintln!("error: {err}");
            }

            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    logging::init_subscriber(&cli.config.logging)?;

    let currency = cli.config.currency()?;
    let catalog = Catalog::load(&cli.config.catalog)?;
    let storage = FileStorage::open(&cli.config.data_dir)?;
    let store = CartStore::with_key(storage, cli.config.storage_key.clone());

    let mut shop = Storefront::new(catalog, store, currency);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Products => {
            CatalogListing::new(shop.catalog(), currency).write_to(&mut out)?;
        }
        Command::Add { id } => {
            settle(&mut out, shop.add_to_cart(&ProductId::parse(&id))?)?;
            show(&shop, &mut out)?;
        }
        Command::Remove { id } => {
            settle(&mut out, shop.remove(&ProductId::parse(&id)))?;
            show(&shop, &mut out)?;
        }
        Command::Increase { id } => {
            settle(&mut out, shop.increase(&ProductId::parse(&id))?)?;
            show(&shop, &mut out)?;
        }
        Command::Decrease { id } => {
            settle(&mut out, shop.decrease(&ProductId::parse(&id))?)?;
            show(&shop, &mut out)?;
        }
        Command::Set { id, quantity } => {
            settle(&mut out, shop.set_quantity(&ProductId::parse(&id), quantity)?)?;
            show(&shop, &mut out)?;
        }
        Command::Show => show(&shop, &mut out)?,
        Command::Checkout => match settle(&mut out, shop.checkout())? {
            Checkout::Completed(view) => {
                writeln!(out, "Purchase complete! Your cart has been cleared.")?;
                CartReceipt::new(&view).write_to(&mut out)?;
            }
            Checkout::EmptyCart => writeln!(out, "Your cart is empty!")?,
        },
        Command::Clear => {
            settle(&mut out, shop.clear())?;
            show(&shop, &mut out)?;
        }
    }

    Ok(())
}

fn show<S: KeyValueStorage>(shop: &Storefront<S>, out: &mut impl Write) -> Result<(), AppError> {
    let view = settle(out, shop.view())?;

    CartReceipt::new(&view).write_to(out)?;

    Ok(())
}

/// Unwraps an outcome, telling the user about any persistence failure it
/// absorbed.
fn settle<T>(out: &mut impl Write, outcome: Outcome<T>) -> Result<T, AppError> {
    for failure in outcome.failures() {
        writeln!(out, "warning: {failure}")?;
    }

    Ok(outcome.into_value())
}
