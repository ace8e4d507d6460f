use checkout_engine::application::checkout::{CheckoutOrchestrator, Collaborators};
use checkout_engine::application::pricing::PricingEngine;
use checkout_engine::config::load_pricing_table;
use checkout_engine::domain::customer::{Customer, LoyaltyTier, Region};
use checkout_engine::infrastructure::in_memory::{
    InMemoryCartRepository, InMemoryCustomerDirectory, InMemoryPaymentGateway, InMemoryWarehouse,
};
use checkout_engine::interfaces::csv::cart_reader::CartReader;
use checkout_engine::interfaces::csv::stock_reader::StockReader;
use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const CUSTOMER_ID: u64 = 1;
const CART_ID: u64 = 1;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Price a cart and print the cost breakdown
    Quote {
        #[command(flatten)]
        cart: CartArgs,

        /// Use the legacy profile (no region, tier or cubic weight)
        #[arg(long)]
        simplified: bool,
    },
    /// Run the full checkout against in-memory stock and payment services
    Finalize {
        #[command(flatten)]
        cart: CartArgs,

        /// Stock levels CSV file (`product, available`)
        #[arg(long)]
        stock: PathBuf,

        /// Deny payments above this amount
        #[arg(long)]
        credit_limit: Option<Decimal>,
    },
}

#[derive(Args)]
struct CartArgs {
    /// Cart lines CSV file
    input: PathBuf,

    /// Delivery region
    #[arg(long, value_enum, default_value = "southeast")]
    region: Region,

    /// Customer loyalty tier
    #[arg(long, value_enum, default_value = "bronze")]
    tier: LoyaltyTier,

    /// Pricing table JSON file (defaults to the standard price list)
    #[arg(long)]
    pricing: Option<PathBuf>,
}

fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Quote { cart, simplified } => {
            let engine =
                PricingEngine::new(load_pricing_table(cart.pricing.as_deref()).into_diagnostic()?);
            let file = File::open(&cart.input).into_diagnostic()?;
            let today = chrono::Local::now().date_naive();
            let basket = CartReader::new(file)
                .into_cart(CART_ID, CUSTOMER_ID, today)
                .into_diagnostic()?;

            let breakdown = if simplified {
                engine.simplified_quote(Some(&basket))
            } else {
                engine.quote(Some(&basket), cart.region, cart.tier)
            }
            .into_diagnostic()?;

            println!(
                "{}",
                serde_json::to_string_pretty(&breakdown).into_diagnostic()?
            );
        }
        Command::Finalize {
            cart,
            stock,
            credit_limit,
        } => {
            let engine =
                PricingEngine::new(load_pricing_table(cart.pricing.as_deref()).into_diagnostic()?);

            let customers = InMemoryCustomerDirectory::new();
            customers
                .store(Customer::new(CUSTOMER_ID, cart.region, cart.tier))
                .await;

            let carts = InMemoryCartRepository::new();
            let today = chrono::Local::now().date_naive();
            let basket = CartReader::new(File::open(&cart.input).into_diagnostic()?)
                .into_cart(CART_ID, CUSTOMER_ID, today)
                .into_diagnostic()?;
            carts.store(basket).await;

            let warehouse = InMemoryWarehouse::new();
            for level in StockReader::new(File::open(&stock).into_diagnostic()?).levels() {
                let level = level.into_diagnostic()?;
                warehouse.set_stock(level.product, level.available).await;
            }

            let gateway = match credit_limit {
                Some(limit) => InMemoryPaymentGateway::new().with_credit_limit(limit),
                None => InMemoryPaymentGateway::new(),
            };

            let orchestrator = CheckoutOrchestrator::new(
                engine,
                Collaborators {
                    customers: Box::new(customers),
                    carts: Box::new(carts),
                    availability: Box::new(warehouse.clone()),
                    deduction: Box::new(warehouse),
                    authorization: Box::new(gateway.clone()),
                    cancellation: Box::new(gateway),
                },
            );

            let result = orchestrator
                .finalize_purchase(CART_ID, CUSTOMER_ID)
                .await
                .into_diagnostic()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&result).into_diagnostic()?
            );
        }
    }

    Ok(())
}
