//! Utils

use std::path::PathBuf;

use clap::Parser;
use jiff::Timestamp;

use crate::orders::Customer;

/// Arguments for the checkout demo
#[derive(Debug, Parser)]
pub struct CheckoutDemoArgs {
    /// Pricing configuration file
    #[arg(
        short,
        long,
        env = "MOSTRADOR_CONFIG",
        default_value = "./fixtures/config/default.yml"
    )]
    pub config: PathBuf,

    /// Catalog fixture to load from `fixtures/catalogs`
    #[arg(short = 'k', long, env = "MOSTRADOR_CATALOG", default_value = "tienda")]
    pub catalog: String,

    /// Catalog ids to add, one unit per entry
    #[arg(
        short = 'a',
        long = "add",
        value_delimiter = ',',
        default_value = "ram-ddr5-16,ram-ddr5-16,pc-gamer-r5"
    )]
    pub items: Vec<String>,

    /// Instant to price the cart at (RFC 3339), defaults to the current time
    #[arg(long)]
    pub now: Option<Timestamp>,

    /// Customer name
    #[arg(long, default_value = "Cliente de prueba")]
    pub name: String,

    /// Customer phone
    #[arg(long, default_value = "8888-0000")]
    pub phone: String,

    /// Customer delivery address
    #[arg(long)]
    pub address: Option<String>,

    /// Customer email
    #[arg(long)]
    pub email: Option<String>,

    /// Directory the cart is saved in between runs
    #[arg(long, default_value = "target/mostrador")]
    pub state_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl CheckoutDemoArgs {
    /// Pricing instant: `--now` if given, otherwise the current time.
    pub fn now(&self) -> Timestamp {
        self.now.unwrap_or_else(Timestamp::now)
    }

    /// Customer built from the contact arguments.
    pub fn customer(&self) -> Customer {
        let mut customer = Customer::new(&self.name, &self.phone);

        if let Some(address) = &self.address {
            customer = customer.with_address(address);
        }

        if let Some(email) = &self.email {
            customer = customer.with_email(email);
        }

        customer
    }
}
