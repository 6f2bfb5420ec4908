//! CLI command implementations.

pub mod cart;
pub mod config;
pub mod totals;

use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,

    /// Use a separate cart for this session name.
    #[arg(short, long, global = true)]
    pub session: Option<String>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add a product to the cart.
    Add(AddArgs),
    /// Remove a product from the cart.
    Remove {
        /// Product ID.
        id: String,
    },
    /// Set a line's quantity (0 removes it).
    Set {
        /// Product ID.
        id: String,
        /// New quantity.
        quantity: String,
    },
    /// Remove every line.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the cart.
    Show,
}

/// Arguments for `cart add`.
#[derive(Args)]
pub struct AddArgs {
    /// Product ID.
    pub id: String,

    /// Product name.
    pub name: String,

    /// Unit price in minor currency units.
    #[arg(allow_hyphen_values = true)]
    pub price: i64,

    /// Units to add.
    #[arg(short, long, default_value = "1")]
    pub quantity: String,

    /// Units in stock.
    #[arg(long)]
    pub stock: Option<u32>,

    /// Image URL.
    #[arg(long)]
    pub image: Option<String>,

    /// Brand name.
    #[arg(long)]
    pub brand: Option<String>,

    /// Model name.
    #[arg(long, requires = "brand")]
    pub model: Option<String>,

    /// Category key.
    #[arg(long)]
    pub category: Option<String>,
}

/// Arguments for the totals command.
#[derive(Args)]
pub struct TotalsArgs {
    /// Discount amount already confirmed for this order.
    #[arg(short, long, default_value_t = 0)]
    pub discount: i64,

    /// Loyalty points to redeem.
    #[arg(short, long, default_value_t = 0)]
    pub points: u64,

    /// Loyalty points available.
    #[arg(short, long, default_value_t = 0)]
    pub balance: u64,

    /// Use a separate cart for this session name.
    #[arg(short, long)]
    pub session: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
