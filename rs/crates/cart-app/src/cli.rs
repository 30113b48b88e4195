use std::path::PathBuf;

use cart_api::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cart", version, about = "Shopping cart page server and development backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the cart page, backed by the REST API
    Serve(ServeArgs),
    /// Run the in-memory REST backend (/inventory, /cart)
    Backend(BackendArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port for the cart page
    #[arg(long, env = "CART_PORT", default_value_t = 4000)]
    pub port: u16,

    /// Base URL of the REST backend
    #[arg(long, env = "CART_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Per-request timeout against the backend, in seconds
    #[arg(long, env = "CART_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Zero an item's pending amount after it is added to the cart
    #[arg(long)]
    pub reset_pending: bool,
}

#[derive(Args, Debug)]
pub struct BackendArgs {
    /// Port for the REST backend
    #[arg(long, env = "CART_BACKEND_PORT", default_value_t = 3000)]
    pub port: u16,

    /// json-server style db.json with `inventory` and `cart` collections
    #[arg(long)]
    pub seed: Option<PathBuf>,
}
