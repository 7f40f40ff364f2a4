//! sui-explorer: browse recently published Sui Move packages
//!
//! ## Example Usage
//!
//! ```bash
//! # Packages published in the last 30,000 testnet transactions
//! sui-explorer list
//!
//! # Search, newest first, smaller scan
//! sui-explorer list --query pool --max-pages 20
//!
//! # Where was a package published?
//! sui-explorer publish-info 0x1eabed72...
//!
//! # Functions and structs of a package
//! sui-explorer --network mainnet abi 0x2
//!
//! # Favorites
//! sui-explorer save 0x1eabed72... --note "router"
//! sui-explorer favorites
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use sui_package_explorer::{Explorer, ExplorerConfig};
use tracing_subscriber::EnvFilter;

mod explorer_cli;

use explorer_cli::{
    favorites::{list_favorites, SaveCmd, UnsaveCmd},
    list::ListCmd,
    output::format_error,
    package::{AbiCmd, PublishInfoCmd},
};

#[derive(Parser)]
#[command(
    name = "sui-explorer",
    author,
    version,
    about = "Browse recently published Sui Move packages and their ABIs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Network: mainnet, testnet, devnet or localnet
    #[arg(long, global = true)]
    network: Option<String>,

    /// Fullnode JSON-RPC URL (default: the network's public fullnode)
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Favorites file
    #[arg(long, global = true)]
    favorites: Option<PathBuf>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List recently published packages
    List(ListCmd),

    /// Find the transaction that published a package
    PublishInfo(PublishInfoCmd),

    /// Show the functions and structs of a package
    Abi(AbiCmd),

    /// Save a package to favorites
    Save(SaveCmd),

    /// Remove a package from favorites
    Unsave(UnsaveCmd),

    /// List saved packages
    Favorites,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let Cli {
        command,
        network,
        rpc_url,
        favorites,
        json,
        verbose,
    } = Cli::parse();
    init_tracing(verbose);

    let mut config = ExplorerConfig::from_env();
    if let Some(network) = network.as_deref() {
        config = config.with_network(network, rpc_url.as_deref());
    } else if let Some(url) = rpc_url.as_deref() {
        config = config.with_rpc_url(url);
    }
    if let Some(path) = favorites {
        config.favorites_path = path;
    }

    let explorer = Explorer::from_config(&config);

    let result = match command {
        Commands::List(cmd) => cmd.execute(explorer, json).await,
        Commands::PublishInfo(cmd) => cmd.execute(explorer, json).await,
        Commands::Abi(cmd) => cmd.execute(&explorer, json).await,
        Commands::Save(cmd) => cmd.execute(&explorer, json).await,
        Commands::Unsave(cmd) => cmd.execute(&explorer, json),
        Commands::Favorites => list_favorites(&explorer, json),
    };

    if let Err(err) = result {
        eprintln!("{}", format_error(&err, json));
        std::process::exit(1);
    }
}
