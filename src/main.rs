//! `vitibrasil` binary: serve the API, seed users, or bulk-populate the cache.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use vitibrasil_api::auth::hash_password;
use vitibrasil_api::catalog::{MAX_YEAR, MIN_YEAR};
use vitibrasil_api::config::Config;
use vitibrasil_api::store::Store;
use vitibrasil_api::{populate, server};

#[derive(Parser)]
#[command(name = "vitibrasil", version, about = "Vitibrasil viticulture statistics API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API (default).
    Serve,
    /// Scrape every year and report family into the cache database.
    Populate {
        /// First year to fetch.
        #[arg(long, default_value_t = MIN_YEAR)]
        from: i32,
        /// Last year to fetch, inclusive.
        #[arg(long, default_value_t = MAX_YEAR)]
        to: i32,
    },
    /// Create or update an API user.
    AddUser { username: String, password: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vitibrasil_api=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("starting vitibrasil-api v{}", env!("CARGO_PKG_VERSION"));
            server::serve(config).await
        }
        Command::Populate { from, to } => populate::run(&config, from, to).await,
        Command::AddUser { username, password } => {
            let db_path = config
                .db_path
                .clone()
                .unwrap_or_else(Config::default_db_path);
            let store = Store::open(&db_path)?;
            store.upsert_user(&username, &hash_password(&password))?;
            info!(username = %username, "user created");
            Ok(())
        }
    }
}
