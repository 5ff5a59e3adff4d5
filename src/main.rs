//! Mobsys CLI - serve and inspect the organizational record store

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mobsys::config::{self, MobsysConfig};
use mobsys::storage::RecordStore;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default port of the HTTP API
const DEFAULT_PORT: u16 = 5000;

#[derive(Parser)]
#[command(name = "mobsys")]
#[command(version = "0.1.0")]
#[command(about = "Backend API for the organizational record store")]
#[command(long_about = r#"
Mobsys serves a JSON API over the organizational record store:
  • Products (read-only)
  • Contacts, with polymorphic person/company reference expansion
  • Attachments, with protocol and medium expansion

Example usage:
  mobsys serve --port 5000 --database mobsys.db
  mobsys probe
  mobsys stats
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Port to bind
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Probe the record store connection (fetches product 1)
    Probe {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Show row counts per table
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Write a starter config file
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Serve { port, database } => {
            let database = resolve_database(database, &config);
            let port = port.or(config.port).unwrap_or(DEFAULT_PORT);
            config::ensure_db_dir(&database)?;
            tracing::info!("Serving record store {:?} on port {}", database, port);
            mobsys::api::start_server(port, &database).await?;
        }

        Commands::Probe { database } => {
            let database = resolve_database(database, &config);
            let store = RecordStore::open(&database)?;
            println!("Connected to record store at {}", database.display());
            match store.get_product(1)? {
                Some(product) => {
                    let price = product
                        .price
                        .map_or_else(|| "none".to_string(), |p| p.to_string());
                    println!(
                        "Product ID: {}, Name: {}, Price: {}",
                        product.id, product.name, price
                    );
                }
                None => println!("No product found with ID 1."),
            }
        }

        Commands::Stats { database } => {
            let database = resolve_database(database, &config);
            let store = RecordStore::open(&database)?;
            println!("{}", store.stats()?);
        }

        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            let starter = MobsysConfig {
                database: Some(config::default_database_path().display().to_string()),
                port: Some(DEFAULT_PORT),
            };
            config::write_config(&path, &starter, force)?;
            println!("Config written to {}", path.display());
        }
    }

    Ok(())
}

/// CLI flag wins over config file, default applies last
fn resolve_database(flag: Option<PathBuf>, config: &MobsysConfig) -> PathBuf {
    flag.or_else(|| config.database.as_ref().map(PathBuf::from))
        .unwrap_or_else(config::default_database_path)
}
