//! Blokhouse CLI - serve and print asset exports for automation tools.
//!
//! Besides running the HTTP gateway, the subcommands follow the script
//! protocols of the tools themselves:
//!
//! - `blokhouse ansible --list` / `--host <name>` for Ansible inventory scripts
//! - `blokhouse puppet-enc <certname>` for Puppet's `external_nodes` setting

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use blokhouse_export::{
    ansible, build_data_bag_item, build_default_enc_yaml, build_enc_yaml, build_node,
};
use blokhouse_gateway::catalog::{find_data_bag_item, find_node};
use blokhouse_gateway::{build_router, AppState, AssetSource, Config, FileCatalog};

/// Blokhouse CLI - asset exports for Ansible, Puppet and Chef.
#[derive(Parser)]
#[command(name = "blokhouse")]
#[command(about = "Serve Blokhouse assets to configuration management tools")]
struct Cli {
    /// Asset catalog file, YAML or JSON (or set `BLOKHOUSE_ASSETS` env var).
    #[arg(long, env = "BLOKHOUSE_ASSETS", global = true)]
    assets: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long, default_value = "false", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway.
    Serve {
        /// Port to listen on (or set `BLOKHOUSE_PORT` env var).
        #[arg(long, env = "BLOKHOUSE_PORT")]
        port: Option<u16>,

        /// Address to bind to (or set `BLOKHOUSE_BIND` env var).
        #[arg(long, env = "BLOKHOUSE_BIND")]
        bind: Option<IpAddr>,
    },

    /// Print the Ansible dynamic inventory.
    Ansible(AnsibleArgs),

    /// Print the Puppet ENC document for a node.
    PuppetEnc {
        /// Node certname, matched against asset name or IP.
        node: String,
    },

    /// Print the Chef node object for an asset.
    ChefNode {
        /// Asset name or IP.
        name: String,
    },

    /// Print data bag items (all, or the one with the given id).
    DataBag {
        /// Data bag item id.
        id: Option<String>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct AnsibleArgs {
    /// Print the whole inventory.
    #[arg(long)]
    list: bool,

    /// Print variables for a single host.
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the documents
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::default();
    if let Some(assets) = cli.assets {
        config.assets_path = assets;
    }
    let catalog = FileCatalog::new(config.assets_path.clone());

    match cli.command {
        Commands::Serve { port, bind } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(bind) = bind {
                config.bind = bind;
            }
            serve(&config, catalog).await?;
        }
        Commands::Ansible(args) => {
            let assets = load(&catalog).await?;
            let inventory = ansible::build_inventory(&assets);
            match args.host {
                Some(host) => match inventory.host_vars(&host) {
                    Some(vars) => print_json(vars)?,
                    None => println!("{{}}"),
                },
                None => print_json(&inventory)?,
            }
        }
        Commands::PuppetEnc { node } => {
            let assets = load(&catalog).await?;
            let yaml =
                find_node(&assets, &node).map_or_else(build_default_enc_yaml, build_enc_yaml);
            print!("{yaml}");
        }
        Commands::ChefNode { name } => {
            let assets = load(&catalog).await?;
            let asset = find_node(&assets, &name)
                .with_context(|| format!("No asset named or addressed {name}"))?;
            print_json(&build_node(asset))?;
        }
        Commands::DataBag { id } => {
            let assets = load(&catalog).await?;
            match id {
                Some(id) => {
                    let asset = find_data_bag_item(&assets, &id)
                        .with_context(|| format!("Data bag item not found: {id}"))?;
                    print_json(&build_data_bag_item(asset))?;
                }
                None => {
                    let items: Vec<_> = assets.iter().map(build_data_bag_item).collect();
                    print_json(&items)?;
                }
            }
        }
    }

    Ok(())
}

async fn serve(config: &Config, catalog: FileCatalog) -> Result<()> {
    info!(assets = %catalog.path().display(), "Starting Blokhouse gateway...");

    let app = build_router(Arc::new(AppState::new(catalog)));

    let addr = SocketAddr::new(config.bind, config.port);
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(port = config.port, "Blokhouse gateway listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

async fn load(catalog: &FileCatalog) -> Result<Vec<blokhouse_export::Asset>> {
    catalog
        .list_assets()
        .await
        .with_context(|| format!("Failed to load assets from {}", catalog.path().display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
