mod commands;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use upg_core::{Config, Panel};

#[derive(Parser)]
#[command(name = "upg")]
#[command(about = "Browse unsafety propagation graphs", long_about = None)]
struct Cli {
    /// Read analysis data from a local directory instead of the remote host
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Root URL of the remote analysis data
    #[arg(long, global = true)]
    url: Option<String>,

    /// Config file (defaults to ./upg.toml, then the user config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the navigation tree
    Navi {
        /// Maximum depth to print
        #[arg(long)]
        depth: Option<usize>,
    },
    /// Show one panel of a function
    Show {
        /// Qualified function name, e.g. poc::SecretRegion::from
        name: String,
        /// Panel to print: src, mir, doc or raw
        #[arg(long, default_value = "src")]
        panel: Panel,
    },
    /// Search qualified names
    Search {
        query: String,
    },
    /// Validate the navigation document
    Check,
    /// Download the navigation and every function document into a directory
    Mirror {
        /// Target directory
        out: PathBuf,
    },
    /// Start the local web viewer
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
        /// Do not open the browser
        #[arg(long)]
        no_open: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = match cli.command {
        Commands::Serve { .. } => "info",
        _ => "warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = cli.dir {
        config.data.data_dir = Some(dir);
    }
    if let Some(url) = cli.url {
        config.data.base_url = url;
        config.data.navi_url = None;
    }

    match cli.command {
        Commands::Navi { depth } => commands::navi(&config, depth).await,
        Commands::Show { name, panel } => commands::show(&config, &name, panel).await,
        Commands::Search { query } => commands::search(&config, &query).await,
        Commands::Check => commands::check(&config).await,
        Commands::Mirror { out } => commands::mirror(&config, out).await,
        Commands::Serve { port, no_open } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if no_open {
                config.server.open_browser = false;
            }
            serve::start_server(config).await
        }
    }
}
