use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use yts::app::{App, MovieSelector};
use yts::config::{self, Configuration};
use yts::table::render_listing;
use yts::transmission::Submitted;

#[derive(Parser)]
#[command(name = "yts", version, about = "Get latest yts listings")]
struct Cli {
    /// Load configuration from FILE
    #[arg(short, long, env = "YTS_CONFIG", value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the latest 20 movies on yts
    #[command(visible_alias = "l")]
    List,
    /// Send the best torrent of movie `n` to transmission
    #[command(visible_alias = "d")]
    Download {
        /// Position in the listing (or catalog id with --id)
        n: u64,
        /// Log every transmission RPC request and reply
        #[arg(short, long)]
        debug: bool,
        /// Treat `n` as the movie's catalog id instead of its position
        #[arg(long)]
        id: bool,
    },
    /// Manage the configuration file
    #[command(visible_alias = "c")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print where the configuration is read from
    Path,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Loaded before parsing so YTS_CONFIG can come from .env.
    let env_file = dotenv();
    let cli = Cli::parse();
    let verbose = matches!(cli.command, Some(Command::Download { debug: true, .. }));
    init_tracing(verbose);
    match env_file {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => tracing::debug!("No .env file loaded ({})", e),
    }

    let path = config::resolve_path(cli.config);
    match cli.command.unwrap_or(Command::List) {
        Command::List => {
            let config = Configuration::load(&path);
            let app = App::from_config(&config, false)?;
            let listing = app.list().await?;
            print!("{}", render_listing(&listing, std::io::stdout().is_terminal()));
        }
        Command::Download { n, debug, id } => {
            let config = Configuration::load(&path);
            let app = App::from_config(&config, debug)?;
            let selector = if id {
                MovieSelector::Id(n)
            } else {
                MovieSelector::Index(
                    usize::try_from(n).map_err(|_| anyhow!("index {} is too large", n))?,
                )
            };
            let pick = app.pick(selector).await?;
            println!("Will download movie {} ({})", pick.movie.title, pick.movie.year);
            let dispatched = app.dispatch(pick).await?;
            match dispatched.submitted {
                Submitted::Added(t) => println!(
                    "Added {} [{}] to transmission (id {})",
                    t.name, dispatched.torrent.quality, t.id
                ),
                Submitted::Duplicate(t) => {
                    println!("{} is already in transmission (id {})", t.name, t.id)
                }
                Submitted::Accepted => println!(
                    "Queued {} ({}) [{}]",
                    dispatched.movie.title, dispatched.movie.year, dispatched.torrent.quality
                ),
            }
        }
        Command::Config { action } => match action {
            ConfigAction::Init { force } => {
                let config = Configuration::new_default(&path);
                if config.exists() && !force {
                    warn!("{} already exists, use --force to overwrite", path.display());
                    return Err(anyhow!("refusing to overwrite {}", path.display()));
                }
                config.save_to_disk()?;
                println!("Wrote default configuration to {}", path.display());
            }
            ConfigAction::Path => println!("{}", path.display()),
        },
    }
    Ok(())
}
