//! MedLookup CLI - look up medicines from the terminal.
//!
//! # Usage
//!
//! ```bash
//! medlookup search paracetamol
//! medlookup suggest ceti -n 3
//! medlookup scan ./strip.jpg          # needs MEDLOOKUP_OCR_API_KEY
//! medlookup extract "DOLO-650 Tablets"
//! medlookup favorites toggle Ibuprofen
//! medlookup history --clear
//! medlookup search dolo --json
//! ```

mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use medlookup_core::LookupError;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::output::Format;

/// Medicine reference lookup.
///
/// Resolves typed names, brand aliases and label photos against a local
/// catalog. Favorites and recent searches are kept on this machine.
#[derive(Parser)]
#[command(name = "medlookup", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Catalog JSON file (default: config, then the bundled sample)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Custom data directory (default: platform standard location)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a medicine by name or alias
    Search {
        /// Medicine name; words are joined with spaces
        query: Vec<String>,
    },

    /// List catalog names containing a prefix
    Suggest {
        prefix: String,

        /// Maximum number of suggestions (default: config)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Read a label photo with OCR and look up the medicine on it
    Scan { image: PathBuf },

    /// Show which name the label extractor picks from raw text
    Extract { text: Vec<String> },

    /// Show or change favorites
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },

    /// Show or clear recent searches
    History {
        /// Show only the N most recent
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Forget all recent searches
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites in the order added
    List,
    /// Add or remove a medicine
    Toggle { name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(err) => match err.downcast_ref::<LookupError>() {
            Some(notice) if notice.is_notice() => {
                eprintln!("{}", notice);
                std::process::exit(1);
            }
            _ => Err(err),
        },
    }
}

async fn run(cli: Cli) -> Result<String> {
    let config = Config::load().context("Failed to load configuration")?;
    let format = Format::from_flag(cli.json);

    let open_session =
        || commands::open_session(&config, cli.catalog.as_ref(), cli.data_dir.as_ref());

    match cli.command {
        Command::Search { query } => {
            commands::search(&mut open_session()?, &query.join(" "), format)
        }
        Command::Suggest { prefix, limit } => Ok(commands::suggest(
            &open_session()?,
            &prefix,
            limit.unwrap_or(config.suggestion_limit),
            format,
        )),
        Command::Scan { image } => {
            commands::scan(&mut open_session()?, &config, &image, format).await
        }
        Command::Extract { text } => Ok(commands::extract(
            &config.heuristics(),
            &text.join(" "),
            format,
        )),
        Command::Favorites { action } => {
            let mut session = open_session()?;
            match action.unwrap_or(FavoritesAction::List) {
                FavoritesAction::List => Ok(commands::list_favorites(&session, format)),
                FavoritesAction::Toggle { name } => {
                    commands::toggle_favorite(&mut session, &name, format)
                }
            }
        }
        Command::History { limit, clear } => {
            commands::history(&mut open_session()?, limit, clear, format)
        }
    }
}
