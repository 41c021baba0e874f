mod calc;
mod resolve;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eiyo_core::{matcher_from_env, AliasTable, CascadeConfig, Catalog, MatchCascade};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "eiyo")]
#[command(about = "Resolve food names and compute meal nutrients", long_about = None)]
struct Cli {
    /// Food composition table: a JSON array of records keyed by 食品名
    #[arg(
        long,
        global = true,
        env = "EIYO_CATALOG",
        default_value = "food_database.json"
    )]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one food name to a catalog entry
    Resolve {
        /// Food name as a user would type it (e.g. 生卵)
        phrase: String,
        /// Ask the configured LLM when the deterministic levels miss
        #[arg(long)]
        assist: bool,
        /// Print the full match result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute nutrients for a meal line
    Calc {
        /// Items separated by 、 (e.g. 納豆45g、ご飯160g、生卵60g)
        meal: String,
        /// Ask the configured LLM when the deterministic levels miss
        #[arg(long)]
        assist: bool,
        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            phrase,
            assist,
            json,
        } => {
            let cascade = build_cascade(&cli.catalog, assist)?;
            resolve::run(&cascade, &phrase, assist, json).await?;
        }
        Commands::Calc { meal, assist, json } => {
            let cascade = build_cascade(&cli.catalog, assist)?;
            calc::run(&cascade, &meal, assist, json).await?;
        }
    }

    Ok(())
}

fn build_cascade(catalog_path: &Path, assist: bool) -> Result<MatchCascade> {
    let catalog = Catalog::load(catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
    let config = CascadeConfig::from_env().context("Invalid configuration")?;

    let mut cascade = MatchCascade::new(catalog, AliasTable::builtin()).with_config(config);
    if assist {
        cascade = cascade.with_assist(matcher_from_env());
    }

    tracing::debug!(
        entries = cascade.catalog().len(),
        assist,
        "Match cascade ready"
    );
    Ok(cascade)
}
