use anyhow::Result;
use auction_snap::classify::classify;
use auction_snap::config::{ParserConfig, load_config};
use auction_snap::document::DocumentSource;
use auction_snap::eligibility::is_eligible;
use auction_snap::harness::run_harness;
use auction_snap::input::load_document;
use auction_snap::model::PriorInfo;
use auction_snap::pipeline::ArticleParser;
use auction_snap::sanitize::sanitize;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "auction-snap", about = "Auction listing snapshot extractor")]
struct Cli {
    /// Parser config (TOML); built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a saved listing page into a snapshot.
    Parse {
        file: PathBuf,
        #[arg(long)]
        url: String,
        #[arg(long, default_value_t = false)]
        refresh: bool,
        #[arg(long, default_value_t = false)]
        auction_ended: bool,
    },
    /// Classify auction status text.
    Classify { text: String },
    /// Sanitize a status markup fragment.
    Sanitize { file: PathBuf },
    /// Check whether an automatic bid may be armed.
    Eligible {
        #[arg(long)]
        max_bid: Option<f64>,
        #[arg(long)]
        min_bid: Option<f64>,
        #[arg(long)]
        price: f64,
    },
    /// Check the parser config and exit.
    Validate,
    /// Report which field locators resolve on a saved page.
    Harness {
        file: PathBuf,
        #[arg(long)]
        url: String,
    },
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ParserConfig::default(),
    };

    match cli.command {
        Commands::Parse {
            file,
            url,
            refresh,
            auction_ended,
        } => {
            let parser = ArticleParser::new(&config)?;
            let loaded = load_document(&file, Some(&url))?;
            let doc = DocumentSource::parse(&loaded.markup);
            let snapshot = if refresh {
                parser.parse_refresh(&doc, &loaded.source_url)?
            } else {
                let prior = PriorInfo { auction_ended };
                parser.parse_full(&doc, &loaded.source_url, Some(&prior))?
            };
            let snapshot = snapshot.with_default_currency(&config.default_currency);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::Classify { text } => {
            let state = classify(&text);
            println!(
                "{}",
                serde_json::json!({ "state": state, "id": state.id(), "label": state.label() })
            );
        }
        Commands::Sanitize { file } => {
            let loaded = load_document(&file, None)?;
            println!("{}", sanitize(&loaded.markup));
        }
        Commands::Eligible {
            max_bid,
            min_bid,
            price,
        } => {
            println!("{}", is_eligible(max_bid, min_bid, price));
        }
        Commands::Validate => {
            ArticleParser::new(&config)?;
            info!("config valid");
            println!("OK");
        }
        Commands::Harness { file, url } => {
            let parser = ArticleParser::new(&config)?;
            let loaded = load_document(&file, Some(&url))?;
            let report = run_harness(&parser, &loaded.markup, &loaded.source_url)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    Ok(())
}
