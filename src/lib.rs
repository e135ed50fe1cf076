pub mod chart;
pub mod chart_cmd;
pub mod cli;
pub mod config;
pub mod export;
pub mod facets;
pub mod facets_cmd;
pub mod filter;
pub mod io_utils;
pub mod list_cmd;
pub mod listing;
pub mod sort;
pub mod source;
pub mod stats;
pub mod stats_cmd;
pub mod table;
pub mod view;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, FilterArgs, InputArgs},
    config::CriteriaConfig,
    listing::NormalizedListing,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("vehicle_price_analytics", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::List(args) => list_cmd::execute(&args),
        Commands::Stats(args) => stats_cmd::execute(&args),
        Commands::Chart(args) => chart_cmd::execute(&args),
        Commands::Facets(args) => facets_cmd::execute(&args),
    }
}

pub(crate) fn load_records(args: &InputArgs) -> Result<Vec<NormalizedListing>> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let records = source::load_listings(&args.input, encoding, args.strict)
        .with_context(|| format!("Loading listings from {:?}", args.input))?;
    info!(
        "Loaded {} listing(s) from {}",
        records.len(),
        describe_input(&args.input)
    );
    Ok(records)
}

/// Criteria file values overlaid with any explicit command-line flags.
pub(crate) fn resolve_criteria(args: &FilterArgs) -> Result<CriteriaConfig> {
    let mut resolved = match &args.criteria {
        Some(path) => config::load_criteria(path)
            .with_context(|| format!("Loading criteria from {path:?}"))?,
        None => CriteriaConfig::default(),
    };
    resolved.criteria = args.overlay(resolved.criteria);
    debug!("Filter criteria: {:?}", resolved.criteria);
    Ok(resolved)
}

pub(crate) fn describe_input(path: &std::path::Path) -> String {
    if io_utils::is_dash(path) {
        "stdin".to_string()
    } else {
        format!("{path:?}")
    }
}
