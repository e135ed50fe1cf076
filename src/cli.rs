use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    chart::DateField,
    filter::{FilterCriteria, parse_bound},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Analyze scraped vehicle listing prices", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Filter and sort listings, printing a table or writing CSV
    List(ListArgs),
    /// Summarize prices of the filtered listings
    Stats(StatsArgs),
    /// Prepare price trend or distribution chart data
    Chart(ChartArgs),
    /// Count listings per make and per city
    Facets(FacetsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// JSON file holding an array of raw listings (`-` for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Fail when the document is not a JSON array instead of treating it as empty
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// YAML or JSON file with default filter and sort options
    #[arg(long = "criteria")]
    pub criteria: Option<PathBuf>,
    /// Space-separated words that must all appear in the title
    #[arg(long)]
    pub search: Option<String>,
    /// Make matched against the first word of the title (`any` for all)
    #[arg(long)]
    pub make: Option<String>,
    /// Exact location (`any` for all)
    #[arg(long)]
    pub city: Option<String>,
    /// Minimum price; empty or non-numeric means no bound
    #[arg(long = "min-price")]
    pub min_price: Option<String>,
    /// Maximum price; empty or non-numeric means no bound
    #[arg(long = "max-price")]
    pub max_price: Option<String>,
    /// Earliest posting date (YYYY-MM-DD), inclusive
    #[arg(long = "date-from")]
    pub date_from: Option<String>,
    /// Latest posting date (YYYY-MM-DD), inclusive
    #[arg(long = "date-to")]
    pub date_to: Option<String>,
}

impl FilterArgs {
    /// Criteria from the command-line flags alone.
    pub fn flag_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search: self.search.clone(),
            make: self.make.clone(),
            city: self.city.clone(),
            min_price: self.min_price.as_deref().and_then(parse_bound),
            max_price: self.max_price.as_deref().and_then(parse_bound),
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
        }
    }

    /// Overlays the flags on `base`. A price flag that was given replaces the
    /// base bound even when it parses to no bound.
    pub fn overlay(&self, base: FilterCriteria) -> FilterCriteria {
        let mut criteria = base.merged_with(&self.flag_criteria());
        if let Some(raw) = &self.min_price {
            criteria.min_price = parse_bound(raw);
        }
        if let Some(raw) = &self.max_price {
            criteria.max_price = parse_bound(raw);
        }
        criteria
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Sort key: date_desc, date_asc, price_desc, price_asc, mileage_asc, mileage_desc
    #[arg(long)]
    pub sort: Option<String>,
    /// Write CSV to this path (`-` for stdout) instead of printing a table
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Character encoding for the CSV output (defaults to utf-8)
    #[arg(long = "output-encoding")]
    pub output_encoding: Option<String>,
    /// Maximum rows to print (0 = all)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Date that positions listings on the time axis
    #[arg(long = "date-field", value_enum, default_value_t = DateField::Posted)]
    pub date_field: DateField,
    /// Emit the chart data as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct FacetsArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Maximum values to display per facet (0 = all)
    #[arg(long, default_value_t = 0)]
    pub top: usize,
}
