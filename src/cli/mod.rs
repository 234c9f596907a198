use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a travel plan (Ctrl-C aborts the wait)
    Plan {
        #[command(flatten)]
        request: RequestArgs,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the prompt that would be sent, without calling a provider
    Prompt {
        #[command(flatten)]
        request: RequestArgs,
    },

    /// List supported budget currencies
    Currencies,

    /// List suggested interests
    Interests,
}

/// Trip fields. Flags override values loaded from `--request`.
#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// JSON file holding a trip request draft
    #[arg(long, value_name = "FILE")]
    pub request: Option<PathBuf>,

    /// Starting location
    #[arg(long = "from")]
    pub origin: Option<String>,

    #[arg(long = "to")]
    pub destination: Option<String>,

    /// First day of the trip (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of the trip (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    #[arg(short, long)]
    pub budget: Option<f64>,

    #[arg(short, long)]
    pub travelers: Option<u32>,

    /// Interest tag; repeat for several
    #[arg(short, long = "interest")]
    pub interests: Vec<String>,

    /// Budget currency code (INR, USD, EUR)
    #[arg(short, long)]
    pub currency: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
