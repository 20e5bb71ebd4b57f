//! [`Args`] definitions.

use std::path::PathBuf;

use clap::Parser;
use common::Order;
use service::collection::SearchScope;

/// Lists a page of the user directory as JSON.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Path to the JSON file with users, overriding the configured one.
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Text to search users by.
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Fields the search text is matched against.
    #[arg(long)]
    pub scope: Option<SearchScope>,

    /// Field to sort users by.
    #[arg(long)]
    pub sort: Option<String>,

    /// Order to sort users in.
    #[arg(long, default_value_t = Order::Ascending, requires = "sort")]
    pub order: Order,

    /// Zero-based index of the page to list.
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub page: i64,

    /// Number of users on a page, overriding the configured one.
    #[arg(long, allow_negative_numbers = true)]
    pub size: Option<i64>,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}
