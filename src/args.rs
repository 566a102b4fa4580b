use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "matcha-scout")]
#[command(about = "Finds businesses that serve matcha by scanning their websites")]
#[command(version)]
pub struct Args {
    /// JSON config file (defaults apply for anything it omits)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Maximum pages fetched per website
    #[arg(long, global = true)]
    pub max_pages: Option<usize>,

    /// Also match matcha confections and flavor pairings
    #[arg(long, global = true)]
    pub extended: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for businesses around a location and check each for matcha
    Search {
        /// Place name to search around (default: from config, "London, UK")
        location: Option<String>,

        /// Search radius in meters
        #[arg(short, long)]
        radius: Option<u32>,

        /// Places API key
        #[arg(long, env = "GOOGLE_PLACES_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Output file (default: derived from the location)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of businesses evaluated concurrently
        #[arg(short, long)]
        concurrency: Option<usize>,
    },

    /// Check a single website for matcha on its menu
    Check {
        /// Website URL to crawl
        url: String,
    },
}
