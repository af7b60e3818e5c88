use clap::Parser;
use std::path::PathBuf;

/// Apply a logo and colour theme to SharePoint Online sites.
#[derive(Debug, Parser)]
#[command(name = "sitebrand", version, about)]
pub struct Args {
    /// CSV file with a URL column listing the site collections to brand
    #[arg(short, long, value_name = "CSV")]
    pub input: PathBuf,

    /// Configuration file (defaults to ./config.toml, then the user config directory)
    #[arg(short, long, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Also brand every subsite below each site collection
    #[arg(long)]
    pub process_subsites: bool,

    /// Catalog palette to build the theme from
    #[arg(long, value_name = "NAME")]
    pub color_theme: Option<String>,

    /// Print what would be done without contacting any site
    #[arg(long)]
    pub dry_run: bool,
}
