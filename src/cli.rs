use clap::Parser;
use std::path::PathBuf;

use crate::commands::Mode;
use crate::fetch::DEFAULT_API_URL;

#[derive(Parser, Debug)]
#[command(name = "pokedex-seed")]
#[command(version, about = "Provision a local PostgreSQL server and seed it with PokeAPI data")]
pub struct Cli {
    /// What to do with the local server
    #[arg(value_enum, default_value_t = Mode::Default)]
    pub mode: Mode,

    /// Base URL of the PokeAPI-compatible source
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Directory holding `Database/` and `postgresql/` (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Only load these tables and their dependencies (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub include: Option<Vec<String>>,

    /// Load everything except these tables and their dependents (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Show a full-screen dashboard instead of plain output
    #[arg(long)]
    pub tui: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
