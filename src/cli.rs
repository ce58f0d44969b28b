/// CLI argument definitions for the `triage` command.
use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use clap_complete::Shell;

use crate::cli_help;

#[derive(Parser)]
#[command(
    name = "triage",
    version,
    about = "Open pull request triage dashboard",
    long_about = cli_help::TRIAGE,
    group(ArgGroup::new("cache").args(["cached", "only_cached"])),
    group(ArgGroup::new("verbosity").args(["verbose", "quiet"]))
)]
pub struct Cli {
    /// Configuration file (default: ./triage.yaml, ~/.triage.yaml, /etc/triage.yaml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Load the cached snapshot first, then rescan and overwrite it
    #[arg(long)]
    pub cached: bool,

    /// Render from the cached snapshot without contacting GitHub
    #[arg(long, long_help = cli_help::ONLY_CACHED)]
    pub only_cached: bool,

    /// Print the aggregated report data as JSON instead of writing HTML
    #[arg(long)]
    pub json: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL", exclusive = true)]
    pub completions: Option<Shell>,
}

/// How the run treats the on-disk snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// Scan from scratch and save.
    Fresh,
    /// Load the snapshot if present, then scan and save.
    Cached,
    /// Load the snapshot and never scan.
    OnlyCached,
}

impl Cli {
    pub fn cache_mode(&self) -> CacheMode {
        if self.only_cached {
            CacheMode::OnlyCached
        } else if self.cached {
            CacheMode::Cached
        } else {
            CacheMode::Fresh
        }
    }
}
