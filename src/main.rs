mod cache;
mod cli;
mod cli_help;
mod config;
mod crossref;
mod error;
mod forward;
mod github;
mod model;
mod ownership;
mod pipeline;
mod publish;
mod render;
mod report_helpers;
mod scan;
mod summary;

use std::error::Error;

use clap::{CommandFactory, Parser};

use cli::Cli;
use config::Config;

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    // RUST_LOG, when set, wins over the flags
    if std::env::var_os("RUST_LOG").is_none() {
        if cli.quiet {
            builder.filter_level(log::LevelFilter::Warn);
        } else if cli.verbose {
            builder.filter_level(log::LevelFilter::Debug);
            builder.filter_module("reqwest", log::LevelFilter::Info);
            builder.filter_module("hyper_util", log::LevelFilter::Info);
        }
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = Config::load(cli.config.as_deref())?;
    pipeline::run(&config, cli.cache_mode(), cli.json)
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "triage", &mut std::io::stdout());
        return;
    }

    init_logging(&cli);

    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
