use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod catalog;
mod cli;
mod commands;
mod config;
mod domain;
mod services;

use catalog::CatalogError;
use cli::{Cli, Commands};
use commands::{handle_runtime_commands, run_browse, Context};
use config::Config;
use services::output::print_error;
use services::session::SelectionError;

const LOG_ENV: &str = "CAFES_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn error_code(e: &anyhow::Error) -> &'static str {
    if let Some(c) = e.downcast_ref::<CatalogError>() {
        c.code()
    } else if e.downcast_ref::<SelectionError>().is_some() {
        "NOT_FOUND"
    } else {
        "INTERNAL"
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.api_url.as_deref())?;
    let ctx = Context::from_config(&config)?;
    match &cli.command {
        Commands::Browse { filters } => {
            run_browse(cli.json, &ctx.orchestrator, filters.criteria())
        }
        _ => handle_runtime_commands(cli, &ctx),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(e) = run(&cli) {
        tracing::debug!(error = ?e, "command failed");
        print_error(cli.json, error_code(&e), &e.to_string());
        std::process::exit(1);
    }
}
