use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hl_cli::commands::{calendar, edit, holidays, import, ledger, punch, summary};
use hl_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so JSON output stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let today = Local::now().date_naive();
    let mut stdout = std::io::stdout().lock();

    match command {
        Commands::Import { source } => import::run(&mut stdout, source, &config)?,
        Commands::Punch { start, end, date } => {
            punch::run(&mut stdout, &config, date.unwrap_or(today), start, end)?;
        }
        Commands::Edit {
            date,
            intervals,
            report_holiday,
        } => edit::run(
            &mut stdout,
            &config,
            *date,
            intervals.as_deref(),
            *report_holiday,
        )?,
        Commands::Holidays { month } => holidays::run(&mut stdout, &config, *month)?,
        Commands::Ledger { json } => ledger::run(&mut stdout, &config, today, *json)?,
        Commands::Summary { json } => summary::run(&mut stdout, &config, today, *json)?,
        Commands::Calendar { month } => calendar::run(&mut stdout, &config, today, *month)?,
    }

    Ok(())
}
