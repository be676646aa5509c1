//! ksinstall - Main entry point
//!
//! Parses global options, loads settings, dispatches the verb to the command
//! registry and hands the marked request to the package manager.

use std::process::ExitCode;

use anyhow::Context;
use tracing::{debug, error, info};

use ksinstall::cli::Cli;
use ksinstall::commands::{CommandContext, CommandRegistry};
use ksinstall::config_file::Settings;
use ksinstall::error::CommandError;
use ksinstall::package_manager::SystemPackageManager;

/// Initialize logging; `RUST_LOG` wins over `-v`
fn init_logging(verbose: u8) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => {
            info!("Loading settings from {:?}", path);
            Settings::load_from_file(path)?
        }
        None => Settings::default(),
    };
    cli.apply_overrides(&mut settings);
    settings.validate().context("Invalid settings")?;
    Ok(settings)
}

fn run(cli: &Cli, settings: &Settings) -> Result<(), CommandError> {
    let mut registry = CommandRegistry::with_default_commands();

    if cli.list_commands {
        for (name, summary) in registry.list() {
            println!("{name:<12} {summary}");
        }
        return Ok(());
    }

    let Some((verb, args)) = cli.verb() else {
        let err = <Cli as clap::CommandFactory>::command().error(
            clap::error::ErrorKind::MissingRequiredArgument,
            "a command is required (try --list-commands)",
        );
        return Err(CommandError::Usage(err));
    };

    let demands = registry.demands(&verb)?;
    debug!("Demands for {}: {:?}", verb, demands);

    let mut package_manager = SystemPackageManager::from_settings(settings);
    {
        let mut ctx = CommandContext::new(&mut package_manager, settings.grammar_version);
        registry.dispatch(&verb, &mut ctx, args)?;
    }

    if demands.resolving {
        package_manager.execute(cli.dry_run, demands.root_user)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);
    debug!("CLI arguments parsed");

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Usage(e)) => e.exit(),
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
