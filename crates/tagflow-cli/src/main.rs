//! tagflow CLI.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tagflow_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    resolve_config, run_all, run_extract, run_route, run_tags, run_transform,
};
use crate::summary::{print_batch_summary, print_route_summary};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let config = match resolve_config(&cli.paths) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };
    let outcome = match &cli.command {
        Command::Route { paths } => run_route(&config, paths).map(|summary| {
            print_route_summary(&summary);
            summary.failed() > 0
        }),
        Command::Extract { files } => run_extract(&config, files).map(|batch| {
            print_batch_summary("Extracted", &batch);
            batch.has_errors()
        }),
        Command::Transform { files } => run_transform(&config, files).map(|batch| {
            print_batch_summary("Transformed", &batch);
            batch.has_errors()
        }),
        Command::Run => run_all(&config).map(|(extracted, transformed)| {
            print_batch_summary("Extracted", &extracted);
            print_batch_summary("Transformed", &transformed);
            extracted.has_errors() || transformed.has_errors()
        }),
        Command::Tags => run_tags(&config).map(|()| false),
    };
    let exit_code = match outcome {
        Ok(has_errors) => i32::from(has_errors),
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
