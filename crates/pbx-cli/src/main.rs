//! `pbxproj`: inspect and edit Xcode project files.

use clap::{ColorChoice, Parser};
use pbx_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_add_file, run_add_group, run_check, run_info};
use crate::summary::{print_add_file, print_check, print_groups, print_info};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Check(args) => match run_check(args) {
            Ok(result) => {
                print_check(&result);
                if result.identical { 0 } else { 1 }
            }
            Err(error) => report(&error),
        },
        Command::Info(args) => match run_info(args) {
            Ok(info) if args.json => match serde_json::to_string_pretty(&info) {
                Ok(json) => {
                    println!("{json}");
                    0
                }
                Err(error) => report(&anyhow::Error::from(error)),
            },
            Ok(info) => {
                print_info(&info);
                0
            }
            Err(error) => report(&error),
        },
        Command::AddGroup(args) => match run_add_group(args) {
            Ok(groups) => {
                print_groups(&groups);
                0
            }
            Err(error) => report(&error),
        },
        Command::AddFile(args) => match run_add_file(args) {
            Ok(result) => {
                print_add_file(&result);
                0
            }
            Err(error) => report(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
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
