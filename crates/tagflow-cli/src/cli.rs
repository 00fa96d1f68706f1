//! CLI argument definitions for tagflow.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tagflow",
    version,
    about = "Route, extract and semantically enrich tabular data files",
    long_about = "Route uploaded files into a folder layout, extract CSV/JSON into\n\
                  normalized envelopes, then tag columns with a declarative ruleset and\n\
                  apply date standardization, one-hot encoding and numeric normalization."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub paths: PathArgs,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

/// Folder layout flags. Flags win over the config file.
#[derive(Args, Debug, Default)]
pub struct PathArgs {
    /// Pipeline config file (TOML).
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Directory that relative paths are resolved against.
    #[arg(long = "base-dir", value_name = "DIR", default_value = ".", global = true)]
    pub base_dir: PathBuf,

    /// Semantic tag ruleset (YAML or JSON).
    #[arg(long = "ruleset", value_name = "FILE", global = true)]
    pub ruleset: Option<PathBuf>,

    #[arg(long = "raw-dir", value_name = "DIR", global = true)]
    pub raw_dir: Option<PathBuf>,

    #[arg(long = "processed-dir", value_name = "DIR", global = true)]
    pub processed_dir: Option<PathBuf>,

    #[arg(long = "enriched-dir", value_name = "DIR", global = true)]
    pub enriched_dir: Option<PathBuf>,

    #[arg(long = "audit-log", value_name = "FILE", global = true)]
    pub audit_log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Copy uploaded files (or whole folders) into the folder layout.
    Route {
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
    },

    /// Extract CSV/JSON files into envelopes (default: every file in the raw directory).
    Extract {
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Tag and transform files (default: every file in the processed directory).
    Transform {
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Extract everything in the raw directory, then transform everything processed.
    Run,

    /// List the semantic tags in the ruleset.
    Tags,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
