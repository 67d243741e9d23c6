//! CLI argument definitions for the `pbxproj` tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use pbx_model::SourceTree;

#[derive(Parser)]
#[command(
    name = "pbxproj",
    version,
    about = "Inspect and edit Xcode project files",
    long_about = "Inspect and edit Xcode project files.\n\n\
                  Every command accepts either a project.pbxproj file or the\n\
                  .xcodeproj bundle that contains it. Edits are written back\n\
                  byte-for-byte in Xcode's own layout."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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

#[derive(Subcommand)]
pub enum Command {
    /// Decode and re-encode a project, reporting whether the output is identical.
    Check(CheckArgs),

    /// Summarize the records and targets of a project.
    Info(InfoArgs),

    /// Create nested groups under the main group.
    AddGroup(AddGroupArgs),

    /// Add a file reference, optionally compiling it into a target.
    AddFile(AddFileArgs),
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to project.pbxproj or its .xcodeproj bundle.
    #[arg(value_name = "PBXPROJ")]
    pub project: PathBuf,
}

#[derive(Parser)]
pub struct InfoArgs {
    /// Path to project.pbxproj or its .xcodeproj bundle.
    #[arg(value_name = "PBXPROJ")]
    pub project: PathBuf,

    /// Print JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct AddGroupArgs {
    /// Path to project.pbxproj or its .xcodeproj bundle.
    #[arg(value_name = "PBXPROJ")]
    pub project: PathBuf,

    /// Group path below the main group, segments separated by `/`.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Report what would change without writing the project.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct AddFileArgs {
    /// Path to project.pbxproj or its .xcodeproj bundle.
    #[arg(value_name = "PBXPROJ")]
    pub project: PathBuf,

    /// File to add; relative paths are taken from the working directory.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Destination group below the main group (created when missing).
    #[arg(long = "group", value_name = "NAME")]
    pub group: Option<String>,

    /// Root the recorded path is relative to.
    #[arg(long = "source-tree", value_enum, default_value = "group")]
    pub source_tree: SourceTreeArg,

    /// Project source root (default: the directory containing the .xcodeproj).
    #[arg(long = "source-root", value_name = "DIR")]
    pub source_root: Option<PathBuf>,

    /// Also add the file to the Sources phase of this target.
    #[arg(long = "target", value_name = "NAME")]
    pub target: Option<String>,

    /// Report what would change without writing the project.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SourceTreeArg {
    Group,
    SourceRoot,
    Absolute,
}

impl From<SourceTreeArg> for SourceTree {
    fn from(arg: SourceTreeArg) -> Self {
        match arg {
            SourceTreeArg::Group => SourceTree::Group,
            SourceTreeArg::SourceRoot => SourceTree::SourceRoot,
            SourceTreeArg::Absolute => SourceTree::Absolute,
        }
    }
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
