//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// modpack - package operator modules into component descriptors and module templates
#[derive(Parser, Debug)]
#[command(name = "modpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Package a module and write its module template
    Create(CreateArgs),
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Path to the module config file
    #[arg(long = "config-file", short = 'c')]
    pub config_file: Utf8PathBuf,

    /// File the rendered module template is written to
    #[arg(long, short = 'o', default_value = "template.yaml")]
    pub output: Utf8PathBuf,

    /// Skip checking that the manager image matches the module version
    #[arg(long)]
    pub skip_verify: bool,

    /// Git repository to read commit and remote from (defaults to the config file's directory)
    #[arg(long)]
    pub repository: Option<Utf8PathBuf>,
}
