//! Command-line interface definition for wpb.
//!
//! - `wpb settings` - print the resolved settings
//! - `wpb plan` - print the webpack configuration
//! - `wpb rules <FILE>` - print the rules webpack would apply to a file

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use wpb_config::Mode;

/// wpb - resolve settings and assemble webpack configuration
#[derive(Parser, Debug)]
#[command(name = "wpb", version, about = "Resolve settings and assemble webpack configuration")]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved settings as JSON
    Settings(ResolveArgs),

    /// Print the assembled build plan as JSON
    Plan(ResolveArgs),

    /// Print the rules that apply to a source file
    Rules {
        /// Source file path, e.g. src/Button.module.scss
        #[arg(value_name = "FILE")]
        file: String,

        #[command(flatten)]
        resolve: ResolveArgs,
    },
}

/// Inputs to settings resolution; flags win over the overrides file, which wins over the environment.
#[derive(Args, Debug, Default)]
pub struct ResolveArgs {
    /// Build mode (defaults to NODE_ENV)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Treat the dev server as running (defaults to WEBPACK_SERVE)
    #[arg(long)]
    pub serve: bool,

    /// Produce a distributed build (defaults to IS_DISTRIBUTED)
    #[arg(long)]
    pub distributed: bool,

    /// Project root; skips the upward search
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Directory to start the root search from
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Settings override file (.toml or .json)
    #[arg(short, long, value_name = "FILE")]
    pub overrides: Option<PathBuf>,

    /// Print single-line JSON
    #[arg(long)]
    pub compact: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum ModeArg {
    #[value(name = "development")]
    Development,

    #[value(name = "production")]
    Production,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Development => Mode::Development,
            ModeArg::Production => Mode::Production,
        }
    }
}
