use std::process::ExitCode;

use clap::Parser;
use wpb_cli::{cli, commands, logger};
use wpb_config::ConfigError;

fn main() -> ExitCode {
    let args = cli::Cli::parse();
    logger::init_logger(args.verbose, args.quiet, args.no_color);

    match commands::execute(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Without a project root nothing else can be resolved.
            if let Some(config_err) = err.downcast_ref::<ConfigError>() {
                if config_err.is_unresolved_root() {
                    tracing::error!("{config_err}; pass --root or run inside the project");
                    return ExitCode::FAILURE;
                }
            }
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
