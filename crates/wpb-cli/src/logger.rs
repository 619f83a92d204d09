//! Logging setup for the wpb CLI.
//!
//! Logs go to stderr so stdout carries only JSON.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "wpb=debug,wpb_cli=debug,wpb_config=debug";
const QUIET_FILTER: &str = "wpb=error,wpb_cli=error,wpb_config=error";
const DEFAULT_FILTER: &str = "wpb=info,wpb_cli=info,wpb_config=info";

/// Initialize the global tracing subscriber.
///
/// Level selection: `--verbose`, then `--quiet`, then `RUST_LOG`, then info.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter(verbose, quiet))
        .with(fmt_layer)
        .init();
}

fn filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}
