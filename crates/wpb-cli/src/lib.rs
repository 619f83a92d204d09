//! wpb command-line interface.
//!
//! Thin surface over `wpb-config`: resolves settings from the environment,
//! an optional overrides file and flags, then prints the settings, the
//! assembled webpack configuration, or the rules matching a file.

pub mod cli;
pub mod commands;
pub mod logger;
