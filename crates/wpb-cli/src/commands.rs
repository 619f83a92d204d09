//! Command implementations.

use anyhow::{Context, Result};
use serde::Serialize;

use wpb_config::{
    resolve_settings, resolve_settings_from, BuildPlan, DistributedOverride, Environment,
    ResolvedSettings, SettingsOverride,
};

use crate::cli::{Command, ResolveArgs};

pub fn execute(command: Command) -> Result<()> {
    match command {
        Command::Settings(args) => {
            let settings = resolve(&args)?;
            print_json(&settings, args.compact)
        }
        Command::Plan(args) => {
            let plan = BuildPlan::assemble(&resolve(&args)?);
            tracing::info!(
                mode = plan.mode.as_str(),
                plugins = ?plan.plugin_names(),
                "assembled build plan"
            );
            print_json(&plan, args.compact)
        }
        Command::Rules { file, resolve: args } => {
            let plan = BuildPlan::assemble(&resolve(&args)?);
            let rules = plan.rules_for(&file)?;
            if rules.is_empty() {
                tracing::warn!(file = %file, "no rule applies");
            }
            print_json(&rules, args.compact)
        }
    }
}

/// Merge CLI flags over the overrides file.
pub fn build_overrides(args: &ResolveArgs) -> Result<SettingsOverride> {
    let mut overrides = match &args.overrides {
        Some(path) => SettingsOverride::from_file(path)
            .with_context(|| format!("failed to load overrides from {}", path.display()))?,
        None => SettingsOverride::default(),
    };

    if let Some(mode) = args.mode {
        overrides.mode = Some(mode.into());
    }
    if args.serve {
        overrides.is_server_running = Some(true);
    }
    if args.distributed {
        overrides
            .distributed
            .get_or_insert_with(DistributedOverride::default)
            .is_distributed = Some(true);
    }
    if let Some(root) = &args.root {
        overrides.app_root = Some(root.clone());
    }

    Ok(overrides)
}

fn resolve(args: &ResolveArgs) -> Result<ResolvedSettings> {
    let env = Environment::from_env()?;
    let overrides = build_overrides(args)?;

    let settings = match &args.cwd {
        Some(dir) => resolve_settings_from(dir, Some(&overrides), &env)?,
        None => resolve_settings(Some(&overrides), &env)?,
    };
    Ok(settings)
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ModeArg;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use wpb_config::Mode;

    #[test]
    fn flags_override_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wpb.toml");
        fs::write(&path, "MODE = \"development\"\nAPP_ROOT = \"/from/file\"\n").unwrap();

        let args = ResolveArgs {
            mode: Some(ModeArg::Production),
            distributed: true,
            overrides: Some(path),
            ..Default::default()
        };
        let o = build_overrides(&args).unwrap();
        assert_eq!(o.mode, Some(Mode::Production));
        assert_eq!(o.app_root, Some(PathBuf::from("/from/file")));
        assert_eq!(o.distributed.and_then(|d| d.is_distributed), Some(true));
        assert_eq!(o.is_server_running, None);
    }

    #[test]
    fn unset_flags_leave_fields_empty() {
        let o = build_overrides(&ResolveArgs::default()).unwrap();
        assert_eq!(o, SettingsOverride::default());
    }

    #[test]
    fn missing_overrides_file_has_context() {
        let args = ResolveArgs {
            overrides: Some(PathBuf::from("/no/such/wpb.toml")),
            ..Default::default()
        };
        let err = build_overrides(&args).unwrap_err();
        assert!(err.to_string().contains("failed to load overrides"));
    }
}
