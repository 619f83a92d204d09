//! Snapshot of the environment signals that feed settings resolution.

use figment::{
    providers::Env,
    value::{Dict, Value},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Variables read from the process environment.
pub const ENV_KEYS: [&str; 3] = ["NODE_ENV", "WEBPACK_SERVE", "IS_DISTRIBUTED"];

/// Environment signals, captured once per resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// `NODE_ENV=production`
    pub production: bool,

    /// `WEBPACK_SERVE=true`, set by `webpack serve`
    pub serve: bool,

    /// `IS_DISTRIBUTED=true`
    pub distributed: bool,
}

impl Environment {
    /// Read the signals from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_figment(Figment::from(Env::raw().only(&ENV_KEYS)))
    }

    /// Read the signals from any figment carrying the raw (lowercased) keys.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let dict: Dict = figment
            .extract()
            .map_err(|e| ConfigError::Environment(e.to_string()))?;

        let env = Self {
            production: matches_str(dict.get("node_env"), "production"),
            serve: matches_flag(dict.get("webpack_serve")),
            distributed: matches_flag(dict.get("is_distributed")),
        };
        tracing::debug!(?env, "captured environment signals");
        Ok(env)
    }
}

fn matches_str(value: Option<&Value>, expected: &str) -> bool {
    value.and_then(Value::as_str) == Some(expected)
}

// figment parses `"true"` into a boolean, but a quoted value stays a string.
fn matches_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(_, flag)) => *flag,
        other => matches_str(other, "true"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn empty_environment_is_all_false() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let env = Environment::from_env().unwrap();
            assert_eq!(env, Environment::default());
            Ok(())
        });
    }

    #[test]
    fn reads_all_signals() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("NODE_ENV", "production");
            jail.set_env("WEBPACK_SERVE", "true");
            jail.set_env("IS_DISTRIBUTED", "true");

            let env = Environment::from_env().unwrap();
            assert!(env.production);
            assert!(env.serve);
            assert!(env.distributed);
            Ok(())
        });
    }

    #[test]
    fn only_exact_values_count() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("NODE_ENV", "prod");
            jail.set_env("WEBPACK_SERVE", "1");
            jail.set_env("IS_DISTRIBUTED", "false");

            let env = Environment::from_env().unwrap();
            assert_eq!(env, Environment::default());
            Ok(())
        });
    }
}
