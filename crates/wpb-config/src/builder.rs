//! Fluent entry point over settings resolution and plan assembly.

use crate::env::Environment;
use crate::error::Result;
use crate::plan::BuildPlan;
use crate::settings::{resolve_settings, ResolvedSettings};

/// Holds the current settings and builds plans from them.
///
/// # Example
///
/// ```no_run
/// use wpb_config::{ResolvedSettings, WebpackBuilder};
///
/// let plan = WebpackBuilder::new()
///     .unwrap()
///     .setup_settings(|defaults| ResolvedSettings {
///         public_url_or_path: "/static/".to_string(),
///         ..defaults.clone()
///     })
///     .build();
/// assert_eq!(plan.output.public_path, "/static/");
/// ```
#[derive(Debug, Clone)]
pub struct WebpackBuilder {
    settings: ResolvedSettings,
}

impl WebpackBuilder {
    /// Resolve default settings from the process environment and working directory.
    ///
    /// # Errors
    ///
    /// Fails when the environment cannot be read or no project root is found.
    pub fn new() -> Result<Self> {
        let env = Environment::from_env()?;
        let settings = resolve_settings(None, &env)?;
        Ok(Self { settings })
    }

    /// Start from settings resolved elsewhere.
    pub fn from_settings(settings: ResolvedSettings) -> Self {
        Self { settings }
    }

    /// The settings the next [`build`](Self::build) will use.
    pub fn settings(&self) -> &ResolvedSettings {
        &self.settings
    }

    /// Replace the settings with whatever `updater` returns.
    ///
    /// The record is stored as given; no field is re-derived, so an updater
    /// may also change values resolution keeps fixed (`port`, `alias`,
    /// `outputPaths`).
    ///
    /// # Arguments
    ///
    /// * `updater` - receives the current settings and returns the new ones
    pub fn setup_settings<F>(mut self, updater: F) -> Self
    where
        F: FnOnce(&ResolvedSettings) -> ResolvedSettings,
    {
        self.settings = updater(&self.settings);
        tracing::debug!(
            mode = self.settings.mode.as_str(),
            public_url = %self.settings.public_url_or_path,
            "settings replaced"
        );
        self
    }

    /// Assemble a plan from the current settings.
    pub fn build(&self) -> BuildPlan {
        BuildPlan::assemble(&self.settings)
    }

    /// Build, then pass the plan through `update`.
    pub fn build_with<F>(&self, update: F) -> BuildPlan
    where
        F: FnOnce(BuildPlan) -> BuildPlan,
    {
        update(self.build())
    }
}
