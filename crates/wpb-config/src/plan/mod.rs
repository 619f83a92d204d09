//! Build-plan assembly.
//!
//! A [`BuildPlan`] is the complete webpack configuration derived from one
//! [`ResolvedSettings`] record. Its JSON form mirrors the webpack
//! configuration object; sections that do not apply to the current mode
//! serialize as empty objects.

mod rules;
mod types;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::loaders::Loaders;
use crate::plugins::{plugins, Plugin};
use crate::settings::{Mode, ResolvedSettings};

pub use types::{
    ClientOptions, DevMiddlewareOptions, DevServer, Devtool, IgnoreWarning, Minimizer,
    ModuleOptions, Optimization, Output, Pattern, Resolve, Rule, StaticOptions, Stats,
};

use types::empty_when_none;

pub const RESOLVE_EXTENSIONS: [&str; 8] =
    [".js", ".jsx", ".ts", ".tsx", ".css", ".sass", ".scss", ".json"];

/// webpack target environment
pub const TARGET: &str = "web";

/// Configuration handed to the bundler
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlan {
    pub mode: Mode,

    /// Entry points keyed by output folder
    pub entry: IndexMap<String, PathBuf>,

    pub output: Output,

    pub resolve: Resolve,

    pub target: String,

    pub devtool: Devtool,

    /// Present only in development
    #[serde(serialize_with = "empty_when_none")]
    pub dev_server: Option<DevServer>,

    pub stats: Stats,

    pub ignore_warnings: Vec<IgnoreWarning>,

    /// Present only in production
    #[serde(serialize_with = "empty_when_none")]
    pub optimization: Option<Optimization>,

    pub module: ModuleOptions,

    pub plugins: Vec<Plugin>,
}

impl BuildPlan {
    /// Assemble the full plan for `settings`.
    pub fn assemble(settings: &ResolvedSettings) -> Self {
        let loaders = Loaders::new(settings);

        let mut rules = rules::script_rules();
        rules.extend(rules::style_rules(&loaders));
        rules.extend(rules::asset_rules(settings));
        rules.extend(rules::template_rules(settings));

        let plan = Self {
            mode: settings.mode,
            entry: IndexMap::from([(
                format!("{}/", settings.output_paths.js),
                settings.app_src.join("index.tsx"),
            )]),
            output: Output {
                filename: "[name][contenthash].js".to_string(),
                path: settings.app_public.clone(),
                chunk_filename: "[id].[chunkhash].js".to_string(),
                public_path: settings.public_url_or_path.clone(),
            },
            resolve: Resolve {
                extensions: RESOLVE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
                alias: settings.alias.clone(),
            },
            target: TARGET.to_string(),
            devtool: if settings.dev {
                Devtool::EvalCheapModuleSourceMap
            } else {
                Devtool::Disabled
            },
            dev_server: settings.dev.then(|| dev_server(settings)),
            stats: if settings.dev || settings.is_server_running {
                Stats::ErrorsWarnings
            } else {
                Stats::Detailed
            },
            // deprecated `color-adjust` warnings raised by bootstrap's styles
            ignore_warnings: vec![IgnoreWarning {
                message: Pattern::new("color-adjust"),
            }],
            optimization: settings.prod.then(|| optimization(settings.mode)),
            module: ModuleOptions { rules },
            plugins: plugins(settings),
        };

        tracing::debug!(
            mode = plan.mode.as_str(),
            rules = plan.module.rules.len(),
            plugins = plan.plugins.len(),
            dev_server = plan.dev_server.is_some(),
            optimization = plan.optimization.is_some(),
            "assembled build plan"
        );
        plan
    }

    /// Rules webpack would apply to `path`, in declaration order.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use wpb_config::{resolve_settings, BuildPlan, Environment};
    ///
    /// let settings = resolve_settings(None, &Environment::from_env()?)?;
    /// let plan = BuildPlan::assemble(&settings);
    /// for rule in plan.rules_for("src/Button.module.scss")? {
    ///     println!("{}", rule.test);
    /// }
    /// # Ok::<(), wpb_config::ConfigError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a rule pattern fails to compile.
    pub fn rules_for(&self, path: &str) -> Result<Vec<&Rule>> {
        let mut matched = Vec::new();
        for rule in &self.module.rules {
            let applies = rule
                .applies_to(path)
                .map_err(|e| ConfigError::InvalidValue(format!("rule {}: {}", rule.test, e)))?;
            if applies {
                matched.push(rule);
            }
        }
        Ok(matched)
    }

    /// Names of the selected plugins, in activation order.
    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(Plugin::name).collect()
    }

    /// The plan as the JSON object handed to webpack.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}

fn dev_server(settings: &ResolvedSettings) -> DevServer {
    DevServer {
        static_files: StaticOptions {
            directory: settings.app_root.join("public"),
        },
        client: ClientOptions {
            logging: "none".to_string(),
            overlay: false,
        },
        compress: true,
        hot: settings.is_server_running,
        port: settings.port,
        history_api_fallback: true,
        dev_middleware: DevMiddlewareOptions {
            write_to_disk: false,
        },
    }
}

fn optimization(mode: Mode) -> Optimization {
    Optimization {
        node_env: mode,
        minimize: true,
        minimizer: vec![
            Minimizer {
                plugin: "CssMinimizerPlugin".to_string(),
                options: json!({
                    "minimizerOptions": {
                        "preset": ["default", { "discardComments": { "removeAll": true } }]
                    }
                }),
            },
            Minimizer {
                plugin: "TerserPlugin".to_string(),
                options: json!({
                    "exclude": "/node_modules/",
                    "extractComments": false,
                    "terserOptions": {
                        "parse": { "html5_comments": false },
                        "mangle": true,
                        "sourceMap": false,
                        "compress": {
                            "defaults": true,
                            "drop_console": false,
                            "keep_infinity": true,
                            "passes": 2
                        },
                        "format": {
                            "comments": false,
                            "preamble": "",
                            "quote_style": 3,
                            "preserve_annotations": false,
                            "ecma": 2020
                        },
                        "ecma": 2020,
                        "keep_classnames": false,
                        "keep_fnames": false,
                        "safari10": false
                    }
                }),
            },
        ],
    }
}
