//! Plugin selection.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::plan::Pattern;
use crate::settings::ResolvedSettings;

/// A webpack plugin and the options it is constructed with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "plugin", content = "options")]
pub enum Plugin {
    /// Inlines build-time constants
    #[serde(rename = "DefinePlugin")]
    Define {
        #[serde(rename = "__DEV__")]
        dev: bool,
        #[serde(rename = "__PROD__")]
        prod: bool,
    },

    /// Fails the build on import cycles among matching modules
    #[serde(rename = "CircularDependencyPlugin", rename_all = "camelCase")]
    CircularDependency {
        exclude: Pattern,
        include: Pattern,
        fail_on_error: bool,
        cwd: PathBuf,
        allow_async_cycles: bool,
    },

    #[serde(rename = "HtmlWebpackPlugin")]
    Html {
        template: PathBuf,
        filename: PathBuf,
        inject: String,
        minify: bool,
    },

    #[serde(rename = "ReactRefreshWebpackPlugin")]
    ReactRefresh { overlay: bool },

    #[serde(rename = "MiniCssExtractPlugin")]
    MiniCssExtract { filename: String },
}

impl Plugin {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Define { .. } => "DefinePlugin",
            Self::CircularDependency { .. } => "CircularDependencyPlugin",
            Self::Html { .. } => "HtmlWebpackPlugin",
            Self::ReactRefresh { .. } => "ReactRefreshWebpackPlugin",
            Self::MiniCssExtract { .. } => "MiniCssExtractPlugin",
        }
    }
}

/// Whether styles are written to a file rather than injected by the dev server.
pub fn extracts_styles(settings: &ResolvedSettings) -> bool {
    settings.prod || (settings.dev && !settings.is_server_running)
}

/// Plugins to activate, in order.
pub fn plugins(settings: &ResolvedSettings) -> Vec<Plugin> {
    let mut plugins = vec![
        Plugin::Define {
            dev: settings.dev,
            prod: settings.prod,
        },
        Plugin::CircularDependency {
            exclude: Pattern::new("node_modules"),
            include: Pattern::new("react-hook-form"),
            fail_on_error: true,
            cwd: settings.app_root.clone(),
            allow_async_cycles: false,
        },
        Plugin::Html {
            template: settings.app_src.join("index.pug"),
            filename: settings.app_public.join("index.html"),
            inject: "body".to_string(),
            minify: settings.prod,
        },
    ];

    if settings.is_server_running {
        plugins.push(Plugin::ReactRefresh { overlay: false });
    }

    if extracts_styles(settings) {
        plugins.push(Plugin::MiniCssExtract {
            filename: format!("{}/[contenthash].css", settings.output_paths.css),
        });
    }

    tracing::debug!(
        plugins = ?plugins.iter().map(Plugin::name).collect::<Vec<_>>(),
        "selected plugins"
    );
    plugins
}
