//! Style loader chain constructors.
//!
//! Rules combine these as `[style_or_extract, css | css_modules, post_css, sass?]`.
//! webpack applies loaders right to left, so the emission step comes first.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::settings::ResolvedSettings;

/// Loader shipped with mini-css-extract-plugin
pub const MINI_CSS_EXTRACT_LOADER: &str = "mini-css-extract-plugin/dist/loader.js";

pub const DEV_LOCAL_IDENT_NAME: &str = "[local]--[folder]--[hash:base64:3]";
pub const PROD_LOCAL_IDENT_NAME: &str = "[hash:base64:6]";

const SASS_ABSTRACTS: &str = "src/assets/styles/abstracts/_index.scss";

/// One entry of a rule's `use` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseEntry {
    pub loader: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl UseEntry {
    pub fn new(loader: impl Into<String>) -> Self {
        Self {
            loader: loader.into(),
            options: None,
        }
    }

    pub fn with_options(loader: impl Into<String>, options: Value) -> Self {
        Self {
            loader: loader.into(),
            options: Some(options),
        }
    }

    /// Look up an option by JSON pointer, e.g. `/modules/localIdentName`.
    pub fn option(&self, pointer: &str) -> Option<&Value> {
        self.options.as_ref()?.pointer(pointer)
    }
}

/// Loader constructors bound to one settings record
#[derive(Debug, Clone, Copy)]
pub struct Loaders<'a> {
    settings: &'a ResolvedSettings,
}

impl<'a> Loaders<'a> {
    pub fn new(settings: &'a ResolvedSettings) -> Self {
        Self { settings }
    }

    // PostCSS 8 plugin list; names are resolved by postcss-loader.
    pub fn post_css(&self) -> UseEntry {
        UseEntry::with_options(
            "postcss-loader",
            json!({
                "postcssOptions": {
                    "plugins": [
                        ["postcss-preset-env", { "stage": 4 }],
                        "postcss-flexbugs-fixes",
                        "autoprefixer"
                    ]
                }
            }),
        )
    }

    pub fn sass(&self) -> UseEntry {
        let include = self.settings.app_src.join("assets/styles/abstracts/**/*.scss");
        UseEntry::with_options(
            "sass-loader",
            json!({
                "sourceMap": self.settings.dev,
                "additionalData": format!("@import \"{SASS_ABSTRACTS}\";"),
                "sassOptions": {
                    "includePaths": [include]
                }
            }),
        )
    }

    pub fn css(&self) -> UseEntry {
        UseEntry::with_options(
            "css-loader",
            json!({
                "sourceMap": self.settings.dev,
                "importLoaders": 2
            }),
        )
    }

    pub fn css_modules(&self) -> UseEntry {
        UseEntry::with_options(
            "css-loader",
            json!({
                "importLoaders": 2,
                "esModule": true,
                "modules": {
                    "localIdentName": local_ident_name(self.settings.dev)
                },
                "sourceMap": self.settings.dev
            }),
        )
    }

    /// Inject styles into the page while the dev server runs, extract them to a file otherwise.
    pub fn style_or_extract(&self) -> UseEntry {
        if self.settings.is_server_running {
            UseEntry::new("style-loader")
        } else {
            UseEntry::new(MINI_CSS_EXTRACT_LOADER)
        }
    }
}

pub fn local_ident_name(dev: bool) -> &'static str {
    if dev {
        DEV_LOCAL_IDENT_NAME
    } else {
        PROD_LOCAL_IDENT_NAME
    }
}
