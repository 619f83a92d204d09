//! Settings resolution.
//!
//! Every field of [`ResolvedSettings`] falls back independently: an explicit
//! value from [`SettingsOverride`] wins, otherwise the value is derived from
//! the [`Environment`] snapshot, other resolved fields, or a fixed default.
//! Resolution is recomputed in full on each call and never patches a prior
//! result.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Format, Json, Toml},
    Figment,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::env::Environment;
use crate::error::{ConfigError, Result};
use crate::lookup::{absolutize, PathLookup};

/// Folder names marking the project root.
pub const ROOT_MARKERS: [&str; 2] = ["node_modules", "scripts"];

pub const DEFAULT_PORT: u16 = 4004;

pub const DEFAULT_PUBLIC_URL: &str = "/";

/// Build mode handed to the bundler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// Output subfolders, relative to the public directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    pub js: String,
    pub css: String,
    pub images: String,
    pub svg: String,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            js: "js".to_string(),
            css: "css".to_string(),
            images: "images".to_string(),
            svg: "images/icon".to_string(),
        }
    }
}

/// Overrides applied only when the build is distributed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributedOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_distributed: Option<bool>,

    /// Public folder name used instead of `public`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_public: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_url_or_path: Option<String>,
}

/// Caller-supplied settings; absent fields are computed.
///
/// `outputPaths`, `alias` and `port` are accepted so a full settings record
/// round-trips, but resolution always uses the fixed values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributed: Option<DistributedOverride>,

    #[serde(rename = "APP_ROOT", default, skip_serializing_if = "Option::is_none")]
    pub app_root: Option<PathBuf>,

    #[serde(rename = "APP_SRC", default, skip_serializing_if = "Option::is_none")]
    pub app_src: Option<PathBuf>,

    #[serde(rename = "APP_PUBLIC", default, skip_serializing_if = "Option::is_none")]
    pub app_public: Option<PathBuf>,

    #[serde(rename = "publicUrlOrPath", default, skip_serializing_if = "Option::is_none")]
    pub public_url_or_path: Option<String>,

    #[serde(rename = "outputPaths", default, skip_serializing_if = "Option::is_none")]
    pub output_paths: Option<OutputPaths>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<IndexMap<String, PathBuf>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(rename = "isServerRunning", default, skip_serializing_if = "Option::is_none")]
    pub is_server_running: Option<bool>,

    #[serde(rename = "MODE", default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    #[serde(rename = "__PROD__", default, skip_serializing_if = "Option::is_none")]
    pub prod: Option<bool>,

    #[serde(rename = "__DEV__", default, skip_serializing_if = "Option::is_none")]
    pub dev: Option<bool>,
}

impl SettingsOverride {
    /// Parse an override record from a JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    /// Load an override record from a `.toml` file, or JSON for any other extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("override file not found: {}", path.display()),
            )));
        }

        let figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Figment::from(Toml::file(path)),
            _ => Figment::from(Json::file(path)),
        };

        figment
            .extract()
            .map_err(|e| ConfigError::InvalidValue(format!("{}: {}", path.display(), e)))
    }
}

impl From<&ResolvedSettings> for SettingsOverride {
    fn from(settings: &ResolvedSettings) -> Self {
        Self {
            distributed: None,
            app_root: Some(settings.app_root.clone()),
            app_src: Some(settings.app_src.clone()),
            app_public: Some(settings.app_public.clone()),
            public_url_or_path: Some(settings.public_url_or_path.clone()),
            output_paths: Some(settings.output_paths.clone()),
            alias: Some(settings.alias.clone()),
            port: Some(settings.port),
            is_server_running: Some(settings.is_server_running),
            mode: Some(settings.mode),
            prod: Some(settings.prod),
            dev: Some(settings.dev),
        }
    }
}

/// Fully populated settings driving plan assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSettings {
    #[serde(rename = "APP_ROOT")]
    pub app_root: PathBuf,

    #[serde(rename = "APP_SRC")]
    pub app_src: PathBuf,

    #[serde(rename = "APP_PUBLIC")]
    pub app_public: PathBuf,

    #[serde(rename = "publicUrlOrPath")]
    pub public_url_or_path: String,

    #[serde(rename = "outputPaths")]
    pub output_paths: OutputPaths,

    pub alias: IndexMap<String, PathBuf>,

    pub port: u16,

    #[serde(rename = "isServerRunning")]
    pub is_server_running: bool,

    #[serde(rename = "MODE")]
    pub mode: Mode,

    #[serde(rename = "__PROD__")]
    pub prod: bool,

    #[serde(rename = "__DEV__")]
    pub dev: bool,
}

/// Resolve settings, searching for the project root from the working directory.
pub fn resolve_settings(
    overrides: Option<&SettingsOverride>,
    env: &Environment,
) -> Result<ResolvedSettings> {
    resolve(overrides, env, || PathLookup::new(ROOT_MARKERS).resolve())
}

/// Resolve settings, searching for the project root from `start`.
pub fn resolve_settings_from(
    start: impl AsRef<Path>,
    overrides: Option<&SettingsOverride>,
    env: &Environment,
) -> Result<ResolvedSettings> {
    let start = start.as_ref();
    resolve(overrides, env, || {
        PathLookup::new(ROOT_MARKERS).start_at(start).resolve()
    })
}

fn resolve(
    overrides: Option<&SettingsOverride>,
    env: &Environment,
    find_root: impl FnOnce() -> Result<PathBuf>,
) -> Result<ResolvedSettings> {
    let empty = SettingsOverride::default();
    let o = overrides.unwrap_or(&empty);
    let distributed = o.distributed.as_ref();

    warn_ignored(o);

    let mode = o.mode.unwrap_or(if env.production {
        Mode::Production
    } else {
        Mode::Development
    });
    let prod = o.prod.unwrap_or(mode == Mode::Production);
    let dev = o.dev.unwrap_or(!prod);

    let is_server_running = o.is_server_running.unwrap_or(env.serve);
    let is_distributed = distributed
        .and_then(|d| d.is_distributed)
        .unwrap_or(env.distributed);

    let app_root = match &o.app_root {
        Some(root) => root.clone(),
        None => find_root()?,
    };
    let app_src = match &o.app_src {
        Some(src) => src.clone(),
        None => absolutize(&app_root.join("src"))?,
    };
    let app_public = match &o.app_public {
        Some(public) => public.clone(),
        None => {
            let folder = distributed
                .and_then(|d| d.app_public.as_deref())
                .filter(|name| is_distributed && !name.is_empty())
                .unwrap_or("public");
            absolutize(&app_root.join(folder))?
        }
    };

    let public_url_or_path = resolve_public_url(
        o.public_url_or_path.as_deref(),
        is_distributed,
        distributed.and_then(|d| d.public_url_or_path.as_deref()),
    );

    let alias = base_alias(&app_src)?;

    let settings = ResolvedSettings {
        app_root,
        app_src,
        app_public,
        public_url_or_path,
        output_paths: OutputPaths::default(),
        alias,
        port: DEFAULT_PORT,
        is_server_running,
        mode,
        prod,
        dev,
    };

    tracing::debug!(
        mode = settings.mode.as_str(),
        prod = settings.prod,
        dev = settings.dev,
        server = settings.is_server_running,
        distributed = is_distributed,
        root = %settings.app_root.display(),
        "resolved settings"
    );
    Ok(settings)
}

/// The distributed URL only applies when the override also names a URL of its
/// own; every other combination yields `/`.
fn resolve_public_url(
    requested: Option<&str>,
    is_distributed: bool,
    distributed_url: Option<&str>,
) -> String {
    let requested = requested.filter(|url| !url.is_empty());
    let distributed_url = distributed_url.filter(|url| is_distributed && !url.is_empty());

    match (requested, distributed_url) {
        (Some(_), Some(url)) => url.to_string(),
        _ => DEFAULT_PUBLIC_URL.to_string(),
    }
}

// Keep in sync with the `paths` section of the project's tsconfig.json.
fn base_alias(app_src: &Path) -> Result<IndexMap<String, PathBuf>> {
    Ok(IndexMap::from([
        ("@".to_string(), app_src.to_path_buf()),
        ("@UI".to_string(), absolutize(&app_src.join("components/UI"))?),
        ("@images".to_string(), absolutize(&app_src.join("assets/images"))?),
        ("@styles".to_string(), absolutize(&app_src.join("assets/styles"))?),
    ]))
}

fn warn_ignored(o: &SettingsOverride) {
    if o.output_paths.is_some() {
        tracing::debug!("ignoring outputPaths override, output folders are fixed");
    }
    if o.alias.is_some() {
        tracing::debug!("ignoring alias override, aliases derive from APP_SRC");
    }
    if o.port.is_some() {
        tracing::debug!("ignoring port override, port is fixed at {DEFAULT_PORT}");
    }
}
