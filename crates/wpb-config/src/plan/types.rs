//! Typed sections of the webpack configuration.
//!
//! Most records map one-to-one onto a webpack option object and serialize
//! with webpack's own key names. [`Pattern`] stands in for a JavaScript
//! `RegExp` and travels as its literal text.

use indexmap::IndexMap;
use regex::RegexBuilder;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

use crate::loaders::UseEntry;
use crate::settings::Mode;

/// Output descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    /// Bundle filename pattern (content-hashed)
    pub filename: String,

    /// Physical output directory
    pub path: PathBuf,

    /// Filename pattern for lazily loaded chunks
    pub chunk_filename: String,

    /// URL prefix the emitted assets are served under
    pub public_path: String,
}

/// Module resolution options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolve {
    /// Extensions tried, in order, for extensionless imports
    pub extensions: Vec<String>,
    pub alias: IndexMap<String, PathBuf>,
}

/// Source map strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Devtool {
    EvalCheapModuleSourceMap,
    /// Serialized as `false`
    Disabled,
}

impl Serialize for Devtool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::EvalCheapModuleSourceMap => serializer.serialize_str("eval-cheap-module-source-map"),
            Self::Disabled => serializer.serialize_bool(false),
        }
    }
}

/// Reporting verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stats {
    /// Errors and warnings only
    ErrorsWarnings,
    Detailed,
}

/// Folder the dev server serves as-is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticOptions {
    pub directory: PathBuf,
}

/// Browser-side dev server behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOptions {
    pub logging: String,
    pub overlay: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevMiddlewareOptions {
    /// Also emit bundles to disk while serving from memory
    pub write_to_disk: bool,
}

/// webpack-dev-server options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServer {
    #[serde(rename = "static")]
    pub static_files: StaticOptions,

    pub client: ClientOptions,

    pub compress: bool,

    /// Hot module replacement
    pub hot: bool,

    pub port: u16,

    /// Serve `index.html` for unknown routes (client-side routing)
    pub history_api_fallback: bool,

    pub dev_middleware: DevMiddlewareOptions,
}

/// A minimizer plugin and its options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Minimizer {
    pub plugin: String,
    pub options: Value,
}

/// Production-only optimization section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Optimization {
    /// Value webpack assigns to `process.env.NODE_ENV`
    pub node_env: Mode,
    pub minimize: bool,
    pub minimizer: Vec<Minimizer>,
}

/// Warning filter; messages matching `message` are suppressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreWarning {
    pub message: Pattern,
}

/// A JavaScript regex literal, serialized as `/source/flags`.
///
/// Only the `i` flag is supported.
///
/// # Example
///
/// ```
/// use wpb_config::plan::Pattern;
///
/// let scss = Pattern::icase(r"\.s[ac]ss$");
/// assert_eq!(scss.to_string(), r"/\.s[ac]ss$/i");
/// assert!(scss.is_match("src/App.SCSS").unwrap());
/// assert_eq!(Pattern::parse(r"/\.s[ac]ss$/i"), Some(scss));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub source: String,
    pub case_insensitive: bool,
}

impl Pattern {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            case_insensitive: false,
        }
    }

    /// Case-insensitive pattern (`i` flag)
    pub fn icase(source: &str) -> Self {
        Self {
            source: source.to_string(),
            case_insensitive: true,
        }
    }

    /// Parse a literal such as `/node_modules/` or `/\.ts$/i`.
    ///
    /// Returns `None` when the text is not delimited by slashes or carries
    /// flags other than `i`.
    pub fn parse(literal: &str) -> Option<Self> {
        let (source, flags) = literal.strip_prefix('/')?.rsplit_once('/')?;
        match flags {
            "" => Some(Self::new(source)),
            "i" => Some(Self::icase(source)),
            _ => None,
        }
    }

    /// Test `haystack` against the pattern.
    ///
    /// # Errors
    ///
    /// Returns the regex error when `source` is not a valid pattern.
    pub fn is_match(&self, haystack: &str) -> Result<bool, regex::Error> {
        let re = RegexBuilder::new(&self.source)
            .case_insensitive(self.case_insensitive)
            .build()?;
        Ok(re.is_match(haystack))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = if self.case_insensitive { "i" } else { "" };
        write!(f, "/{}/{}", self.source, flags)
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let literal = String::deserialize(deserializer)?;
        Self::parse(&literal)
            .ok_or_else(|| D::Error::custom(format!("expected a regex literal, got `{literal}`")))
    }
}

/// A transformation rule: files matching `test` (and not `exclude`) go
/// through `uses`, applied by webpack from last to first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub test: Pattern,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Pattern>,

    #[serde(rename = "use")]
    pub uses: Vec<UseEntry>,
}

impl Rule {
    /// Rule without an exclusion.
    pub fn new(test: Pattern, uses: Vec<UseEntry>) -> Self {
        Self {
            test,
            exclude: None,
            uses,
        }
    }

    /// Skip files matching `pattern`.
    pub fn exclude(mut self, pattern: Pattern) -> Self {
        self.exclude = Some(pattern);
        self
    }

    /// Loader names in declaration order.
    pub fn loaders(&self) -> impl Iterator<Item = &str> {
        self.uses.iter().map(|u| u.loader.as_str())
    }

    /// Whether webpack would apply this rule to `path`.
    pub fn applies_to(&self, path: &str) -> Result<bool, regex::Error> {
        if !self.test.is_match(path)? {
            return Ok(false);
        }
        match &self.exclude {
            Some(exclude) => Ok(!exclude.is_match(path)?),
            None => Ok(true),
        }
    }
}

/// The `module` section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleOptions {
    pub rules: Vec<Rule>,
}

/// Serialize `None` as an empty object, the way webpack expects unused sections.
pub(crate) fn empty_when_none<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    use serde::ser::SerializeMap;

    match value {
        Some(inner) => inner.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}
