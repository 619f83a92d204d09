//! Bounded upward search for a directory containing a marker entry.
//!
//! Starting from a directory (the working directory by default), each step
//! lists the candidate's entries and stops as soon as one of them is named
//! like a marker. Otherwise the candidate moves one `..` up, until the depth
//! budget runs out.
//!
//! # Example
//!
//! ```no_run
//! use wpb_config::PathLookup;
//!
//! let root = PathLookup::new(["node_modules", "scripts"])
//!     .max_depth(5)
//!     .resolve()
//!     .unwrap();
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::error::{ConfigError, Result};

pub const DEFAULT_MAX_DEPTH: usize = 10;

type OnSuccess<'a> = Box<dyn Fn(PathBuf) -> PathBuf + 'a>;
type OnFailure<'a> = Box<dyn Fn() -> PathBuf + 'a>;

/// Upward directory search configuration
pub struct PathLookup<'a> {
    markers: Vec<String>,
    start: Option<PathBuf>,
    max_depth: usize,
    on_success: Option<OnSuccess<'a>>,
    on_failure: Option<OnFailure<'a>>,
}

impl<'a> PathLookup<'a> {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
            start: None,
            max_depth: DEFAULT_MAX_DEPTH,
            on_success: None,
            on_failure: None,
        }
    }

    /// Start from `dir` instead of the working directory.
    pub fn start_at(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start = Some(dir.into());
        self
    }

    /// Number of directories inspected before giving up.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Map the resolved absolute path of a match to the final result.
    pub fn on_success(mut self, f: impl Fn(PathBuf) -> PathBuf + 'a) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    /// Supply a path to use instead of failing when nothing matches.
    ///
    /// Also intercepts directory read errors.
    pub fn on_failure(mut self, f: impl Fn() -> PathBuf + 'a) -> Self {
        self.on_failure = Some(Box::new(f));
        self
    }

    pub fn resolve(&self) -> Result<PathBuf> {
        let mut candidate = self.start.clone().unwrap_or_else(|| PathBuf::from("."));
        let mut depth = 0;

        while depth < self.max_depth {
            let found = match self.contains_marker(&candidate) {
                Ok(found) => found,
                Err(source) => {
                    tracing::error!(path = %candidate.display(), error = %source, "error while reading directory");
                    let err = ConfigError::ReadDir {
                        path: candidate,
                        source,
                    };
                    return self.fallback(err);
                }
            };

            if found {
                let resolved = absolutize(&candidate)?;
                tracing::debug!(path = %resolved.display(), depth, "found marker directory");
                return Ok(match &self.on_success {
                    Some(f) => f(resolved),
                    None => resolved,
                });
            }

            depth += 1;
            candidate.push("..");
        }

        tracing::warn!(markers = ?self.markers, depth, "marker directory not found");
        self.fallback(ConfigError::RootNotFound {
            markers: self.markers.clone(),
            depth,
        })
    }

    fn contains_marker(&self, dir: &Path) -> std::io::Result<bool> {
        for entry in fs::read_dir(dir)? {
            let name = entry?.file_name();
            if self.markers.iter().any(|marker| name == marker.as_str()) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn fallback(&self, err: ConfigError) -> Result<PathBuf> {
        match &self.on_failure {
            Some(f) => {
                let path = absolutize(&f())?;
                tracing::debug!(path = %path.display(), "using fallback path");
                Ok(path)
            }
            None => Err(err),
        }
    }
}

/// Resolve `path` against the working directory and normalize `.`/`..`.
pub(crate) fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.clean());
    }
    Ok(std::env::current_dir()?.join(path).clean())
}
