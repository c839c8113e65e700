//! Page builder errors

use std::path::PathBuf;
use thiserror::Error;

use crate::diagnostics::Diagnostic;

/// Errors that fail a page, or the build as a whole
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Include cycle: {}", display_chain(.chain))]
    IncludeCycle { chain: Vec<PathBuf> },

    #[error("Include depth limit of {limit} exceeded at {}", .path.display())]
    IncludeDepthExceeded { path: PathBuf, limit: usize },

    /// Some pages failed; `diagnostics` still holds the warnings from the
    /// pages that were written
    #[error("{} page(s) failed to build", .failures.len())]
    PagesFailed {
        failures: Vec<(PathBuf, BuildError)>,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}

fn display_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
