//! Diagnostics collected while loading content and building pages
//!
//! Nothing in the content pipeline or the page builder aborts over a single
//! bad document, include or token. Each recovery is recorded here instead so
//! callers can report what was skipped or substituted.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// What went wrong, and how it was recovered
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Front matter did not parse; empty metadata was used
    #[error("malformed front matter: {0}")]
    MalformedFrontMatter(String),

    /// Metadata did not match the document kind; the document was skipped
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// The `date` field could not be parsed; the document sorts last
    #[error("unparseable date {0:?}")]
    UnparseableDate(String),

    /// A file or directory entry could not be read; it was skipped
    #[error("unreadable: {0}")]
    UnreadableFile(String),

    /// The collection directory does not exist; the listing is empty
    #[error("content directory not found")]
    MissingDirectory,

    /// The page metadata block did not parse; empty metadata was used
    #[error("malformed page metadata: {0}")]
    MalformedPageMeta(String),

    /// An include target does not exist; a marker comment was emitted
    #[error("missing include: {0}")]
    MissingInclude(String),

    /// A token had no value; it was replaced with an empty string
    #[error("unresolved token {{{{{0}}}}}")]
    UnresolvedToken(String),
}

/// A single recovered problem, tied to the file it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new<P: AsRef<Path>>(path: P, kind: DiagnosticKind) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            kind,
        }
    }

    /// Whether content was dropped, as opposed to substituted
    pub fn is_error(&self) -> bool {
        matches!(
            self.kind,
            DiagnosticKind::InvalidDocument(_) | DiagnosticKind::UnreadableFile(_)
        )
    }

    /// Emit this diagnostic through tracing
    pub fn log(&self) {
        if self.is_error() {
            tracing::warn!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diag = Diagnostic::new(
            "src/pages/index.html",
            DiagnosticKind::UnresolvedToken("site.year".to_string()),
        );
        assert_eq!(
            diag.to_string(),
            "src/pages/index.html: unresolved token {{site.year}}"
        );
    }

    #[test]
    fn test_is_error() {
        assert!(Diagnostic::new("a.md", DiagnosticKind::InvalidDocument("x".into())).is_error());
        assert!(!Diagnostic::new("a.md", DiagnosticKind::UnparseableDate("x".into())).is_error());
        assert!(!Diagnostic::new("posts", DiagnosticKind::MissingDirectory).is_error());
    }
}
