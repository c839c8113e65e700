//! Include expansion: `<!--#include file="partials/header.html" -->`
//!
//! Paths resolve against the directory of the file containing the directive,
//! and included files are expanded before they are spliced in. The chain of
//! files currently being expanded is tracked so a file that includes itself,
//! directly or through others, is reported instead of recursing forever.

use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use super::BuildError;
use crate::diagnostics::{Diagnostic, DiagnosticKind};

lazy_static! {
    static ref INCLUDE: Regex = Regex::new(r#"<!--#include\s+file="([^"]+)"\s*-->"#).unwrap();
}

/// Recursive include expander for one page
pub struct IncludeExpander {
    max_depth: usize,
    chain: Vec<PathBuf>,
    diagnostics: Vec<Diagnostic>,
}

impl IncludeExpander {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            chain: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Expand every include in `text`, which was read from `file`
    pub fn expand(&mut self, text: &str, file: &Path) -> Result<String, BuildError> {
        let key = fs::canonicalize(file).unwrap_or_else(|_| file.to_path_buf());

        if self.chain.contains(&key) {
            let mut chain = self.chain.clone();
            chain.push(key);
            return Err(BuildError::IncludeCycle { chain });
        }
        // The page itself is the first entry, so nesting depth is len - 1
        if self.chain.len() > self.max_depth {
            return Err(BuildError::IncludeDepthExceeded {
                path: file.to_path_buf(),
                limit: self.max_depth,
            });
        }

        self.chain.push(key);
        let result = self.splice(text, file);
        self.chain.pop();
        result
    }

    /// Missing includes and other recovered problems seen so far
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn splice(&mut self, text: &str, file: &Path) -> Result<String, BuildError> {
        let base_dir = file.parent().unwrap_or_else(|| Path::new(""));
        let mut output = String::with_capacity(text.len());
        let mut last = 0;

        for caps in INCLUDE.captures_iter(text) {
            let (Some(directive), Some(rel)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            output.push_str(&text[last..directive.start()]);
            last = directive.end();

            let rel = rel.as_str();
            // A leading separator still resolves under the including file
            let target = base_dir.join(rel.trim_start_matches(['/', '\\']));
            if !target.exists() {
                tracing::warn!("Missing include {:?} in {:?}", rel, file);
                self.diagnostics.push(Diagnostic::new(
                    file,
                    DiagnosticKind::MissingInclude(rel.to_string()),
                ));
                output.push_str(&format!("<!-- missing include: {} -->", rel));
                continue;
            }

            let included =
                fs::read_to_string(&target).map_err(|e| BuildError::io(&target, e))?;
            tracing::debug!("Including {:?} into {:?}", target, file);
            output.push_str(&self.expand(&included, &target)?);
        }

        output.push_str(&text[last..]);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn expand_file(path: &Path, max_depth: usize) -> (Result<String, BuildError>, Vec<Diagnostic>) {
        let text = fs::read_to_string(path).unwrap();
        let mut expander = IncludeExpander::new(max_depth);
        let result = expander.expand(&text, path);
        (result, expander.into_diagnostics())
    }

    #[test]
    fn test_simple_include() {
        let tmp = TempDir::new().unwrap();
        let a = write(tmp.path(), "a.html", "<p><!--#include file=\"b.html\" --></p>");
        write(tmp.path(), "b.html", "X");

        let (result, diagnostics) = expand_file(&a, 8);
        assert_eq!(result.unwrap(), "<p>X</p>");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_nested_includes_resolve_relative_to_includer() {
        let tmp = TempDir::new().unwrap();
        let page = write(
            tmp.path(),
            "pages/index.html",
            "<!--#include file=\"../partials/layout.html\"-->",
        );
        write(
            tmp.path(),
            "partials/layout.html",
            "[<!--#include   file=\"nav/menu.html\" -->]",
        );
        write(tmp.path(), "partials/nav/menu.html", "menu");

        let (result, _) = expand_file(&page, 8);
        assert_eq!(result.unwrap(), "[menu]");
    }

    #[test]
    fn test_leading_slash_stays_under_includer() {
        let tmp = TempDir::new().unwrap();
        let a = write(
            tmp.path(),
            "pages/a.html",
            "<!--#include file=\"/b.html\" -->|<!--#include file=\"/etc/hostname\" -->",
        );
        write(tmp.path(), "pages/b.html", "X");

        let (result, diagnostics) = expand_file(&a, 8);
        assert_eq!(
            result.unwrap(),
            "X|<!-- missing include: /etc/hostname -->"
        );
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::MissingInclude("/etc/hostname".to_string())
        );
    }

    #[test]
    fn test_missing_include_marker() {
        let tmp = TempDir::new().unwrap();
        let a = write(tmp.path(), "a.html", "x<!--#include file=\"nope.html\" -->y");

        let (result, diagnostics) = expand_file(&a, 8);
        assert_eq!(result.unwrap(), "x<!-- missing include: nope.html -->y");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::MissingInclude("nope.html".to_string())
        );
    }

    #[test]
    fn test_diamond_includes_are_allowed() {
        let tmp = TempDir::new().unwrap();
        let a = write(
            tmp.path(),
            "a.html",
            "<!--#include file=\"b.html\" --><!--#include file=\"c.html\" -->",
        );
        write(tmp.path(), "b.html", "b<!--#include file=\"d.html\" -->");
        write(tmp.path(), "c.html", "c<!--#include file=\"d.html\" -->");
        write(tmp.path(), "d.html", "d");

        let (result, _) = expand_file(&a, 8);
        assert_eq!(result.unwrap(), "bdcd");
    }

    #[test]
    fn test_self_include_is_cycle() {
        let tmp = TempDir::new().unwrap();
        let a = write(tmp.path(), "a.html", "<!--#include file=\"a.html\" -->");

        let (result, _) = expand_file(&a, 8);
        match result {
            Err(BuildError::IncludeCycle { chain }) => assert_eq!(chain.len(), 2),
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_indirect_cycle() {
        let tmp = TempDir::new().unwrap();
        let a = write(tmp.path(), "a.html", "<!--#include file=\"b.html\" -->");
        write(tmp.path(), "b.html", "<!--#include file=\"./a.html\" -->");

        let (result, _) = expand_file(&a, 8);
        match result {
            Err(BuildError::IncludeCycle { chain }) => {
                assert_eq!(chain.len(), 3);
                assert_eq!(chain.first(), chain.last());
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_depth_limit() {
        let tmp = TempDir::new().unwrap();
        let a = write(tmp.path(), "l0.html", "<!--#include file=\"l1.html\" -->");
        write(tmp.path(), "l1.html", "<!--#include file=\"l2.html\" -->");
        write(tmp.path(), "l2.html", "<!--#include file=\"l3.html\" -->");
        write(tmp.path(), "l3.html", "bottom");

        let (result, _) = expand_file(&a, 3);
        assert_eq!(result.unwrap(), "bottom");

        let (result, _) = expand_file(&a, 2);
        assert!(matches!(
            result,
            Err(BuildError::IncludeDepthExceeded { limit: 2, .. })
        ));
    }
}
