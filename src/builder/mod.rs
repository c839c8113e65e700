//! Page builder - expands includes and tokens in HTML pages
//!
//! Every `*.html` file under the pages directory is built into the same
//! relative path under the public directory. Asset directories are copied
//! as they are.

mod error;
mod include;
mod page;
mod tokens;

pub use error::BuildError;
pub use include::IncludeExpander;
pub use page::Page;
pub use tokens::TokenSet;

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::Folio;

/// Result of a successful build
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Built pages, relative to the pages directory
    pub pages: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A single page after expansion and substitution
#[derive(Debug)]
pub struct BuiltPage {
    pub html: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Static page builder
pub struct Builder<'a> {
    folio: &'a Folio,
}

impl<'a> Builder<'a> {
    pub fn new(folio: &'a Folio) -> Self {
        Self { folio }
    }

    /// Clean the output directory, copy assets, and build every page
    ///
    /// A page that fails does not stop the others; the failures are
    /// returned together once every other page has been written.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        self.clean()?;
        let public_dir = &self.folio.public_dir;
        fs::create_dir_all(public_dir).map_err(|e| BuildError::io(public_dir, e))?;

        self.copy_assets()?;

        let mut report = BuildReport::default();
        let mut failures = Vec::new();

        let (files, skipped) = self.page_files();
        for diagnostic in &skipped {
            diagnostic.log();
        }
        report.diagnostics.extend(skipped);

        for file in files {
            let rel = file
                .strip_prefix(&self.folio.pages_dir)
                .unwrap_or(&file)
                .to_path_buf();

            let out = public_dir.join(&rel);
            let built = self
                .build_page(&file)
                .and_then(|built| write(&out, &built.html).map(|_| built));
            match built {
                Ok(built) => {
                    for diagnostic in &built.diagnostics {
                        diagnostic.log();
                    }
                    report.diagnostics.extend(built.diagnostics);
                    tracing::info!("Built {}", rel.display());
                    report.pages.push(rel);
                }
                Err(e) => {
                    tracing::error!("Failed to build {}: {}", rel.display(), e);
                    failures.push((rel, e));
                }
            }
        }

        if !failures.is_empty() {
            return Err(BuildError::PagesFailed {
                failures,
                diagnostics: report.diagnostics,
            });
        }

        tracing::info!("Build complete: {} pages", report.pages.len());
        Ok(report)
    }

    /// Build one page file into HTML
    pub fn build_page(&self, file: &Path) -> Result<BuiltPage, BuildError> {
        let html = fs::read_to_string(file).map_err(|e| BuildError::io(file, e))?;
        self.render_page(&html, file)
    }

    /// Build page source that was read from `file`
    ///
    /// `file` anchors relative include paths and names the page in
    /// diagnostics.
    pub fn render_page(&self, html: &str, file: &Path) -> Result<BuiltPage, BuildError> {
        let mut diagnostics = Vec::new();

        let page = Page::parse(html);
        if let Some(reason) = &page.meta_error {
            diagnostics.push(Diagnostic::new(
                file,
                DiagnosticKind::MalformedPageMeta(reason.clone()),
            ));
        }

        let mut expander = IncludeExpander::new(self.folio.config.max_include_depth);
        let expanded = expander.expand(&page.body, file)?;
        diagnostics.extend(expander.into_diagnostics());

        let tokens = TokenSet::new(self.folio.config.default_tokens()).with_meta(&page.meta);
        let (html, unresolved) = tokens.apply(&expanded);
        diagnostics.extend(
            unresolved
                .into_iter()
                .map(|name| Diagnostic::new(file, DiagnosticKind::UnresolvedToken(name))),
        );

        Ok(BuiltPage { html, diagnostics })
    }

    /// Remove the public directory
    pub fn clean(&self) -> Result<(), BuildError> {
        let public_dir = &self.folio.public_dir;
        if public_dir.exists() {
            fs::remove_dir_all(public_dir).map_err(|e| BuildError::io(public_dir, e))?;
            tracing::info!("Deleted: {:?}", public_dir);
        }
        Ok(())
    }

    /// Copy asset directories from the source directory, when present
    fn copy_assets(&self) -> Result<(), BuildError> {
        for name in &self.folio.config.asset_dirs {
            let src = self.folio.source_dir.join(name);
            if src.is_dir() {
                copy_dir(&src, &self.folio.public_dir.join(name))?;
                tracing::debug!("Copied assets from {:?}", src);
            }
        }
        Ok(())
    }

    /// Page files in a stable order, plus a diagnostic for each entry that
    /// could not be read
    fn page_files(&self) -> (Vec<PathBuf>, Vec<Diagnostic>) {
        let pages_dir = &self.folio.pages_dir;
        let mut files = Vec::new();
        let mut diagnostics = Vec::new();

        if !pages_dir.is_dir() {
            tracing::warn!("Pages directory not found: {:?}", pages_dir);
            return (files, diagnostics);
        }

        for entry in WalkDir::new(pages_dir).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(pages_dir.as_path()).to_path_buf();
                    diagnostics.push(Diagnostic::new(
                        path,
                        DiagnosticKind::UnreadableFile(e.to_string()),
                    ));
                    continue;
                }
            };
            if entry.file_type().is_file() && is_html_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        (files, diagnostics)
    }
}

/// Check if a file is an HTML page
fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "html")
        .unwrap_or(false)
}

fn write(path: &Path, content: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| BuildError::io(path, e))
}

/// Copy a directory tree
fn copy_dir(src: &Path, dest: &Path) -> Result<(), BuildError> {
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            BuildError::io(path, e.into())
        })?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| BuildError::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| BuildError::io(&target, e))?;
        }
    }
    Ok(())
}
