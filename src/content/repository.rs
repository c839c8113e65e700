//! Content repository - loads projects and posts from the content directory

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::collection;
use super::document::{Document, Kind, Matter, Post, PostCategory, PostMatter, Project, ProjectMatter};
use super::FrontMatter;
use crate::diagnostics::{Diagnostic, DiagnosticKind};

/// A sorted collection together with everything skipped while loading it
#[derive(Debug, Clone)]
pub struct Listing<M> {
    pub documents: Vec<Document<M>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<M> Default for Listing<M> {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            diagnostics: Vec::new(),
        }
    }
}

/// Reads documents of each kind from `<root>/<kind dir>/<slug>.md`
///
/// Nothing is cached: every call reads the files again.
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
}

impl Repository {
    /// Create a repository rooted at the content directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory holding documents of a kind
    pub fn dir(&self, kind: Kind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Path of the document with the given slug
    pub fn path_for(&self, kind: Kind, slug: &str) -> PathBuf {
        self.dir(kind).join(format!("{}.md", slug))
    }

    /// Load every document of a kind, sorted for listing
    ///
    /// A missing or unreadable directory gives an empty listing. Files that
    /// cannot be read or whose metadata does not fit the kind are skipped.
    pub fn list<M: Matter>(&self) -> Listing<M> {
        let dir = self.dir(M::KIND);
        let mut listing = Listing::default();

        if !dir.is_dir() {
            listing
                .diagnostics
                .push(Diagnostic::new(&dir, DiagnosticKind::MissingDirectory));
            tracing::debug!("No {} directory at {:?}", M::KIND, dir);
            return listing;
        }

        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone());
                    listing
                        .diagnostics
                        .push(Diagnostic::new(path, DiagnosticKind::UnreadableFile(e.to_string())));
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }
            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let (document, mut diagnostics) = load_document::<M>(path, slug);
            listing.diagnostics.append(&mut diagnostics);
            listing.documents.extend(document);
        }

        for diagnostic in &listing.diagnostics {
            diagnostic.log();
        }

        M::sort(&mut listing.documents);
        tracing::debug!("Loaded {} {}s", listing.documents.len(), M::KIND);
        listing
    }

    /// Load a single document by slug; `None` when it is missing or invalid
    pub fn get<M: Matter>(&self, slug: &str) -> Option<Document<M>> {
        if !is_valid_slug(slug) {
            return None;
        }

        let path = self.path_for(M::KIND, slug);
        if !path.is_file() {
            return None;
        }

        let (document, diagnostics) = load_document::<M>(&path, slug);
        for diagnostic in &diagnostics {
            diagnostic.log();
        }
        document
    }

    /// All projects, featured first
    pub fn projects(&self) -> Listing<ProjectMatter> {
        self.list()
    }

    /// All posts, newest first
    pub fn posts(&self) -> Listing<PostMatter> {
        self.list()
    }

    pub fn project(&self, slug: &str) -> Option<Project> {
        self.get(slug)
    }

    pub fn post(&self, slug: &str) -> Option<Post> {
        self.get(slug)
    }

    /// Posts in one category, newest first
    pub fn posts_by_category(&self, category: PostCategory) -> Vec<Post> {
        collection::by_category(&self.posts().documents, category)
    }

    /// Featured projects, newest first
    pub fn featured_projects(&self) -> Vec<Project> {
        collection::featured(&self.projects().documents)
    }
}

/// Read and parse one document
///
/// Returns the document, or `None` when it had to be skipped, along with
/// every diagnostic raised while loading it.
fn load_document<M: Matter>(path: &Path, slug: &str) -> (Option<Document<M>>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            diagnostics.push(Diagnostic::new(
                path,
                DiagnosticKind::UnreadableFile(e.to_string()),
            ));
            return (None, diagnostics);
        }
    };

    let (fm, body) = FrontMatter::parse(&content);
    if let Some(reason) = &fm.malformed {
        diagnostics.push(Diagnostic::new(
            path,
            DiagnosticKind::MalformedFrontMatter(reason.clone()),
        ));
    }

    let matter = match fm.into_matter::<M>() {
        Ok(matter) => matter,
        Err(e) => {
            diagnostics.push(Diagnostic::new(
                path,
                DiagnosticKind::InvalidDocument(format!("not a valid {}: {}", M::KIND, e)),
            ));
            return (None, diagnostics);
        }
    };
    if let Err(reason) = matter.validate() {
        diagnostics.push(Diagnostic::new(path, DiagnosticKind::InvalidDocument(reason)));
        return (None, diagnostics);
    }

    let document = Document {
        slug: slug.to_string(),
        matter,
        body: body.to_string(),
        source: path.to_path_buf(),
    };

    if document.date().is_none() {
        diagnostics.push(Diagnostic::new(
            path,
            DiagnosticKind::UnparseableDate(document.matter.date().to_string()),
        ));
    }

    (Some(document), diagnostics)
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md")
        .unwrap_or(false)
}

/// Slugs name a file directly inside the collection directory
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\'])
}
