//! Render a single document

use anyhow::{anyhow, Result};

use crate::content::{excerpt, Document, Kind, Matter, PostMatter, ProjectMatter};
use crate::Folio;

/// Print a document as sanitized HTML, or as a plain-text excerpt when a
/// word budget is given
pub fn run(folio: &Folio, kind: Kind, slug: &str, excerpt_words: Option<usize>) -> Result<()> {
    let output = match kind {
        Kind::Post => render::<PostMatter>(folio, slug, excerpt_words)?,
        Kind::Project => render::<ProjectMatter>(folio, slug, excerpt_words)?,
    };
    println!("{}", output);
    Ok(())
}

fn render<M: Matter>(folio: &Folio, slug: &str, excerpt_words: Option<usize>) -> Result<String> {
    let document: Document<M> = folio
        .repository()
        .get::<M>(slug)
        .ok_or_else(|| anyhow!("No {} named {:?}", M::KIND, slug))?;

    Ok(match excerpt_words {
        Some(words) => excerpt(&document.body, words),
        None => folio.renderer().render(&document.body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site_with_post() -> (TempDir, Folio) {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        let dir = folio.content_dir.join("posts");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("hello.md"),
            "---\ntitle: Hello\ncategory: tech\ndescription: d\ndate: 2024-01-01\n---\n# Hi\n\nOne two three four.\n<script>x()</script>\n",
        )
        .unwrap();
        (tmp, folio)
    }

    #[test]
    fn test_render_html() {
        let (_tmp, folio) = site_with_post();
        let html = render::<PostMatter>(&folio, "hello", None).unwrap();
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn test_render_excerpt() {
        let (_tmp, folio) = site_with_post();
        let text = render::<PostMatter>(&folio, "hello", Some(3)).unwrap();
        assert_eq!(text, "Hi One two…");
    }

    #[test]
    fn test_missing_document() {
        let (_tmp, folio) = site_with_post();
        let err = render::<ProjectMatter>(&folio, "hello", None).unwrap_err();
        assert_eq!(err.to_string(), "No project named \"hello\"");
    }
}
