//! Create a new project or post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::{FrontMatter, Kind, PostCategory, PostMatter, ProjectMatter};
use crate::Folio;

/// Create a document with scaffolded front-matter; returns its path
pub fn create(folio: &Folio, kind: Kind, title: &str, category: PostCategory) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable file name", title);
    }

    let repo = folio.repository();
    let file_path = repo.path_for(kind, &slug);
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    let front_matter = match kind {
        Kind::Post => FrontMatter::render(&PostMatter {
            title: title.to_string(),
            category,
            description: String::new(),
            date,
            read_time: None,
            external: None,
            image: None,
            tags: Vec::new(),
        })?,
        Kind::Project => FrontMatter::render(&ProjectMatter {
            title: title.to_string(),
            description: String::new(),
            technologies: Vec::new(),
            github: None,
            demo: None,
            image: None,
            featured: None,
            date,
        })?,
    };

    fs::create_dir_all(repo.dir(kind))?;
    fs::write(&file_path, format!("{}\n", front_matter))?;
    tracing::info!("Created {} {:?}", kind, file_path);

    Ok(file_path)
}
