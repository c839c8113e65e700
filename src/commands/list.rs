//! List site content

use anyhow::Result;
use std::fmt::Write;

use crate::content::{collection, Kind, Post, PostCategory, Project};
use crate::Folio;

/// Listing filters from the command line
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub category: Option<PostCategory>,
    pub tag: Option<String>,
    pub featured: bool,
}

/// List content of one kind
pub fn run(folio: &Folio, kind: Kind, filter: &ListFilter) -> Result<()> {
    let repo = folio.repository();

    let output = match kind {
        Kind::Post => {
            let mut posts = repo.posts().documents;
            if let Some(category) = filter.category {
                posts = collection::by_category(&posts, category);
            }
            if let Some(tag) = &filter.tag {
                posts = collection::with_tag(&posts, tag);
            }
            format_posts(&posts)
        }
        Kind::Project => {
            let mut projects = repo.projects().documents;
            if filter.featured {
                projects = collection::featured(&projects);
            }
            format_projects(&projects)
        }
    };

    print!("{}", output);
    Ok(())
}

fn format_date(date: Option<chrono::NaiveDateTime>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string())
}

fn format_posts(posts: &[Post]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Posts ({}):", posts.len());
    for post in posts {
        let _ = writeln!(
            out,
            "  {} - {} [{}] ({})",
            format_date(post.date()),
            post.title(),
            post.slug,
            post.matter.category
        );
    }
    out
}

fn format_projects(projects: &[Project]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Projects ({}):", projects.len());
    for project in projects {
        let marker = if project.matter.is_featured() { "*" } else { " " };
        let _ = writeln!(
            out,
            "{} {} - {} [{}]",
            marker,
            format_date(project.date()),
            project.title(),
            project.slug
        );
        if !project.matter.technologies.is_empty() {
            let _ = writeln!(out, "    {}", project.matter.technologies.join(", "));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Document, PostMatter, ProjectMatter};
    use std::path::PathBuf;

    #[test]
    fn test_format_posts() {
        let post = Document {
            slug: "hello".to_string(),
            matter: PostMatter {
                title: "Hello".to_string(),
                category: PostCategory::Tech,
                description: String::new(),
                date: "2024-02-03".to_string(),
                read_time: None,
                external: None,
                image: None,
                tags: Vec::new(),
            },
            body: String::new(),
            source: PathBuf::from("hello.md"),
        };
        assert_eq!(
            format_posts(&[post]),
            "Posts (1):\n  2024-02-03 - Hello [hello] (tech)\n"
        );
    }

    #[test]
    fn test_format_projects_marks_featured() {
        let project = Document {
            slug: "site".to_string(),
            matter: ProjectMatter {
                title: "Site".to_string(),
                description: String::new(),
                technologies: vec!["rust".to_string(), "wasm".to_string()],
                github: None,
                demo: None,
                image: None,
                featured: Some(true),
                date: "not a date".to_string(),
            },
            body: String::new(),
            source: PathBuf::from("site.md"),
        };
        assert_eq!(
            format_projects(&[project]),
            "Projects (1):\n* ---------- - Site [site]\n    rust, wasm\n"
        );
    }
}
