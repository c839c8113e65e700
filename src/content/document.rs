//! Project and post models

use anyhow::{bail, Result};
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::frontmatter::{parse_date_string, string_or_vec};

/// The two content collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Project,
    Post,
}

impl Kind {
    /// Directory name under the content root
    pub fn dir_name(self) -> &'static str {
        match self {
            Kind::Project => "projects",
            Kind::Post => "posts",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Project => f.write_str("project"),
            Kind::Post => f.write_str("post"),
        }
    }
}

impl FromStr for Kind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "project" | "projects" => Ok(Kind::Project),
            "post" | "posts" => Ok(Kind::Post),
            _ => bail!("Unknown kind: {}. Available: post, project", s),
        }
    }
}

/// Post category, a closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostCategory {
    Book,
    Tech,
    Others,
}

impl PostCategory {
    pub const ALL: [PostCategory; 3] = [PostCategory::Book, PostCategory::Tech, PostCategory::Others];

    pub fn as_str(self) -> &'static str {
        match self {
            PostCategory::Book => "book",
            PostCategory::Tech => "tech",
            PostCategory::Others => "others",
        }
    }
}

impl fmt::Display for PostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        PostCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown category: {}. Available: book, tech, others", s))
    }
}

/// Front-matter of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMatter {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    pub date: String,
}

impl ProjectMatter {
    /// Absent means not featured
    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }
}

/// Front-matter of a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMatter {
    pub title: String,
    pub category: PostCategory,
    pub description: String,
    pub date: String,
    #[serde(rename = "readTime", default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
    /// Link to where the post is published, when hosted elsewhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(
        deserialize_with = "string_or_vec",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,
}

/// Typed front-matter for one document kind
pub trait Matter: DeserializeOwned + Serialize + Clone + fmt::Debug {
    const KIND: Kind;

    fn title(&self) -> &str;

    /// Raw date string as written in the front-matter
    fn date(&self) -> &str;

    /// Check invariants serde cannot express
    fn validate(&self) -> Result<(), String> {
        if self.title().trim().is_empty() {
            return Err("title is empty".to_string());
        }
        Ok(())
    }

    /// Order a collection of this kind for listing
    fn sort(documents: &mut [Document<Self>]);
}

impl Matter for ProjectMatter {
    const KIND: Kind = Kind::Project;

    fn title(&self) -> &str {
        &self.title
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn sort(documents: &mut [Document<Self>]) {
        super::collection::sort_projects(documents);
    }
}

impl Matter for PostMatter {
    const KIND: Kind = Kind::Post;

    fn title(&self) -> &str {
        &self.title
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn sort(documents: &mut [Document<Self>]) {
        super::collection::sort_posts(documents);
    }
}

/// A content document: metadata plus raw markdown body
#[derive(Debug, Clone, PartialEq)]
pub struct Document<M> {
    /// File stem, unique within the collection
    pub slug: String,
    pub matter: M,
    /// Raw markdown, not HTML
    pub body: String,
    /// Full source file path
    pub source: PathBuf,
}

/// A project document
pub type Project = Document<ProjectMatter>;

/// A post document
pub type Post = Document<PostMatter>;

impl<M: Matter> Document<M> {
    /// Parsed publication date, `None` when missing or unparseable
    pub fn date(&self) -> Option<NaiveDateTime> {
        parse_date_string(self.matter.date())
    }

    pub fn title(&self) -> &str {
        self.matter.title()
    }

    /// Get the previous document in a list
    pub fn prev<'a>(&self, documents: &'a [Document<M>]) -> Option<&'a Document<M>> {
        let pos = documents.iter().position(|d| d.slug == self.slug)?;
        pos.checked_sub(1).map(|i| &documents[i])
    }

    /// Get the next document in a list
    pub fn next<'a>(&self, documents: &'a [Document<M>]) -> Option<&'a Document<M>> {
        let pos = documents.iter().position(|d| d.slug == self.slug)?;
        documents.get(pos + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;

    #[test]
    fn test_kind_parse() {
        assert_eq!("posts".parse::<Kind>().unwrap(), Kind::Post);
        assert_eq!("project".parse::<Kind>().unwrap(), Kind::Project);
        assert!("pages".parse::<Kind>().is_err());
        assert_eq!(Kind::Project.dir_name(), "projects");
    }

    #[test]
    fn test_post_matter_from_frontmatter() {
        let (fm, _) = FrontMatter::parse(
            "---\ntitle: Dune\ncategory: book\ndescription: A review\ndate: 2024-05-01\nreadTime: 6 min\ntags: scifi\n---\n",
        );
        let matter: PostMatter = fm.into_matter().unwrap();
        assert_eq!(matter.category, PostCategory::Book);
        assert_eq!(matter.read_time.as_deref(), Some("6 min"));
        assert_eq!(matter.tags, vec!["scifi"]);
        assert!(matter.validate().is_ok());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let (fm, _) = FrontMatter::parse(
            "---\ntitle: X\ncategory: cooking\ndescription: d\ndate: 2024-05-01\n---\n",
        );
        assert!(fm.into_matter::<PostMatter>().is_err());
        assert!("cooking".parse::<PostCategory>().is_err());
        assert_eq!("tech".parse::<PostCategory>().unwrap(), PostCategory::Tech);
    }

    #[test]
    fn test_project_featured_defaults_false() {
        let (fm, _) = FrontMatter::parse(
            "---\ntitle: Site\ndescription: d\ndate: 2023-01-01\ntechnologies: [rust, wasm]\n---\n",
        );
        let matter: ProjectMatter = fm.into_matter().unwrap();
        assert!(!matter.is_featured());
        assert_eq!(matter.technologies, vec!["rust", "wasm"]);
    }

    #[test]
    fn test_missing_required_field() {
        let (fm, _) = FrontMatter::parse("---\ntitle: No date\ndescription: d\n---\n");
        assert!(fm.into_matter::<ProjectMatter>().is_err());
    }

    #[test]
    fn test_empty_title_fails_validation() {
        let matter = ProjectMatter {
            title: "  ".to_string(),
            description: String::new(),
            technologies: Vec::new(),
            github: None,
            demo: None,
            image: None,
            featured: None,
            date: "2024-01-01".to_string(),
        };
        assert!(matter.validate().is_err());
    }
}
