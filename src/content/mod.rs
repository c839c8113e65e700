//! Content module - handles projects, posts, and markdown processing

pub mod collection;
mod document;
mod frontmatter;
mod markdown;
pub mod repository;

pub use document::{
    Document, Kind, Matter, Post, PostCategory, PostMatter, Project, ProjectMatter,
};
pub use frontmatter::{parse_date_string, FrontMatter};
pub use markdown::{excerpt, MarkdownRenderer, ELLIPSIS};
pub use repository::{Listing, Repository};
