//! Ordering and filtering of content collections
//!
//! Sorts are stable, so documents that compare equal keep their input order.
//! Documents whose date cannot be parsed sort after every dated document in
//! their group. Filters work on an already-sorted slice and preserve its
//! order.

use std::cmp::Reverse;

use super::document::{Post, PostCategory, Project};

/// Sort posts by date, newest first
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by_cached_key(|p| Reverse(p.date()));
}

/// Sort projects: featured first, then by date, newest first
pub fn sort_projects(projects: &mut [Project]) {
    projects.sort_by_cached_key(|p| (Reverse(p.matter.is_featured()), Reverse(p.date())));
}

/// Posts in the given category
pub fn by_category(posts: &[Post], category: PostCategory) -> Vec<Post> {
    posts
        .iter()
        .filter(|p| p.matter.category == category)
        .cloned()
        .collect()
}

/// Posts carrying the given tag
pub fn with_tag(posts: &[Post], tag: &str) -> Vec<Post> {
    posts
        .iter()
        .filter(|p| p.matter.tags.iter().any(|t| t == tag))
        .cloned()
        .collect()
}

/// Projects flagged as featured
pub fn featured(projects: &[Project]) -> Vec<Project> {
    projects
        .iter()
        .filter(|p| p.matter.is_featured())
        .cloned()
        .collect()
}
