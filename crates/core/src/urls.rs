//! Canonical front-end URLs for categories and threads.
//!
//! Every URL carries both the numeric id and a slug of the title, so links
//! stay readable while lookups stay id-based:
//!
//! ```text
//! /{root}/{category_id}-{category_slug}
//! /{root}/{category_id}-{category_slug}/thread/create
//! /{root}/{category_id}-{category_slug}/{thread_id}-{thread_slug}
//! /{root}/{category_id}-{category_slug}/{thread_id}-{thread_slug}/reply
//! /{root}/{category_id}-{category_slug}/{thread_id}-{thread_slug}/delete
//! ```

use crate::slug::slugify;
use crate::types::DbId;

/// Builds forum URLs under a configurable root path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumUrls {
    prefix: String,
}

impl ForumUrls {
    /// `root` is the path segment the forum is mounted under (e.g. `"forum"`).
    /// Surrounding slashes are ignored; an empty root mounts at `/`.
    pub fn new(root: &str) -> Self {
        let trimmed = root.trim_matches('/');
        let prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };
        Self { prefix }
    }

    pub fn category(&self, category_id: DbId, category_title: &str) -> String {
        format!(
            "{}/{}",
            self.prefix,
            segment(category_id, category_title)
        )
    }

    pub fn new_thread(&self, category_id: DbId, category_title: &str) -> String {
        format!(
            "{}/thread/create",
            self.category(category_id, category_title)
        )
    }

    pub fn thread(&self, thread: &ThreadRoute<'_>) -> String {
        format!(
            "{}/{}",
            self.category(thread.category_id, thread.category_title),
            segment(thread.thread_id, thread.thread_title)
        )
    }

    pub fn reply(&self, thread: &ThreadRoute<'_>) -> String {
        format!("{}/reply", self.thread(thread))
    }

    pub fn delete(&self, thread: &ThreadRoute<'_>) -> String {
        format!("{}/delete", self.thread(thread))
    }

    /// Link to a specific post on a given page of its thread.
    pub fn post_on_page(&self, thread: &ThreadRoute<'_>, page: i64, post_id: DbId) -> String {
        format!("{}?page={page}#post-{post_id}", self.thread(thread))
    }
}

/// The pieces of a thread needed to build its URLs.
#[derive(Debug, Clone, Copy)]
pub struct ThreadRoute<'a> {
    pub category_id: DbId,
    pub category_title: &'a str,
    pub thread_id: DbId,
    pub thread_title: &'a str,
}

fn segment(id: DbId, title: &str) -> String {
    format!("{id}-{}", slugify(title))
}
