//! Per-post pipeline: load → thread → aggregate.
//!
//! This is the entry point a site generator calls once per post while
//! resolving its metadata. The result attaches to the post under the
//! conventional `comments` and `num_comments` keys (see
//! [`PostComments::metadata`]).

use crate::aggregate::count_comments;
use crate::load::load_comments;
use crate::thread::{CommentTree, thread_comments};
use crate::types::{CommentFileError, Diagnostic, Severity};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Comments of one post plus whatever had to be skipped to produce them.
#[derive(Debug)]
pub struct PostComments {
    pub slug: String,
    pub comments: CommentTree,
    pub num_comments: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Template-facing view: `{"comments": {...}, "num_comments": N}`.
#[derive(Debug, Serialize)]
pub struct PostMetadata<'a> {
    pub comments: &'a CommentTree,
    pub num_comments: usize,
}

impl PostComments {
    fn empty(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            comments: CommentTree::default(),
            num_comments: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn metadata(&self) -> PostMetadata<'_> {
        PostMetadata {
            comments: &self.comments,
            num_comments: self.num_comments,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity() == Severity::Error)
    }
}

/// Slugs name a single directory below the base directory, nothing else.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\'])
        && !slug.contains('\0')
}

/// Load and thread the comments of `slug` from `base_dir/slug/`.
///
/// Never fails: a missing directory gives an empty result, and bad files or
/// an unusable slug are reported through [`PostComments::diagnostics`].
pub fn load_post_comments(base_dir: &Path, slug: &str, extension: &str) -> PostComments {
    if !is_valid_slug(slug) {
        let mut post = PostComments::empty(slug);
        post.diagnostics.push(Diagnostic::new(
            base_dir,
            CommentFileError::InvalidSlug(slug.to_string()),
        ));
        return post;
    }

    let report = load_comments(&base_dir.join(slug), extension);
    let comments = thread_comments(report.records);
    let num_comments = count_comments(&comments);

    PostComments {
        slug: slug.to_string(),
        comments,
        num_comments,
        diagnostics: report.diagnostics,
    }
}

/// Load every post directory under `base_dir`, sorted by slug.
///
/// Posts are independent; each one is processed on its own. A missing base
/// directory yields no posts.
pub fn scan_all_posts(base_dir: &Path, extension: &str) -> std::io::Result<Vec<PostComments>> {
    if !base_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut slugs: Vec<String> = fs::read_dir(base_dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();
    slugs.sort();

    Ok(slugs
        .iter()
        .map(|slug| load_post_comments(base_dir, slug, extension))
        .collect())
}
