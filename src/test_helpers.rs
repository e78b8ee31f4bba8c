//! Shared test utilities for the simple-comments test suite.
//!
//! Provides fixture setup, record builders, and thread-shape extractors that
//! work with pipeline data structures (`CommentRecord`, `CommentTree`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let post = load_post_comments(&tmp.path().join("comments"), "hello-world", "json");
//!
//! assert_eq!(thread_shape(&post.comments)[0], (0, "Ada".to_string()));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::naming::CommentId;
use crate::thread::CommentTree;
use crate::types::CommentRecord;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `<dir>/<stem>.json` with the given raw content.
pub fn write_comment(dir: &Path, stem: &str, content: &str) {
    std::fs::write(dir.join(format!("{stem}.json")), content).unwrap();
}

// =========================================================================
// Record builders
// =========================================================================

/// Build an unthreaded record. Panics if `stem` is not a valid comment name.
pub fn record(stem: &str, author: &str, in_reply_to: Option<&str>) -> CommentRecord {
    CommentRecord {
        id: CommentId::parse(stem)
            .unwrap_or_else(|e| panic!("bad test stem '{stem}': {e}")),
        author: author.to_string(),
        text: format!("comment by {author}"),
        in_reply_to: in_reply_to.map(String::from),
        replies: Vec::new(),
    }
}

// =========================================================================
// Shape extractors
// =========================================================================

/// Authors of the direct replies, in order.
pub fn reply_authors(comment: &CommentRecord) -> Vec<&str> {
    comment.replies.iter().map(|r| r.author.as_str()).collect()
}

/// Pre-order walk of the whole tree as `(depth, author)` pairs.
///
/// ```text
/// Ada              (0, "Ada")
///     Brian        (1, "Brian")
/// Esme             (0, "Esme")
/// ```
pub fn thread_shape(tree: &CommentTree) -> Vec<(usize, String)> {
    fn walk(comment: &CommentRecord, depth: usize, out: &mut Vec<(usize, String)>) {
        out.push((depth, comment.author.clone()));
        for reply in &comment.replies {
            walk(reply, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    for comment in tree {
        walk(comment, 0, &mut out);
    }
    out
}
