//! Comment file discovery and parsing.
//!
//! Stage 1 of the comment pipeline. Reads every comment file of one post and
//! turns it into a [`CommentRecord`], in chronological order.
//!
//! ## Directory Structure
//!
//! ```text
//! comments/                              # Base directory
//! └── hello-world/                       # One directory per post slug
//!     ├── 20230101120000_aaa.json        # Top-level comment
//!     ├── 20230101130000_bbb.json        # Reply to 20230101120000_aaa
//!     └── notes.txt                      # Ignored (wrong extension)
//! ```
//!
//! ## File Content
//!
//! ```json
//! { "author": "Ada", "text": "Nice post", "in_reply_to": "20230101120000_aaa" }
//! ```
//!
//! `author` and `text` are required; `in_reply_to` is optional. Extra keys
//! are ignored.
//!
//! ## Failure Policy
//!
//! Loading a post never fails as a whole. Each file that cannot be used is
//! skipped and reported as a [`Diagnostic`]; the remaining files still load.
//! A post without a directory simply has no comments.

use crate::naming::CommentId;
use crate::types::{CommentFileError, CommentRecord, Diagnostic};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const REQUIRED_FIELDS: &[&str] = &["author", "text"];

/// Records loaded from one post directory, plus everything that was skipped.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records: Vec<CommentRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Deserialize)]
struct CommentFile {
    author: String,
    text: String,
    #[serde(default, deserialize_with = "reply_reference")]
    in_reply_to: Option<String>,
}

/// Accept any JSON value for `in_reply_to`.
///
/// Strings are ids. `null` and `""` mean top-level. Anything else (old files
/// used numeric positions) is kept as its JSON text so it fails to resolve
/// and the comment lands at top level instead of being dropped.
fn reply_reference<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Load all comments of one post directory in chronological order.
///
/// Only regular, non-hidden files whose extension matches `extension`
/// (ASCII case-insensitive) are considered.
pub fn load_comments(post_dir: &Path, extension: &str) -> LoadReport {
    let mut report = LoadReport::default();

    if !post_dir.is_dir() {
        return report;
    }

    let paths = match list_comment_files(post_dir, extension) {
        Ok(paths) => paths,
        Err(e) => {
            report.diagnostics.push(Diagnostic::new(post_dir, e));
            return report;
        }
    };

    let mut candidates: Vec<(CommentId, PathBuf)> = Vec::with_capacity(paths.len());
    for path in paths {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        match CommentId::parse(&stem) {
            Ok(id) => candidates.push((id, path)),
            Err(e) => report.diagnostics.push(Diagnostic::new(path, e)),
        }
    }

    // Stable: files sharing an id (`a.json` / `a.JSON`) keep path order.
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    let mut loaded: HashSet<String> = HashSet::new();
    for (id, path) in candidates {
        if loaded.contains(id.as_str()) {
            let dup = id.as_str().to_string();
            report
                .diagnostics
                .push(Diagnostic::new(path, CommentFileError::DuplicateId(dup)));
            continue;
        }
        match read_comment(&path, id) {
            Ok(record) => {
                loaded.insert(record.id.as_str().to_string());
                report.records.push(record);
            }
            Err(e) => report.diagnostics.push(Diagnostic::new(path, e)),
        }
    }

    report
}

fn list_comment_files(dir: &Path, extension: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| is_comment_file(p, extension))
        .collect();
    paths.sort();
    Ok(paths)
}

fn is_comment_file(path: &Path, extension: &str) -> bool {
    let hidden = path
        .file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(true);
    !hidden
        && path.is_file()
        && path
            .extension()
            .map(|e| e.to_string_lossy().eq_ignore_ascii_case(extension))
            .unwrap_or(false)
}

/// Parse one comment file.
///
/// Decoding happens in two steps so a missing field is reported as such
/// rather than as a generic decode error.
fn read_comment(path: &Path, id: CommentId) -> Result<CommentRecord, CommentFileError> {
    let bytes = fs::read(path)?;
    let value: Value =
        serde_json::from_slice(&bytes).map_err(|e| CommentFileError::Decode(e.to_string()))?;

    let Some(object) = value.as_object() else {
        return Err(CommentFileError::Decode("expected a JSON object".into()));
    };
    for &field in REQUIRED_FIELDS {
        if object.get(field).is_none_or(Value::is_null) {
            return Err(CommentFileError::MissingField(field));
        }
    }

    let file: CommentFile =
        serde_json::from_value(value).map_err(|e| CommentFileError::Decode(e.to_string()))?;

    Ok(CommentRecord {
        id,
        author: file.author,
        text: file.text,
        in_reply_to: file.in_reply_to,
        replies: Vec::new(),
    })
}
