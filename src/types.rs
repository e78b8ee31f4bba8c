//! Shared types passed between the pipeline stages (load → thread → aggregate).
//!
//! [`CommentRecord`] is what the loader produces and the threader nests;
//! [`Diagnostic`] is how any stage reports a file it had to skip.

use crate::naming::CommentId;
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use time::PrimitiveDateTime;

/// One parsed comment.
///
/// Identity and timestamp come from the filename, author and text from the
/// file content. `replies` stays empty until threading.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentRecord {
    pub id: CommentId,
    pub author: String,
    pub text: String,
    pub in_reply_to: Option<String>,
    pub replies: Vec<CommentRecord>,
}

impl CommentRecord {
    pub fn timestamp(&self) -> PrimitiveDateTime {
        self.id.timestamp()
    }

    pub fn author_hash(&self) -> &str {
        self.id.author_hash()
    }
}

/// Serialized shape consumed by templates:
/// `{id, author, author_hash, text, datetime, in_reply_to, replies}`.
impl Serialize for CommentRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Comment", 7)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("author", &self.author)?;
        s.serialize_field("author_hash", self.id.author_hash())?;
        s.serialize_field("text", &self.text)?;
        s.serialize_field("datetime", &self.id.datetime_iso())?;
        s.serialize_field("in_reply_to", &self.in_reply_to)?;
        s.serialize_field("replies", &self.replies)?;
        s.end()
    }
}

/// Why a single comment file (or a post directory) was skipped.
#[derive(Error, Debug)]
pub enum CommentFileError {
    #[error("cannot read: {0}")]
    Unreadable(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Decode(String),
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("bad filename: {0}")]
    InvalidFileName(#[from] crate::naming::NamingError),
    #[error("duplicate comment id '{0}'")]
    DuplicateId(String),
    #[error("invalid post slug '{0}'")]
    InvalidSlug(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A skipped file and the reason it was skipped.
///
/// The library never logs; diagnostics are returned to the caller, which
/// decides where they go.
#[derive(Debug)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub error: CommentFileError,
}

impl Diagnostic {
    pub fn new(path: impl Into<PathBuf>, error: impl Into<CommentFileError>) -> Self {
        Self {
            path: path.into(),
            error: error.into(),
        }
    }

    /// Misnamed files are most likely strays (editor backups, notes) and only
    /// warrant a warning. Everything else means a real comment was lost.
    pub fn severity(&self) -> Severity {
        match self.error {
            CommentFileError::InvalidFileName(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// File name for display, falling back to the full path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}
