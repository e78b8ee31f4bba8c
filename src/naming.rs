//! Centralized filename parsing for the `<timestamp>_<author-hash>` convention.
//!
//! Every comment file is named after the moment it was posted and an opaque
//! token identifying the commenter:
//!
//! ```text
//! 20230101120000_5f2b9c.json
//! └──────┬─────┘ └──┬─┘
//!   timestamp    author hash
//! ```
//!
//! The whole stem (`20230101120000_5f2b9c`) is the comment's id. Because the
//! timestamp is a fixed-width, zero-padded number, sorting stems as strings
//! sorts comments chronologically. [`CommentId`] keeps the parsed parts
//! together so callers never re-split the stem.

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use time::PrimitiveDateTime;
use time::macros::format_description;

/// Separator between the timestamp and the author hash.
pub const DELIMITER: char = '_';

/// Number of digits in `YYYYMMDDHHMMSS`.
pub const TIMESTAMP_LEN: usize = 14;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NamingError {
    #[error("missing '_' between timestamp and author hash")]
    MissingDelimiter,
    #[error("timestamp must be 14 digits (YYYYMMDDHHMMSS), got '{0}'")]
    TimestampFormat(String),
    #[error("timestamp '{0}' is not a valid date and time")]
    TimestampRange(String),
    #[error("author hash is empty")]
    EmptyAuthorHash,
    #[error("author hash '{0}' contains '_'")]
    AuthorHashDelimiter(String),
}

/// Parsed comment filename stem.
///
/// Field order matters: the derived `Ord` compares the timestamp first, then
/// the author hash, which is the same order as comparing the raw stems.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommentId {
    timestamp: PrimitiveDateTime,
    author_hash: String,
    raw: String,
}

impl CommentId {
    /// Parse a filename stem such as `20230101120000_aaa`.
    ///
    /// - `"20230101120000_aaa"` → timestamp 2023-01-01 12:00:00, hash `aaa`
    /// - `"20230101120000"` → `MissingDelimiter`
    /// - `"2023010112_aaa"` → `TimestampFormat`
    /// - `"20231301120000_aaa"` → `TimestampRange` (month 13)
    /// - `"20230101120000_"` → `EmptyAuthorHash`
    pub fn parse(stem: &str) -> Result<Self, NamingError> {
        let (digits, hash) = stem
            .split_once(DELIMITER)
            .ok_or(NamingError::MissingDelimiter)?;

        if digits.len() != TIMESTAMP_LEN || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NamingError::TimestampFormat(digits.to_string()));
        }
        let timestamp = PrimitiveDateTime::parse(
            digits,
            format_description!("[year][month][day][hour][minute][second]"),
        )
        .map_err(|_| NamingError::TimestampRange(digits.to_string()))?;

        if hash.is_empty() {
            return Err(NamingError::EmptyAuthorHash);
        }
        if hash.contains(DELIMITER) {
            return Err(NamingError::AuthorHashDelimiter(hash.to_string()));
        }

        Ok(Self {
            timestamp,
            author_hash: hash.to_string(),
            raw: stem.to_string(),
        })
    }

    /// The full stem, used as the comment's id.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn timestamp(&self) -> PrimitiveDateTime {
        self.timestamp
    }

    pub fn author_hash(&self) -> &str {
        &self.author_hash
    }

    /// Timestamp as ISO-8601 without offset, e.g. `2023-01-01T12:00:00`.
    pub fn datetime_iso(&self) -> String {
        self.timestamp
            .format(format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second]"
            ))
            .unwrap_or_else(|_| self.raw.clone())
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for CommentId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
