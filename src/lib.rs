//! # Simple Comments
//!
//! Threaded comments for static sites. Your filesystem is the data source:
//! each post has a directory, each comment is one JSON file, and the filename
//! says when it was written and by whom.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! Every post is processed on its own, in three sequential stages:
//!
//! ```text
//! 1. Load       comments/<slug>/*.json  →  Vec<CommentRecord>   (+ diagnostics)
//! 2. Thread     Vec<CommentRecord>      →  CommentTree          (replies nested)
//! 3. Aggregate  CommentTree             →  num_comments
//! ```
//!
//! [`post::load_post_comments`] chains them and is what a site generator
//! calls while resolving a post's metadata. No state is shared between posts.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`load`] | Stage 1 — finds comment files, parses them, reports what it skipped |
//! | [`thread`] | Stage 2 — nests replies under their parents, oldest first |
//! | [`aggregate`] | Stage 3 — total count and nesting depth |
//! | [`post`] | Runs the pipeline for one post or for every post |
//! | [`naming`] | `<timestamp>_<author-hash>` filename parser |
//! | [`types`] | Shared types (`CommentRecord`, `Diagnostic`) |
//! | [`config`] | `comments.toml` loading, merging, and validation |
//! | [`render`] | HTML fragment for a post's comments, via Maud |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Filenames Carry Identity and Order
//!
//! A comment file is named `YYYYMMDDHHMMSS_<hash>.json`. The stem is the id
//! replies refer to, and because the timestamp is fixed-width, sorting names
//! sorts comments chronologically. No index file, no database.
//!
//! ## Replies Link by Id, Backwards Only
//!
//! `in_reply_to` holds the parent's id. The threader only links to comments
//! it has already seen, so threads can never loop, and a reply whose parent
//! is missing is shown at top level instead of disappearing.
//!
//! ## Diagnostics, Not Logging
//!
//! Broken files never abort a post. The library returns a list of
//! [`types::Diagnostic`] values and leaves it to the caller to log them; the
//! bundled CLI sends them to `tracing`.

pub mod aggregate;
pub mod config;
pub mod load;
pub mod naming;
pub mod output;
pub mod post;
pub mod render;
pub mod thread;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
