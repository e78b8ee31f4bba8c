//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every comment leads with its positional index and author; its id and a
//! one-line excerpt follow as indented context lines. Replies are nested one
//! level (4 spaces) deeper than their parent, so the printed outline mirrors
//! the reply tree.
//!
//! # Output Format
//!
//! ## Show
//!
//! ```text
//! hello-world (5 comments)
//! 001 Ada (1 reply)
//!     Id: 20230101120000_a1b2c3
//!     Text: Great write-up. The part about **zero-padded timestamps** saved...
//!     001 Brian (1 reply)
//!         Id: 20230101130000_d4e5f6
//!         Text: Agreed, though sorting by filename feels fragile to me.
//! 002 Esme
//!     Id: 20230102090000_e7e7e7
//!     Text: Bookmarked.
//!
//! Skipped
//!     20230201110000_bad.json: invalid JSON: EOF while parsing a string
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 broken-post: 3 comments, depth 2, 3 skipped
//! 002 hello-world: 5 comments, depth 4
//!
//! 2 posts, 8 comments, 3 skipped files
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::aggregate::max_depth;
use crate::post::PostComments;
use crate::types::CommentRecord;

const EXCERPT_LEN: usize = 72;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Comment header: positional index + author, with reply count if any.
///
/// ```text
/// 001 Ada (2 replies)
/// 002 Esme
/// ```
fn comment_header(index: usize, author: &str, replies: usize) -> String {
    match replies {
        0 => format!("{} {}", format_index(index), author),
        n => format!(
            "{} {} ({})",
            format_index(index),
            author,
            plural(n, "reply", "replies")
        ),
    }
}

/// Text with whitespace collapsed, cut to `max` characters.
fn excerpt(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max).collect();
        format!("{}...", cut.trim_end())
    }
}

// ============================================================================
// show
// ============================================================================

/// Format one post's comment tree plus any skipped files.
pub fn format_post_output(post: &PostComments) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({})",
        post.slug,
        plural(post.num_comments, "comment", "comments")
    )];

    for (i, comment) in post.comments.iter().enumerate() {
        push_comment(&mut lines, comment, i + 1, 0);
    }

    if !post.diagnostics.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for d in &post.diagnostics {
            lines.push(format!("{}{}: {}", indent(1), d.file_name(), d.error));
        }
    }

    lines
}

fn push_comment(lines: &mut Vec<String>, comment: &CommentRecord, index: usize, depth: usize) {
    lines.push(format!(
        "{}{}",
        indent(depth),
        comment_header(index, &comment.author, comment.replies.len())
    ));
    lines.push(format!("{}Id: {}", indent(depth + 1), comment.id));
    lines.push(format!(
        "{}Text: {}",
        indent(depth + 1),
        excerpt(&comment.text, EXCERPT_LEN)
    ));
    for (i, reply) in comment.replies.iter().enumerate() {
        push_comment(lines, reply, i + 1, depth + 1);
    }
}

/// Print one post's comment tree to stdout.
pub fn print_post_output(post: &PostComments) {
    for line in format_post_output(post) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Format the summary of every post under the base directory.
pub fn format_check_output(posts: &[PostComments]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut total_comments = 0;
    let mut total_skipped = 0;

    for (i, post) in posts.iter().enumerate() {
        total_comments += post.num_comments;
        total_skipped += post.diagnostics.len();

        let mut line = format!(
            "{} {}: {}, depth {}",
            format_index(i + 1),
            post.slug,
            plural(post.num_comments, "comment", "comments"),
            max_depth(&post.comments)
        );
        if !post.diagnostics.is_empty() {
            line.push_str(&format!(", {} skipped", post.diagnostics.len()));
        }
        lines.push(line);
    }

    if !posts.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "{}, {}, {}",
        plural(posts.len(), "post", "posts"),
        plural(total_comments, "comment", "comments"),
        plural(total_skipped, "skipped file", "skipped files")
    ));
    lines
}

/// Print the check summary to stdout.
pub fn print_check_output(posts: &[PostComments]) {
    for line in format_check_output(posts) {
        println!("{}", line);
    }
}
