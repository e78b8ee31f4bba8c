//! HTML fragment rendering for comment threads.
//!
//! Produces a self-contained `<section>` a page template can drop below a
//! post. Uses [maud](https://maud.lambda.xyz/) so author names and anything
//! else interpolated is escaped automatically.
//!
//! ## Markup
//!
//! ```text
//! section.comments#comments
//! ├── h2.comments-heading          "3 comments"
//! └── ol.comment-list
//!     └── li.comment#comment-<id>
//!         ├── header.comment-meta  author + <time datetime="…">
//!         ├── div.comment-body     Markdown or plain paragraphs
//!         └── ol.replies           same structure, nested
//! ```
//!
//! ## Untrusted Text
//!
//! Comment bodies come from visitors. In Markdown mode, raw HTML blocks and
//! inline tags are turned into literal text and `javascript:` links are
//! neutralized before pulldown-cmark writes HTML.

use crate::config::RenderConfig;
use crate::post::PostComments;
use crate::types::CommentRecord;
use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{CowStr, Event, Parser, Tag, html as md_html};
use time::error::InvalidFormatDescription;
use time::format_description::OwnedFormatItem;

pub struct CommentRenderer {
    date_format: OwnedFormatItem,
    markdown: bool,
}

impl CommentRenderer {
    pub fn new(config: &RenderConfig) -> Result<Self, InvalidFormatDescription> {
        Ok(Self {
            date_format: time::format_description::parse_owned::<1>(&config.date_format)?,
            markdown: config.markdown,
        })
    }

    /// Render every comment of a post, heading included.
    pub fn render(&self, post: &PostComments) -> Markup {
        html! {
            section.comments id="comments" {
                h2.comments-heading { (heading(post.num_comments)) }
                @if !post.comments.is_empty() {
                    ol.comment-list {
                        @for comment in &post.comments {
                            (self.render_comment(comment))
                        }
                    }
                }
            }
        }
    }

    fn render_comment(&self, comment: &CommentRecord) -> Markup {
        html! {
            li.comment id={ "comment-" (comment.id.as_str()) } {
                header.comment-meta {
                    span.comment-author data-author-hash=(comment.author_hash()) {
                        (comment.author)
                    }
                    " "
                    time datetime=(comment.id.datetime_iso()) { (self.display_date(comment)) }
                }
                div.comment-body {
                    (self.body(&comment.text))
                }
                @if !comment.replies.is_empty() {
                    ol.replies {
                        @for reply in &comment.replies {
                            (self.render_comment(reply))
                        }
                    }
                }
            }
        }
    }

    fn display_date(&self, comment: &CommentRecord) -> String {
        comment
            .timestamp()
            .format(&self.date_format)
            .unwrap_or_else(|_| comment.id.datetime_iso())
    }

    fn body(&self, text: &str) -> Markup {
        if self.markdown {
            PreEscaped(markdown_to_html(text))
        } else {
            plain_paragraphs(text)
        }
    }
}

/// Heading text for a comment count.
pub fn heading(count: usize) -> String {
    match count {
        0 => "No comments".to_string(),
        1 => "1 comment".to_string(),
        n => format!("{n} comments"),
    }
}

/// Convert untrusted Markdown to HTML with raw HTML escaped.
pub fn markdown_to_html(text: &str) -> String {
    let parser = Parser::new(text).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) if is_script_url(&dest_url) => Event::Start(Tag::Link {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        }),
        other => other,
    });
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

fn is_script_url(url: &str) -> bool {
    let lowered = url.trim_start().to_ascii_lowercase();
    lowered.starts_with("javascript:")
        || lowered.starts_with("vbscript:")
        || lowered.starts_with("data:")
}

/// Plain text split into paragraphs on blank lines.
fn plain_paragraphs(text: &str) -> Markup {
    html! {
        @for para in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            p { (para) }
        }
    }
}
