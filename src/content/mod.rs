//! Content module - loads posts and turns Markdown into HTML and excerpts

mod error;
mod excerpt;
pub mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use error::ContentError;
pub use excerpt::{
    estimate_reading_time, extract_excerpt, strip_markdown, DEFAULT_EXCERPT_LENGTH, MORE_MARKER,
    READING_SPEED,
};
pub use frontmatter::Attributes;
pub use loader::{ContentLoader, ContentSource, FsSource, LoadFailure, LoadOutcome};
pub use markdown::{html_escape, MarkdownRenderer, ParsedMarkdown};
pub use post::{default_posts, ArchiveYear, Post, PostMeta, TermCount};

/// Parse a raw post with a default renderer.
///
/// Building a renderer loads syntax definitions; hold a [`MarkdownRenderer`]
/// when parsing many posts.
pub fn parse_markdown(raw: &str) -> Result<ParsedMarkdown, ContentError> {
    MarkdownRenderer::new().parse(raw)
}
