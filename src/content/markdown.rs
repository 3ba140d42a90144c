//! Markdown rendering with syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::frontmatter::{self, Attributes};
use super::ContentError;

lazy_static! {
    /// Bare URLs picked up by link detection
    static ref BARE_URL: Regex =
        Regex::new(r#"(?:https?://|www\.)[^\s<>"]*[^\s<>".,:;!?'()\[\]]"#).unwrap();
}

/// Output of parsing a raw post file
#[derive(Debug, Clone)]
pub struct ParsedMarkdown {
    /// Front-matter key/value pairs
    pub attributes: Attributes,
    /// Markdown body, before rendering
    pub content: String,
    /// Rendered HTML
    pub html: String,
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_theme("base16-ocean.dark")
    }

    /// Create a renderer whose stylesheet uses the given syntect theme
    pub fn with_theme(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
        }
    }

    /// Split front-matter from a raw post and render its body
    pub fn parse(&self, raw: &str) -> Result<ParsedMarkdown, ContentError> {
        let (attributes, body) = frontmatter::split(raw)?;
        Ok(ParsedMarkdown {
            attributes,
            content: body.to_string(),
            html: self.render(body),
        })
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;
        // Depth of links and images; no link detection inside them
        let mut link_depth = 0usize;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::Start(tag @ (Tag::Link { .. } | Tag::Image { .. })) => {
                    link_depth += 1;
                    events.push(Event::Start(tag));
                }
                Event::End(end @ (TagEnd::Link | TagEnd::Image)) => {
                    link_depth = link_depth.saturating_sub(1);
                    events.push(Event::End(end));
                }
                Event::Text(text) if link_depth == 0 => linkify(text, &mut events),
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a fenced code block.
    ///
    /// Recognized languages get class-based spans; anything else is escaped.
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let syntax = lang.and_then(|lang| {
            self.syntax_set
                .find_syntax_by_token(lang)
                .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
        });

        let (Some(lang), Some(syntax)) = (lang, syntax) else {
            return format!(r#"<pre class="hljs"><code>{}</code></pre>"#, html_escape(code));
        };

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                tracing::debug!("Highlighting {} failed, using plain text: {}", lang, e);
                return format!(r#"<pre class="hljs"><code>{}</code></pre>"#, html_escape(code));
            }
        }

        format!(
            r#"<pre class="hljs"><code class="language-{}">{}</code></pre>"#,
            html_escape(lang),
            generator.finalize()
        )
    }

    /// Stylesheet matching the classes emitted for highlighted code
    pub fn highlight_css(&self) -> Option<String> {
        let theme = self.theme_set.themes.get(&self.theme_name).or_else(|| {
            tracing::warn!("Unknown highlight theme {}, using a default", self.theme_name);
            self.theme_set.themes.values().next()
        })?;
        css_for_theme_with_class_style(theme, ClassStyle::Spaced).ok()
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn bare URLs in a text run into links
fn linkify<'a>(text: CowStr<'a>, events: &mut Vec<Event<'a>>) {
    if !BARE_URL.is_match(&text) {
        events.push(Event::Text(text));
        return;
    }

    let mut last = 0;
    for found in BARE_URL.find_iter(&text) {
        if found.start() > last {
            events.push(Event::Text(CowStr::from(text[last..found.start()].to_string())));
        }
        let url = found.as_str();
        let href = if url.starts_with("www.") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };
        events.push(Event::Html(CowStr::from(format!(
            r#"<a href="{}">{}</a>"#,
            html_escape(&href),
            html_escape(url)
        ))));
        last = found.end();
    }
    if last < text.len() {
        events.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

/// Simple HTML escaping
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_parse_splits_frontmatter() {
        let renderer = MarkdownRenderer::new();
        let parsed = renderer
            .parse("---\ntitle: Hello\n---\nBody **text**")
            .unwrap();
        assert_eq!(parsed.attributes.len(), 1);
        assert_eq!(parsed.attributes["title"], serde_yaml::Value::from("Hello"));
        assert_eq!(parsed.content, "Body **text**");
        assert!(parsed.html.contains("<strong>text</strong>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```");
        assert!(html.contains(r#"<pre class="hljs"><code class="language-rust">"#));
        assert!(html.contains("<span"));
    }

    #[test]
    fn test_unknown_language_is_escaped() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```nosuchlang\n<b>&</b>\n```");
        assert!(html.contains(r#"<pre class="hljs"><code>&lt;b&gt;&amp;&lt;/b&gt;"#));
        assert!(!html.contains("language-nosuchlang"));
    }

    #[test]
    fn test_untagged_block_is_escaped() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```\na < b\n```");
        assert!(html.contains(r#"<pre class="hljs"><code>a &lt; b"#));
    }

    #[test]
    fn test_bare_urls_become_links() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("See https://example.com/path for more.");
        assert!(html.contains(r#"<a href="https://example.com/path">https://example.com/path</a>"#));
        assert!(html.contains(" for more."));

        let html = renderer.render("Visit www.example.org.");
        assert!(html.contains(r#"<a href="http://www.example.org">www.example.org</a>."#));
    }

    #[test]
    fn test_existing_links_are_not_relinked() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("[https://a.example](https://a.example)");
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn test_smart_punctuation() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("\"quoted\" -- dash");
        assert!(html.contains('\u{201c}'));
        assert!(html.contains('\u{2013}'));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("<div class=\"note\">hi</div>\n");
        assert!(html.contains("<div class=\"note\">hi</div>"));
    }

    #[test]
    fn test_highlight_css() {
        let renderer = MarkdownRenderer::new();
        let css = renderer.highlight_css().unwrap();
        assert!(!css.is_empty());
    }
}
