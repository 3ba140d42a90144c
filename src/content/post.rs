//! Post models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::helpers::{cover_image, parse_date};

/// Post metadata as listed in the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMeta {
    /// Unique identifier, also names the Markdown file
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date (ISO date string)
    pub date: String,

    /// Post tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Post categories
    #[serde(default)]
    pub categories: Vec<String>,

    /// Cover image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,

    /// Precomputed summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

/// A blog post: manifest metadata plus its body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(flatten)]
    pub meta: PostMeta,

    /// Markdown body, without front-matter
    pub content: String,

    /// Rendered HTML content
    pub html: String,
}

impl Post {
    /// Merge manifest metadata with a parsed body.
    ///
    /// An empty manifest excerpt is replaced by `excerpt`.
    pub fn new(
        mut meta: PostMeta,
        content: String,
        html: String,
        excerpt: impl FnOnce(&str) -> String,
    ) -> Self {
        if meta.excerpt.as_deref().map_or(true, str::is_empty) {
            meta.excerpt = Some(excerpt(&content));
        }
        Self { meta, content, html }
    }

    pub fn slug(&self) -> &str {
        &self.meta.slug
    }

    pub fn title(&self) -> &str {
        &self.meta.title
    }

    pub fn date(&self) -> &str {
        &self.meta.date
    }

    pub fn tags(&self) -> &[String] {
        &self.meta.tags
    }

    pub fn categories(&self) -> &[String] {
        &self.meta.categories
    }

    pub fn excerpt(&self) -> &str {
        self.meta.excerpt.as_deref().unwrap_or_default()
    }

    /// Parsed publication date, if the date string is understood
    pub fn published_at(&self) -> Option<NaiveDateTime> {
        parse_date(&self.meta.date)
    }

    /// The explicit cover, or one picked from the pool by slug
    pub fn cover_or_default(&self, root: &str) -> String {
        match self.meta.cover.as_deref() {
            Some(cover) if !cover.is_empty() => crate::helpers::asset_url(root, cover),
            _ => cover_image(root, &self.meta.slug),
        }
    }
}

/// A tag or category with the number of posts carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub name: String,
    pub count: usize,
}

/// Posts published in one calendar year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveYear {
    /// `None` collects posts whose date can't be parsed
    pub year: Option<i32>,
    pub posts: Vec<Post>,
}

/// The post shown when the manifest can't be loaded
pub fn default_posts() -> Vec<Post> {
    vec![Post {
        meta: PostMeta {
            slug: "welcome".to_string(),
            title: "欢迎来到 Leguan's Blog".to_string(),
            date: "2026-02-04".to_string(),
            tags: vec!["博客".to_string(), "生活".to_string()],
            categories: vec!["随笔".to_string()],
            cover: Some(String::new()),
            excerpt: Some("这是我的第一篇博客文章。Digest your emotions - 消化你的情绪。".to_string()),
        },
        content: "# 欢迎！\n\n这是我的第一篇博客文章。\n\n## 关于这个博客\n\n**Digest your emotions** - 消化你的情绪。\n\n我是 Leguan，一个想要看看世界的人。".to_string(),
        html: "<h1>欢迎！</h1><p>这是我的第一篇博客文章。</p><h2>关于这个博客</h2><p><strong>Digest your emotions</strong> - 消化你的情绪。</p><p>我是 Leguan，一个想要看看世界的人。</p>".to_string(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(slug: &str, excerpt: Option<&str>) -> PostMeta {
        PostMeta {
            slug: slug.to_string(),
            title: "Title".to_string(),
            date: "2024-03-01".to_string(),
            tags: Vec::new(),
            categories: Vec::new(),
            cover: None,
            excerpt: excerpt.map(str::to_string),
        }
    }

    #[test]
    fn test_manifest_excerpt_wins() {
        let post = Post::new(meta("a", Some("given")), "body".into(), String::new(), |_| {
            "computed".to_string()
        });
        assert_eq!(post.excerpt(), "given");
    }

    #[test]
    fn test_empty_excerpt_is_computed() {
        let post = Post::new(meta("a", Some("")), "body".into(), String::new(), |c| {
            format!("from {}", c)
        });
        assert_eq!(post.excerpt(), "from body");

        let post = Post::new(meta("a", None), "body".into(), String::new(), |c| c.to_string());
        assert_eq!(post.excerpt(), "body");
    }

    #[test]
    fn test_manifest_defaults() {
        let meta: PostMeta =
            serde_json::from_str(r#"{"slug": "x", "title": "X", "date": "2024-01-01"}"#).unwrap();
        assert!(meta.tags.is_empty());
        assert!(meta.categories.is_empty());
        assert_eq!(meta.cover, None);
    }

    #[test]
    fn test_post_serializes_flat() {
        let post = Post::new(meta("flat", Some("e")), "c".into(), "<p>c</p>".into(), |_| {
            String::new()
        });
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["slug"], "flat");
        assert_eq!(json["html"], "<p>c</p>");
    }

    #[test]
    fn test_cover_falls_back_to_pool() {
        let mut m = meta("seeded", None);
        m.cover = Some(String::new());
        let post = Post::new(m, String::new(), String::new(), |_| String::new());
        assert_eq!(post.cover_or_default("/"), cover_image("/", "seeded"));

        let mut m = meta("explicit", None);
        m.cover = Some("/img/mine.jpg".to_string());
        let post = Post::new(m, String::new(), String::new(), |_| String::new());
        assert_eq!(post.cover_or_default("/blog/"), "/blog/img/mine.jpg");
    }

    #[test]
    fn test_default_post() {
        let posts = default_posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug(), "welcome");
        assert!(posts[0].published_at().is_some());
    }
}
