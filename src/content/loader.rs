//! Content loader - loads the manifest and every post it lists

use futures_util::future::join_all;
use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;

use super::{default_posts, extract_excerpt, ContentError, MarkdownRenderer, Post, PostMeta};

/// Manifest location, relative to the content root
pub const MANIFEST_PATH: &str = "posts/index.json";

/// Where a post's Markdown lives, relative to the content root
pub fn post_path(slug: &str) -> String {
    format!("posts/{}.md", slug)
}

/// Somewhere posts can be fetched from
pub trait ContentSource {
    /// Fetch the text resource at `path`, relative to the content root
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, ContentError>> + Send;
}

/// Reads content from a directory on disk
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl ContentSource for FsSource {
    async fn fetch(&self, path: &str) -> Result<String, ContentError> {
        let full = self.root.join(path);
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|source| ContentError::Fetch {
                path: path.to_string(),
                source,
            })
    }
}

/// A post that could not be loaded
#[derive(Debug)]
pub struct LoadFailure {
    pub slug: String,
    pub error: ContentError,
}

/// Result of one load: every post that made it, and why the rest didn't
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub posts: Vec<Post>,
    pub failures: Vec<LoadFailure>,
    /// Set when the manifest failed and the built-in posts were used
    pub used_fallback: bool,
}

/// Loads posts from a [`ContentSource`]
pub struct ContentLoader<S> {
    source: S,
    renderer: MarkdownRenderer,
    excerpt_length: usize,
}

impl<S: ContentSource> ContentLoader<S> {
    /// Create a new content loader
    pub fn new(source: S, renderer: MarkdownRenderer, excerpt_length: usize) -> Self {
        Self {
            source,
            renderer,
            excerpt_length,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Load every post listed in the manifest.
    ///
    /// Never fails: posts that can't be fetched or parsed are dropped, and a
    /// manifest that can't be read is replaced by the built-in posts.
    pub async fn load_posts(&self) -> LoadOutcome {
        let metas = match self.load_manifest().await {
            Ok(metas) => metas,
            Err(e) => {
                tracing::error!("Failed to load posts: {}", e);
                return LoadOutcome {
                    posts: default_posts(),
                    failures: Vec::new(),
                    used_fallback: true,
                };
            }
        };

        let mut failures = Vec::new();
        let mut seen = HashSet::new();
        let mut pending = Vec::new();
        for meta in metas {
            if seen.insert(meta.slug.clone()) {
                pending.push(meta);
            } else {
                tracing::warn!("Skipping duplicate post slug {}", meta.slug);
                failures.push(LoadFailure {
                    error: ContentError::DuplicateSlug(meta.slug.clone()),
                    slug: meta.slug,
                });
            }
        }

        let results = join_all(pending.into_iter().map(|meta| async move {
            let slug = meta.slug.clone();
            self.load_post(meta).await.map_err(|error| LoadFailure { slug, error })
        }))
        .await;

        let mut posts = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(post) => {
                    tracing::debug!("Loaded post {}", post.slug());
                    posts.push(post);
                }
                Err(failure) => {
                    tracing::warn!("Failed to load post {}: {}", failure.slug, failure.error);
                    failures.push(failure);
                }
            }
        }

        tracing::info!("Loaded {} posts ({} failed)", posts.len(), failures.len());

        LoadOutcome {
            posts,
            failures,
            used_fallback: false,
        }
    }

    /// Fetch and decode the manifest
    pub async fn load_manifest(&self) -> Result<Vec<PostMeta>, ContentError> {
        let text = self.source.fetch(MANIFEST_PATH).await?;
        serde_json::from_str(&text).map_err(|source| ContentError::Manifest {
            path: MANIFEST_PATH.to_string(),
            source,
        })
    }

    /// Fetch, parse and render a single post
    async fn load_post(&self, meta: PostMeta) -> Result<Post, ContentError> {
        if !is_safe_slug(&meta.slug) {
            return Err(ContentError::InvalidSlug(meta.slug));
        }

        let raw = self.source.fetch(&post_path(&meta.slug)).await?;
        let parsed = self.renderer.parse(&raw)?;
        let excerpt_length = self.excerpt_length;

        Ok(Post::new(meta, parsed.content, parsed.html, |content| {
            extract_excerpt(content, excerpt_length)
        }))
    }
}

/// A slug must name a single file inside the posts directory
pub(crate) fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}
