//! leguan-blog: content engine for Leguan's Blog
//!
//! Loads a JSON manifest of posts and their Markdown bodies, renders them to
//! HTML with syntax highlighting, and answers the views the site is built
//! from: newest posts, search, tags, categories and yearly archives.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod i18n;
pub mod router;
pub mod server;
pub mod store;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentLoader, FsSource, MarkdownRenderer};
use store::{BlogStore, LoadReport};

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// The blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content root, holding `posts/` and static files
    pub source_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        let source_dir = base_dir.join(&config.source_dir);

        Ok(Self {
            config,
            base_dir,
            source_dir,
        })
    }

    /// Directory holding the manifest and post files
    pub fn posts_dir(&self) -> PathBuf {
        self.source_dir.join("posts")
    }

    /// A loader reading from the content root
    pub fn loader(&self) -> ContentLoader<FsSource> {
        ContentLoader::new(
            FsSource::new(&self.source_dir),
            MarkdownRenderer::with_theme(&self.config.highlight.theme),
            self.config.excerpt_length,
        )
    }

    /// Load every post into a fresh store
    pub async fn load(&self) -> (BlogStore, LoadReport) {
        let store = BlogStore::new();
        let report = store.load_posts(&self.loader()).await;
        (store, report)
    }
}
