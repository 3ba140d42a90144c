//! Blog store - the loaded post set and the state around it

pub mod views;

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;

use crate::content::{ArchiveYear, ContentLoader, ContentSource, LoadFailure, Post, TermCount};

/// Light or dark color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// Application state shared by everything that reads posts.
///
/// Loads replace the post set in one swap; readers always see either the
/// old set or the new one. Overlapping loads run one at a time in the order
/// they were started, so the last one started decides the post set.
#[derive(Debug)]
pub struct BlogStore {
    posts: RwLock<Arc<Vec<Post>>>,
    /// Loads started and not yet finished, including queued ones
    loading: AtomicUsize,
    load_lock: Mutex<()>,
    search_query: RwLock<String>,
    dark: AtomicBool,
}

impl Default for BlogStore {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened during [`BlogStore::load_posts`]
#[derive(Debug)]
pub struct LoadReport {
    /// Posts now held by the store
    pub loaded: usize,
    pub failures: Vec<LoadFailure>,
    pub used_fallback: bool,
}

/// Counts one load in progress until dropped, however the load ends
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(count)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl BlogStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Arc::new(Vec::new())),
            loading: AtomicUsize::new(0),
            load_lock: Mutex::new(()),
            search_query: RwLock::new(String::new()),
            dark: AtomicBool::new(false),
        }
    }

    /// Create a store already holding `posts`
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let store = Self::new();
        store.replace_posts(posts);
        store
    }

    /// Load posts through `loader`, replacing the current set
    pub async fn load_posts<S: ContentSource>(&self, loader: &ContentLoader<S>) -> LoadReport {
        let _loading = LoadingGuard::enter(&self.loading);
        let _turn = self.load_lock.lock().await;
        let outcome = loader.load_posts().await;
        let report = LoadReport {
            loaded: outcome.posts.len(),
            failures: outcome.failures,
            used_fallback: outcome.used_fallback,
        };
        self.replace_posts(outcome.posts);
        report
    }

    /// Swap in a new post set
    pub fn replace_posts(&self, posts: Vec<Post>) {
        let mut current = self.posts.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(posts);
    }

    /// The current post set, in load order
    pub fn posts(&self) -> Arc<Vec<Post>> {
        self.posts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True while any load is running or waiting to run
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) > 0
    }

    pub fn search_query(&self) -> String {
        self.search_query
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_search_query(&self, query: &str) {
        let mut current = self
            .search_query
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = query.to_string();
    }

    /// All posts, newest first
    pub fn sorted_posts(&self) -> Vec<Post> {
        views::sorted(&self.posts()).into_iter().cloned().collect()
    }

    /// Sorted posts matching the current search query
    pub fn filtered_posts(&self) -> Vec<Post> {
        let query = self.search_query();
        views::filtered(&self.posts(), &query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn all_tags(&self) -> Vec<TermCount> {
        views::tag_counts(&self.posts())
    }

    pub fn all_categories(&self) -> Vec<TermCount> {
        views::category_counts(&self.posts())
    }

    pub fn archives_by_year(&self) -> Vec<ArchiveYear> {
        views::archives_by_year(&self.posts())
    }

    pub fn post_by_slug(&self, slug: &str) -> Option<Post> {
        views::by_slug(&self.posts(), slug).cloned()
    }

    pub fn posts_by_tag(&self, tag: &str) -> Vec<Post> {
        views::by_tag(&self.posts(), tag)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn posts_by_category(&self, category: &str) -> Vec<Post> {
        views::by_category(&self.posts(), category)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Current color scheme
    pub fn theme(&self) -> Theme {
        if self.dark.load(Ordering::SeqCst) {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Pick the starting scheme: a saved choice wins over the system preference
    pub fn init_theme(&self, saved: Option<Theme>, prefers_dark: bool) -> Theme {
        let theme = saved.unwrap_or(if prefers_dark { Theme::Dark } else { Theme::Light });
        self.dark.store(theme == Theme::Dark, Ordering::SeqCst);
        theme
    }

    /// Flip between light and dark, returning the new scheme
    pub fn toggle_theme(&self) -> Theme {
        let was_dark = self.dark.fetch_xor(true, Ordering::SeqCst);
        if was_dark {
            Theme::Light
        } else {
            Theme::Dark
        }
    }
}
