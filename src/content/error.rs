//! Errors raised while fetching and parsing content

use thiserror::Error;

/// Failure to fetch or parse one piece of content
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {path}: {source}")]
    Manifest {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid front-matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    #[error("invalid slug {0:?}")]
    InvalidSlug(String),

    #[error("duplicate slug {0:?} in manifest")]
    DuplicateSlug(String),
}
