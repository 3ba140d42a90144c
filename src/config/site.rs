//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::DEFAULT_EXCERPT_LENGTH;
use crate::helpers::DateFormatter;
use crate::i18n::Language;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: Language,
    /// IANA timezone name; empty means local time
    pub timezone: String,

    // URL
    pub root: String,

    // Directory holding `posts/` and static files
    pub source_dir: String,

    // Writing
    pub excerpt_length: usize,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Leguan's Blog".to_string(),
            subtitle: "Digest your emotions".to_string(),
            description: String::new(),
            author: "Leguan".to_string(),
            language: Language::En,
            timezone: String::new(),

            root: "/".to_string(),

            source_dir: "public".to_string(),

            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            highlight: HighlightConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Configured timezone, if set and known
    pub fn tz(&self) -> Option<Tz> {
        if self.timezone.is_empty() {
            return None;
        }
        match self.timezone.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(_) => {
                tracing::warn!("Unknown timezone {:?}, using local time", self.timezone);
                None
            }
        }
    }

    /// Date formatter for this site's language and timezone
    pub fn date_formatter(&self) -> DateFormatter {
        DateFormatter::new(self.language, self.tz())
    }

    /// Browser tab title for a page
    pub fn document_title(&self, page_title: &str) -> String {
        if page_title.is_empty() {
            self.title.clone()
        } else {
            format!("{} | {}", page_title, self.title)
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme used for the generated stylesheet
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
        }
    }
}
