//! Site images and the cover pool

use serde::Serialize;

use super::asset_url;

/// Covers handed out to posts without one of their own
pub const COVER_IMAGES: [&str; 7] = [
    "/img/anime-rainbow-landscape.jpg",
    "/img/fantasy-anime-style-scene.jpg",
    "/img/illustration-anime-city.jpg",
    "/img/anime-style-characters-space.jpg",
    "/img/fantasy-magic-landscape.jpg",
    "/img/anime-landscape-person-traveling.jpg",
    "/img/anime-character-traveling.jpg",
];

/// Pick a cover from the pool, always the same one for a given seed.
///
/// `h = (i32(h) << 5) - h + unit` over UTF-16 code units; only the shift
/// wraps to 32 bits.
pub fn cover_image(root: &str, seed: &str) -> String {
    let hash = seed.encode_utf16().fold(0i64, |h, unit| {
        i64::from((h as i32).wrapping_shl(5)) - h + i64::from(unit)
    });
    let index = (hash.unsigned_abs() % COVER_IMAGES.len() as u64) as usize;
    asset_url(root, COVER_IMAGES[index])
}

/// Fixed images used across the site, resolved against the root
#[derive(Debug, Clone, Serialize)]
pub struct SiteImages {
    pub background: String,
    pub avatar: String,
    pub default_cover: String,
    pub about_background: String,
    pub archive_background: String,
}

impl SiteImages {
    pub fn new(root: &str) -> Self {
        Self {
            background: asset_url(root, "/img/background.jpg"),
            avatar: asset_url(root, "/img/avatar.jpg"),
            default_cover: asset_url(root, "/img/default-cover.jpg"),
            about_background: asset_url(root, "/img/about-bg.jpg"),
            archive_background: asset_url(root, "/img/archive-bg.jpg"),
        }
    }
}
