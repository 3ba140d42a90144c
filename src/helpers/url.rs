//! URL helper functions

/// Resolve a site asset against the site root
///
/// # Examples
/// ```ignore
/// asset_url("/blog/", "/img/avatar.jpg") // -> "/blog/img/avatar.jpg"
/// asset_url("/blog/", "https://cdn.example.com/a.png") // unchanged
/// ```
pub fn asset_url(root: &str, path: &str) -> String {
    if path.starts_with("http") || path.starts_with("data:") {
        return path.to_string();
    }

    let clean = path.strip_prefix('/').unwrap_or(path);
    format!("{}{}", with_trailing_slash(root), clean)
}

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for("/blog/", "/archives") // -> "/blog/archives"
/// ```
pub fn url_for(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// URL of a post page
pub fn post_url(root: &str, slug: &str) -> String {
    url_for(root, &format!("post/{}", encode_url(slug)))
}

/// Encode a URL path segment
pub fn encode_url(segment: &str) -> String {
    percent_encoding::utf8_percent_encode(segment, percent_encoding::NON_ALPHANUMERIC).to_string()
}

/// Decode a percent-encoded URL path segment
pub fn decode_url(segment: &str) -> String {
    percent_encoding::percent_decode_str(segment)
        .decode_utf8_lossy()
        .into_owned()
}

fn with_trailing_slash(root: &str) -> String {
    if root.is_empty() {
        "/".to_string()
    } else if root.ends_with('/') {
        root.to_string()
    } else {
        format!("{}/", root)
    }
}
