//! Create a new post

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::loader::{is_safe_slug, post_path, MANIFEST_PATH};
use crate::content::PostMeta;
use crate::Blog;

/// Options for a new post
#[derive(Debug, Default)]
pub struct NewPost<'a> {
    pub title: &'a str,
    /// Defaults to the slugified title
    pub slug: Option<&'a str>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

/// Write a Markdown file for the post and list it in the manifest
pub fn create_post(blog: &Blog, post: NewPost<'_>) -> Result<PathBuf> {
    let slug = match post.slug {
        Some(slug) => slug.to_string(),
        None => slug::slugify(post.title),
    };
    if slug.is_empty() {
        anyhow::bail!("Can't derive a slug from title {:?}", post.title);
    }
    if !is_safe_slug(&slug) {
        anyhow::bail!("Slug {:?} must name a single file in posts/", slug);
    }

    let manifest_path = blog.source_dir.join(MANIFEST_PATH);
    let mut manifest: Vec<PostMeta> = if manifest_path.exists() {
        let text = fs::read_to_string(&manifest_path)?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid manifest {:?}", manifest_path))?
    } else {
        Vec::new()
    };

    if manifest.iter().any(|m| m.slug == slug) {
        anyhow::bail!("A post with slug {:?} already exists", slug);
    }

    let file_path = blog.source_dir.join(post_path(&slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = blog.config.date_formatter().now();
    let meta = PostMeta {
        slug,
        title: post.title.to_string(),
        date: now.format("%Y-%m-%d").to_string(),
        tags: post.tags,
        categories: post.categories,
        cover: None,
        excerpt: None,
    };

    let mut front_matter = serde_yaml::Mapping::new();
    front_matter.insert("title".into(), meta.title.clone().into());
    front_matter.insert("date".into(), meta.date.clone().into());
    let front_matter = serde_yaml::to_string(&front_matter)?;

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, format!("---\n{}---\n\n", front_matter))?;

    manifest.push(meta);
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)? + "\n")?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blog() -> (tempfile::TempDir, Blog) {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        (dir, blog)
    }

    #[test]
    fn test_create_post() {
        let (_dir, blog) = blog();
        let path = create_post(
            &blog,
            NewPost {
                title: "Hello World",
                tags: vec!["rust".to_string()],
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(path, blog.posts_dir().join("hello-world.md"));
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("---\ntitle: Hello World\n"));

        let manifest: Vec<PostMeta> =
            serde_json::from_str(&fs::read_to_string(blog.posts_dir().join("index.json")).unwrap())
                .unwrap();
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest[0].slug, "hello-world");
        assert_eq!(manifest[0].tags, vec!["rust"]);
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let (_dir, blog) = blog();
        let post = || NewPost {
            title: "Twice",
            ..Default::default()
        };
        create_post(&blog, post()).unwrap();
        assert!(create_post(&blog, post()).is_err());
    }

    #[test]
    fn test_explicit_slug() {
        let (_dir, blog) = blog();
        let path = create_post(
            &blog,
            NewPost {
                title: "随便写写",
                slug: Some("notes"),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(path.ends_with("notes.md"));
    }

    #[test]
    fn test_unsafe_slug_rejected() {
        let (_dir, blog) = blog();
        for slug in ["../x", "a/b", ".."] {
            let result = create_post(
                &blog,
                NewPost {
                    title: "Escape",
                    slug: Some(slug),
                    ..Default::default()
                },
            );
            assert!(result.is_err(), "{} was accepted", slug);
        }
        assert!(!blog.source_dir.join("x.md").exists());
        assert!(!blog.posts_dir().join("index.json").exists());
    }

    #[tokio::test]
    async fn test_new_post_loads() {
        let (_dir, blog) = blog();
        create_post(
            &blog,
            NewPost {
                title: "Fresh",
                ..Default::default()
            },
        )
        .unwrap();
        let (store, report) = blog.load().await;
        assert!(!report.used_fallback);
        assert_eq!(store.post_by_slug("fresh").unwrap().title(), "Fresh");
    }
}
