//! List site content

use anyhow::Result;

use crate::helpers::{post_url, DateStyle};
use crate::router::Route;
use crate::store::BlogStore;
use crate::Blog;

/// List site content by type
pub async fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let (store, _) = blog.load().await;

    match content_type {
        "post" | "posts" => {
            let posts = store.sorted_posts();
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!("  {} - {} [{}]", post.date(), post.title(), post.slug());
            }
        }
        "tag" | "tags" => {
            let tags = store.all_tags();
            println!("Tags ({}):", tags.len());
            for tag in tags {
                println!("  {} ({})", tag.name, tag.count);
            }
        }
        "category" | "categories" => {
            let categories = store.all_categories();
            println!("Categories ({}):", categories.len());
            for cat in categories {
                println!("  {} ({})", cat.name, cat.count);
            }
        }
        "archive" | "archives" => {
            for archive in store.archives_by_year() {
                let year = archive
                    .year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "Undated".to_string());
                println!("{} ({}):", year, archive.posts.len());
                for post in archive.posts {
                    println!("  {} - {}", post.date(), post.title());
                }
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, category, archive",
                content_type
            );
        }
    }

    Ok(())
}

/// Print one post
pub async fn show(blog: &Blog, slug: &str) -> Result<()> {
    let (store, _) = blog.load().await;
    let Some(post) = store.post_by_slug(slug) else {
        anyhow::bail!("No post with slug {:?}", slug);
    };

    let dates = blog.config.date_formatter();
    println!("{}", post.title());
    println!(
        "{} ({}) · {} min read",
        dates.format(post.date(), DateStyle::Full),
        dates.format(post.date(), DateStyle::Relative),
        crate::content::estimate_reading_time(&post.content)
    );
    if !post.tags().is_empty() {
        println!("Tags: {}", post.tags().join(", "));
    }
    if !post.categories().is_empty() {
        println!("Categories: {}", post.categories().join(", "));
    }
    println!("URL: {}", post_url(&blog.config.root, post.slug()));
    println!("Cover: {}", post.cover_or_default(&blog.config.root));
    println!();
    println!("{}", post.html);

    Ok(())
}

/// Print posts matching a search query
pub async fn search(blog: &Blog, query: &str) -> Result<()> {
    let (store, _) = blog.load().await;
    print_search(&store, query);
    Ok(())
}

fn print_search(store: &BlogStore, query: &str) {
    store.set_search_query(query);
    let posts = store.filtered_posts();
    println!("{} result(s) for {:?}:", posts.len(), query);
    for post in posts {
        println!("  {} - {} [{}]", post.date(), post.title(), post.slug());
        println!("      {}", post.excerpt().replace('\n', " "));
    }
}

/// Show which page a path resolves to
pub fn route(blog: &Blog, path: &str) {
    let route = Route::resolve(path);
    println!("{:?}", route);
    println!("Title: {}", blog.config.document_title(route.title()));
}
