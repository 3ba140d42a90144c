//! Derived views over a post set
//!
//! Pure functions, recomputed from the posts on every call.

use indexmap::IndexMap;
use std::cmp::Ordering;

use crate::content::{ArchiveYear, Post, TermCount};
use crate::helpers::year_of;

/// Newest first. Equal dates keep their order; unparseable dates go last.
pub fn sorted(posts: &[Post]) -> Vec<&Post> {
    let mut keyed: Vec<_> = posts.iter().map(|p| (p.published_at(), p)).collect();
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    keyed.into_iter().map(|(_, p)| p).collect()
}

/// Sorted posts whose title, content, tags or categories contain `query`,
/// ignoring case
pub fn filtered<'a>(posts: &'a [Post], query: &str) -> Vec<&'a Post> {
    let sorted = sorted(posts);
    if query.is_empty() {
        return sorted;
    }

    let query = query.to_lowercase();
    let contains = |s: &str| s.to_lowercase().contains(&query);
    sorted
        .into_iter()
        .filter(|p| {
            contains(p.title())
                || contains(&p.content)
                || p.tags().iter().any(|t| contains(t))
                || p.categories().iter().any(|c| contains(c))
        })
        .collect()
}

/// Every tag with its post count, most used first
pub fn tag_counts(posts: &[Post]) -> Vec<TermCount> {
    term_counts(posts.iter().map(|p| p.tags()))
}

/// Every category with its post count, most used first
pub fn category_counts(posts: &[Post]) -> Vec<TermCount> {
    term_counts(posts.iter().map(|p| p.categories()))
}

/// Count terms; ties keep the order each term was first seen
fn term_counts<'a>(terms: impl Iterator<Item = &'a [String]>) -> Vec<TermCount> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for list in terms {
        for term in list {
            *counts.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    let mut counts: Vec<TermCount> = counts
        .into_iter()
        .map(|(name, count)| TermCount {
            name: name.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Sorted posts grouped by year, newest year first
pub fn archives_by_year(posts: &[Post]) -> Vec<ArchiveYear> {
    let mut years: IndexMap<Option<i32>, Vec<Post>> = IndexMap::new();
    for post in sorted(posts) {
        years
            .entry(year_of(post.date()))
            .or_default()
            .push(post.clone());
    }

    let mut archives: Vec<ArchiveYear> = years
        .into_iter()
        .map(|(year, posts)| ArchiveYear { year, posts })
        .collect();
    archives.sort_by(|a, b| b.year.cmp(&a.year));
    archives
}

/// Exact slug lookup
pub fn by_slug<'a>(posts: &'a [Post], slug: &str) -> Option<&'a Post> {
    posts.iter().find(|p| p.slug() == slug)
}

/// Sorted posts carrying exactly this tag
pub fn by_tag<'a>(posts: &'a [Post], tag: &str) -> Vec<&'a Post> {
    sorted(posts)
        .into_iter()
        .filter(|p| p.tags().iter().any(|t| t == tag))
        .collect()
}

/// Sorted posts filed under exactly this category
pub fn by_category<'a>(posts: &'a [Post], category: &str) -> Vec<&'a Post> {
    sorted(posts)
        .into_iter()
        .filter(|p| p.categories().iter().any(|c| c == category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostMeta;

    fn post(slug: &str, date: &str, tags: &[&str], categories: &[&str]) -> Post {
        Post {
            meta: PostMeta {
                slug: slug.to_string(),
                title: format!("Title of {}", slug),
                date: date.to_string(),
                tags: tags.iter().map(|s| s.to_string()).collect(),
                categories: categories.iter().map(|s| s.to_string()).collect(),
                cover: None,
                excerpt: None,
            },
            content: format!("Body of {}", slug),
            html: String::new(),
        }
    }

    fn sample() -> Vec<Post> {
        vec![
            post("a", "2023-05-01", &["rust", "life"], &["dev"]),
            post("b", "2024-01-10", &["life"], &["diary"]),
            post("c", "2023-05-01", &["Rust"], &["dev"]),
            post("d", "2022-12-31", &["anime"], &["diary", "dev"]),
            post("e", "2024-03-02", &[], &[]),
        ]
    }

    fn slugs(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.slug().to_string()).collect()
    }

    #[test]
    fn test_sorted_is_descending_and_stable() {
        let posts = sample();
        assert_eq!(slugs(&sorted(&posts)), vec!["e", "b", "a", "c", "d"]);
    }

    #[test]
    fn test_sorted_puts_bad_dates_last() {
        let posts = vec![
            post("x", "whenever", &[], &[]),
            post("y", "2020-01-01", &[], &[]),
        ];
        assert_eq!(slugs(&sorted(&posts)), vec!["y", "x"]);
    }

    #[test]
    fn test_filtered() {
        let posts = sample();
        assert_eq!(slugs(&filtered(&posts, "")), slugs(&sorted(&posts)));
        assert_eq!(slugs(&filtered(&posts, "RUST")), vec!["a", "c"]);
        assert_eq!(slugs(&filtered(&posts, "DIARY")), vec!["b", "d"]);
        assert_eq!(slugs(&filtered(&posts, "title of e")), vec!["e"]);
        assert_eq!(slugs(&filtered(&posts, "body of d")), vec!["d"]);
        assert!(filtered(&posts, "no such thing").is_empty());
    }

    #[test]
    fn test_tag_counts() {
        let posts = sample();
        let tags = tag_counts(&posts);
        assert_eq!(tags[0], TermCount { name: "life".into(), count: 2 });
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        // Ties keep first-seen order; tags are case sensitive
        assert_eq!(names, vec!["life", "rust", "Rust", "anime"]);
        for tag in &tags {
            let carrying = posts.iter().filter(|p| p.tags().contains(&tag.name)).count();
            assert_eq!(tag.count, carrying);
        }
    }

    #[test]
    fn test_category_counts() {
        let categories = category_counts(&sample());
        assert_eq!(categories[0], TermCount { name: "dev".into(), count: 3 });
        assert_eq!(categories[1], TermCount { name: "diary".into(), count: 2 });
    }

    #[test]
    fn test_archives_partition_posts() {
        let posts = sample();
        let archives = archives_by_year(&posts);
        let years: Vec<Option<i32>> = archives.iter().map(|a| a.year).collect();
        assert_eq!(years, vec![Some(2024), Some(2023), Some(2022)]);

        let in_2024: Vec<&str> = archives[0].posts.iter().map(|p| p.slug()).collect();
        assert_eq!(in_2024, vec!["e", "b"]);
        let in_2023: Vec<&str> = archives[1].posts.iter().map(|p| p.slug()).collect();
        assert_eq!(in_2023, vec!["a", "c"]);

        let total: usize = archives.iter().map(|a| a.posts.len()).sum();
        assert_eq!(total, posts.len());
    }

    #[test]
    fn test_archives_unknown_year_last() {
        let posts = vec![
            post("x", "whenever", &[], &[]),
            post("y", "2020-01-01", &[], &[]),
        ];
        let archives = archives_by_year(&posts);
        assert_eq!(archives[0].year, Some(2020));
        assert_eq!(archives[1].year, None);
    }

    #[test]
    fn test_lookups() {
        let posts = sample();
        assert_eq!(by_slug(&posts, "c").map(|p| p.slug()), Some("c"));
        assert!(by_slug(&posts, "missing").is_none());
        assert_eq!(slugs(&by_tag(&posts, "life")), vec!["b", "a"]);
        assert!(by_tag(&posts, "lif").is_empty());
        assert_eq!(slugs(&by_category(&posts, "dev")), vec!["a", "c", "d"]);
        assert!(by_category(&posts, "none").is_empty());
    }
}
