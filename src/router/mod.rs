//! Site routes
//!
//! Maps request paths to the page that renders them. The table has no
//! logic of its own beyond pulling the slug out of post URLs.

use serde::Serialize;

use crate::helpers::decode_url;

/// A page of the site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum Route {
    Home,
    Post { slug: String },
    Archives,
    Tags,
    Categories,
    About,
    Links,
    MessageBoard,
    Bangumi,
    Fitness,
    Shuoshuo,
    Memory,
    TvSeries,
    Movies,
    Games,
    #[serde(rename = "not-found")]
    NotFound,
}

/// Fixed pages: path, route and title
const STATIC_ROUTES: &[(&str, Route, &str)] = &[
    ("/", Route::Home, "Home"),
    ("/archives", Route::Archives, "Archives"),
    ("/tags", Route::Tags, "Tags"),
    ("/categories", Route::Categories, "Categories"),
    ("/about", Route::About, "About Me"),
    ("/links", Route::Links, "Friends"),
    ("/messageboard", Route::MessageBoard, "Guestbook"),
    ("/bangumi", Route::Bangumi, "Anime"),
    ("/fitness", Route::Fitness, "Fitness"),
    ("/shuoshuo", Route::Shuoshuo, "Thoughts"),
    ("/memory", Route::Memory, "Memories"),
    ("/tvseries", Route::TvSeries, "TV Series"),
    ("/movies", Route::Movies, "Movies"),
    ("/games", Route::Games, "Games"),
];

impl Route {
    /// Resolve a request path (query string and fragment are ignored)
    pub fn resolve(path: &str) -> Route {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        if let Some(slug) = path.strip_prefix("/post/") {
            if !slug.is_empty() && !slug.contains('/') {
                return Route::Post {
                    slug: decode_url(slug),
                };
            }
            return Route::NotFound;
        }

        STATIC_ROUTES
            .iter()
            .find(|(p, _, _)| *p == path)
            .map(|(_, route, _)| route.clone())
            .unwrap_or(Route::NotFound)
    }

    /// Page title shown in the browser tab
    pub fn title(&self) -> &'static str {
        match self {
            Route::Post { .. } => "Post",
            Route::NotFound => "404",
            other => STATIC_ROUTES
                .iter()
                .find(|(_, route, _)| route == other)
                .map(|(_, _, title)| *title)
                .unwrap_or_default(),
        }
    }

    /// Canonical path of this route
    pub fn path(&self) -> String {
        match self {
            Route::Post { slug } => format!("/post/{}", crate::helpers::encode_url(slug)),
            Route::NotFound => "/404".to_string(),
            other => STATIC_ROUTES
                .iter()
                .find(|(_, route, _)| route == other)
                .map(|(path, _, _)| path.to_string())
                .unwrap_or_default(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Route::NotFound)
    }
}
