//! CLI entry point for leguan-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leguan_blog::commands::new::NewPost;

#[derive(Parser)]
#[command(name = "leguan-blog")]
#[command(author = "Leguan")]
#[command(version = "0.1.0")]
#[command(about = "Markdown posts, indexes and a preview server for Leguan's Blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Slug for the post (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,

        /// Tag to attach, may be repeated
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Category to attach, may be repeated
        #[arg(short = 'C', long = "category")]
        categories: Vec<String>,
    },

    /// List site information
    List {
        /// Type of content to list (post, tag, category, archive)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Show a single post
    Show {
        /// Slug of the post
        slug: String,
    },

    /// Search posts by title, content, tags and categories
    Search {
        /// Text to look for
        query: String,
    },

    /// Resolve a site path to its page
    Route {
        /// Path such as /post/welcome
        path: String,
    },

    /// Start a local preview server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Reload posts when files change
        #[arg(short, long)]
        watch: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "leguan_blog=debug,info"
    } else {
        "leguan_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            leguan_blog::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::New {
            title,
            slug,
            tags,
            categories,
        } => {
            let blog = leguan_blog::Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let path = leguan_blog::commands::new::create_post(
                &blog,
                NewPost {
                    title: &title,
                    slug: slug.as_deref(),
                    tags,
                    categories,
                },
            )?;
            println!("Created {:?}", path);
        }

        Commands::List { r#type } => {
            let blog = leguan_blog::Blog::new(&base_dir)?;
            leguan_blog::commands::list::run(&blog, &r#type).await?;
        }

        Commands::Show { slug } => {
            let blog = leguan_blog::Blog::new(&base_dir)?;
            leguan_blog::commands::list::show(&blog, &slug).await?;
        }

        Commands::Search { query } => {
            let blog = leguan_blog::Blog::new(&base_dir)?;
            leguan_blog::commands::list::search(&blog, &query).await?;
        }

        Commands::Route { path } => {
            let blog = leguan_blog::Blog::new(&base_dir)?;
            leguan_blog::commands::list::route(&blog, &path);
        }

        Commands::Server { port, ip, watch } => {
            let blog = leguan_blog::Blog::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            leguan_blog::server::start(&blog, &ip, port, watch).await?;
        }

        Commands::Version => {
            println!("leguan-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
