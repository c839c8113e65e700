//! CLI entry point for folio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_rs::commands::list::ListFilter;
use folio_rs::content::{Kind, PostCategory};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Content pipeline and page builder for a personal portfolio site", long_about = None)]
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
    /// Build static pages into the public directory
    #[command(alias = "b")]
    Build {
        /// Rebuild when sources change
        #[arg(short, long)]
        watch: bool,
    },

    /// List projects or posts
    List {
        /// Kind of content to list (post, project)
        #[arg(default_value = "post")]
        r#type: String,

        /// Only posts in this category (book, tech, others)
        #[arg(long)]
        category: Option<String>,

        /// Only posts with this tag
        #[arg(long)]
        tag: Option<String>,

        /// Only featured projects
        #[arg(long)]
        featured: bool,
    },

    /// Render a project or post as sanitized HTML
    Show {
        /// Kind of content (post, project)
        r#type: String,

        /// Document identifier (file name without .md)
        slug: String,

        /// Print a plain-text excerpt of this many words instead
        #[arg(long)]
        excerpt: Option<usize>,
    },

    /// Create a new project or post
    New {
        /// Kind of content (post, project)
        r#type: String,

        /// Title of the new document
        title: String,

        /// Category for a new post
        #[arg(long, default_value = "others")]
        category: String,
    },

    /// Load all content and report problems
    Check,

    /// Start a local preview server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Serve without watching or live reload
        #[arg(long)]
        r#static: bool,
    },

    /// Delete the public folder
    Clean,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let folio = folio_rs::Folio::new(&base_dir)?;

    match cli.command {
        Commands::Build { watch } => {
            folio_rs::commands::build::run(&folio)?;
            println!("Built successfully!");

            if watch {
                folio_rs::commands::build::watch(&folio).await?;
            }
        }

        Commands::List {
            r#type,
            category,
            tag,
            featured,
        } => {
            let kind: Kind = r#type.parse()?;
            let filter = ListFilter {
                category: category.as_deref().map(str::parse::<PostCategory>).transpose()?,
                tag,
                featured,
            };
            folio_rs::commands::list::run(&folio, kind, &filter)?;
        }

        Commands::Show {
            r#type,
            slug,
            excerpt,
        } => {
            let kind: Kind = r#type.parse()?;
            folio_rs::commands::show::run(&folio, kind, &slug, excerpt)?;
        }

        Commands::New {
            r#type,
            title,
            category,
        } => {
            let kind: Kind = r#type.parse()?;
            let category: PostCategory = category.parse()?;
            let path = folio_rs::commands::new::create(&folio, kind, &title, category)?;
            println!("Created: {:?}", path);
        }

        Commands::Check => {
            folio_rs::commands::check::run(&folio)?;
        }

        Commands::Serve { port, ip, r#static } => {
            tracing::info!("Building pages...");
            folio_rs::commands::build::run(&folio)?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio_rs::server::start(&folio, &ip, port, !r#static).await?;
        }

        Commands::Clean => {
            folio.clean()?;
            println!("Cleaned successfully!");
        }
    }

    Ok(())
}
