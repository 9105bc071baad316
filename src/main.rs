//! CLI entry point for postshelf

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postshelf::content::ListingOptions;

#[derive(Parser)]
#[command(name = "postshelf")]
#[command(version)]
#[command(about = "Content store and authoring checks for a front-matter blog", long_about = None)]
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
    /// List items, newest first
    #[command(alias = "ls")]
    List {
        /// Include drafts
        #[arg(long)]
        drafts: bool,

        /// Include items dated in the future
        #[arg(long)]
        future: bool,

        /// Show at most this many items
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Print items as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single item
    Show {
        /// Item path, e.g. posts/mvp-tips
        path: String,

        /// Print the body outline instead of the body
        #[arg(short, long)]
        outline: bool,
    },

    /// Check every item for authoring mistakes
    Check {
        /// Re-check whenever content changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Create a new draft
    New {
        /// Title of the new item
        title: String,

        /// Section directory under the content directory
        #[arg(short, long)]
        section: Option<String>,

        /// File name to use instead of one derived from the title
        #[arg(long)]
        slug: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "postshelf=debug,info"
    } else {
        "postshelf=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let site = postshelf::Site::new(&base_dir)?;

    match cli.command {
        Commands::List {
            drafts,
            future,
            limit,
            json,
        } => {
            let defaults = site.config.listing_options();
            let options = ListingOptions::public()
                .with_drafts(drafts || defaults.include_drafts)
                .with_future(future || defaults.include_future)
                .with_limit(limit);
            postshelf::commands::list::run(&site, &options, json)?;
        }

        Commands::Show { path, outline } => {
            postshelf::commands::show::run(&site, &path, outline)?;
        }

        Commands::Check { watch } => {
            if watch {
                postshelf::commands::check::watch(&site).await?;
            } else {
                postshelf::commands::check::run(&site)?;
            }
        }

        Commands::New {
            title,
            section,
            slug,
        } => {
            tracing::info!("Creating new item with title: {}", title);
            postshelf::commands::new::run(&site, &title, section.as_deref(), slug.as_deref())?;
        }
    }

    Ok(())
}
