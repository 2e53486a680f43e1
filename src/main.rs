//! CLI entry point for posts-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use posts_rs::content::RenderMode;

#[derive(Parser)]
#[command(name = "posts-rs")]
#[command(version)]
#[command(about = "Index and render a directory of Markdown posts", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Override the configured render mode (none, raw_body, rendered_html)
    #[arg(short, long, global = true)]
    mode: Option<RenderMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List posts sorted by date and title
    #[command(alias = "ls")]
    List {
        /// Print summaries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the routing descriptor for every post
    Paths,

    /// Show a single post
    Show {
        /// Post id (file name without extension)
        id: String,

        /// Print the post as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export summaries, paths and posts as JSON files
    #[command(alias = "e")]
    Export {
        /// Output directory, relative to the base directory
        #[arg(short, long, default_value = "data")]
        out: PathBuf,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "posts_rs=debug,info"
    } else {
        "posts_rs=info"
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

    let load = || -> Result<posts_rs::Blog> {
        let mut blog = posts_rs::Blog::new(&base_dir)?;
        if let Some(mode) = cli.mode {
            blog.config.render_mode = mode;
        }
        tracing::debug!("Content directory: {:?}", blog.content_dir);
        Ok(blog)
    };

    match cli.command {
        Commands::List { json } => {
            posts_rs::commands::list::run(&load()?, json)?;
        }

        Commands::Paths => {
            posts_rs::commands::paths::run(&load()?)?;
        }

        Commands::Show { ref id, json } => {
            posts_rs::commands::show::run(&load()?, id, json)?;
        }

        Commands::Export { ref out } => {
            let blog = load()?;
            let out_dir = if out.is_absolute() {
                out.clone()
            } else {
                blog.base_dir.join(out)
            };
            tracing::info!("Exporting posts to {:?}", out_dir);
            let summary = posts_rs::commands::export::run(&blog, &out_dir).await?;
            println!("Exported {} posts", summary.items);
        }

        Commands::Version => {
            println!("posts-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
