//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_rs::commands::list::ListKind;
use folio_rs::config::ProviderKind;
use folio_rs::Folio;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "A static portfolio and blog generator with pluggable content providers", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Content provider to use instead of the configured one
    #[arg(short = 'P', long, global = true, value_enum)]
    provider: Option<ProviderKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new post (filesystem provider)
    New {
        /// Title of the new post
        title: String,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate,

    /// Generate, then serve the site locally
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Clean the public folder
    Clean,

    /// List posts or categories
    List {
        #[arg(value_enum, default_value = "posts")]
        r#type: ListKind,
    },

    /// Show one post by slug
    Show {
        slug: String,
    },

    /// Display version information
    Version,
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

    let load = || -> Result<Folio> {
        let mut folio = Folio::new(&base_dir)?;
        if let Some(kind) = cli.provider {
            folio.override_provider(kind);
        }
        Ok(folio)
    };

    match cli.command {
        Commands::New { title } => {
            let folio = load()?;
            let path = folio.new_post(&title)?;
            println!("Created: {:?}", path);
        }

        Commands::Generate => {
            let folio = load()?;
            tracing::info!("Generating static files...");
            folio.generate().await?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip, open } => {
            let folio = load()?;

            // Generate first
            tracing::info!("Generating static files...");
            folio.generate().await?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio_rs::server::start(&folio, &ip, port, open).await?;
        }

        Commands::Clean => {
            let folio = load()?;
            tracing::info!("Cleaning public folder...");
            folio.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let folio = load()?;
            let provider = folio.provider()?;
            folio_rs::commands::list::run(provider.as_ref(), r#type).await?;
        }

        Commands::Show { slug } => {
            let folio = load()?;
            let provider = folio.provider()?;
            folio_rs::commands::show::run(provider.as_ref(), &slug).await?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_server_port_and_provider_flags() {
        let cli = Cli::try_parse_from(["folio", "server", "-p", "8080", "-P", "strapi"]).unwrap();
        assert_eq!(cli.provider, Some(ProviderKind::Strapi));
        match cli.command {
            Commands::Server { port, .. } => assert_eq!(port, 8080),
            _ => panic!("expected server command"),
        }
    }

    #[test]
    fn test_list_defaults_to_posts() {
        let cli = Cli::try_parse_from(["folio", "--provider", "contentful", "list"]).unwrap();
        assert_eq!(cli.provider, Some(ProviderKind::Contentful));
        assert!(matches!(
            cli.command,
            Commands::List {
                r#type: ListKind::Posts
            }
        ));
    }
}
