#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the course portal.
//!
//! Every read command warm-starts from the snapshot cache, then (unless
//! `--offline`) revalidates against the configured feed before printing.
//! With no subcommand, an interactive menu is shown.

mod commands;
mod interactive;
mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use course_portal::config::PortalConfig;
use course_portal::route::Route;
use course_portal::search::ResourceFilter;
use course_portal::view::ViewOptions;

use crate::session::{Session, feed_source};

#[derive(Parser)]
#[command(name = "course_portal", about = "Browse lecture notes and past papers by module")]
struct Cli {
    /// Path to a TOML config file (overrides `COURSE_PORTAL_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Use cached data only; never contact the feed
    #[arg(long, global = true)]
    offline: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the feed and replace the cached catalog
    Sync {
        /// Read the feed from a local CSV file
        #[arg(long, conflicts_with = "url")]
        file: Option<PathBuf>,
        /// Fetch the feed from this URL instead of the configured one
        #[arg(long)]
        url: Option<String>,
    },
    /// List modules
    Modules {
        /// Only modules whose code, name, description or file titles match
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Show one module's files
    Module {
        /// Module id (e.g., "cs101", "dyn-ee201")
        id: String,
        /// Only files whose title matches
        #[arg(long, short)]
        query: Option<String>,
        /// File type: all, notes or past-papers
        #[arg(long = "type", short, default_value = "all")]
        filter: ResourceFilter,
    },
    /// Show the most recently added files
    Recent,
    /// Search file titles across all modules
    Search {
        /// Text to search for
        query: String,
        /// File type: all, notes or past-papers
        #[arg(long = "type", short, default_value = "all")]
        filter: ResourceFilter,
    },
    /// Render a page by its hash route (e.g., "#/module/cs101")
    View {
        /// Route such as `#/home`, `#/modules`, `#/about`, `#/module/{id}`
        route: String,
    },
    /// Print a share link for a module
    Share {
        /// Module id
        id: String,
    },
    /// Resolve a file's download link
    Download {
        /// Module id
        module_id: String,
        /// File id within the module (e.g., "f-3")
        resource_id: String,
    },
    /// Print the direct-download and viewer forms of a share URL
    Canonicalize {
        /// Share URL
        url: String,
    },
    /// List the seeded modules
    Seeds,
    /// Remove the cached snapshot
    ClearCache,
}

impl Commands {
    /// Whether the command shows catalog data that should be revalidated.
    const fn reads_catalog(&self) -> bool {
        matches!(
            self,
            Self::Modules { .. }
                | Self::Module { .. }
                | Self::Recent
                | Self::Search { .. }
                | Self::View { .. }
                | Self::Share { .. }
                | Self::Download { .. }
        )
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = course_portal_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = PortalConfig::load(cli.config.as_deref())?;
    log::debug!("Config: {config:?}");

    let Some(command) = cli.command else {
        let session = Session::open(config, multi);
        return interactive::run(session, cli.offline).await;
    };

    // Commands that never touch the catalog.
    match &command {
        Commands::Canonicalize { url } => {
            commands::canonicalize(url);
            return Ok(());
        }
        Commands::Seeds => {
            commands::seeds();
            return Ok(());
        }
        _ => {}
    }

    let mut session = Session::open(config, multi);
    if command.reads_catalog() && !cli.offline {
        session.refresh().await;
    }

    match command {
        Commands::Sync { file, url } => {
            let Some(source) = feed_source(file, url.as_deref(), &session.config)? else {
                return Err(
                    "No feed configured: pass --file or --url, or set COURSE_PORTAL_FEED_URL"
                        .into(),
                );
            };
            session.sync(source.as_ref()).await?;
        }
        Commands::Modules { query } => {
            let options = ViewOptions {
                query: query.unwrap_or_default(),
                ..ViewOptions::default()
            };
            commands::view(&session, &Route::Modules, &options);
        }
        Commands::Module { id, query, filter } => {
            let options = ViewOptions {
                query: query.unwrap_or_default(),
                filter,
            };
            commands::view(&session, &Route::Module(id), &options);
        }
        Commands::Recent => commands::recent(&session),
        Commands::Search { query, filter } => commands::search(&session, &query, filter),
        Commands::View { route } => {
            commands::view(&session, &Route::parse(&route), &ViewOptions::default());
        }
        Commands::Share { id } => commands::share(&session, &id)?,
        Commands::Download {
            module_id,
            resource_id,
        } => commands::download(&session, &module_id, &resource_id).await?,
        Commands::ClearCache => commands::clear_cache(&session)?,
        Commands::Canonicalize { .. } | Commands::Seeds => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn module_type_flag_parses_filter() {
        let cli = Cli::try_parse_from(["course_portal", "module", "cs101", "--type", "past-papers"])
            .unwrap();
        let Some(Commands::Module { id, filter, query }) = cli.command else {
            panic!("expected module command");
        };
        assert_eq!(id, "cs101");
        assert_eq!(filter, ResourceFilter::PastPapers);
        assert!(query.is_none());
    }

    #[test]
    fn sync_rejects_file_and_url_together() {
        assert!(
            Cli::try_parse_from(["course_portal", "sync", "--file", "a.csv", "--url", "https://x"])
                .is_err()
        );
    }

    #[test]
    fn no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["course_portal", "--offline"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.offline);
    }

    #[test]
    fn only_catalog_commands_revalidate() {
        assert!(Commands::Recent.reads_catalog());
        assert!(!Commands::Seeds.reads_catalog());
        assert!(!Commands::ClearCache.reads_catalog());
        assert!(
            !Commands::Sync {
                file: None,
                url: None
            }
            .reads_catalog()
        );
    }
}
