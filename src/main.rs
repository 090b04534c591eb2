use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use futures::StreamExt;

use release_tracker::config::{self, AppConfig};
use release_tracker::library::cache::Cache;
use release_tracker::library::clock::SystemClock;
use release_tracker::library::engine::SyncEngine;
use release_tracker::library::error::SyncError;
use release_tracker::library::fetchers::AndroidxFetcher;
use release_tracker::library::settings::Settings;
use release_tracker::library::types::{LibraryRecord, SortOrder, SyncState};
use release_tracker::logging;

#[derive(Parser)]
#[command(name = "release-tracker")]
#[command(version, about = "Track AndroidX library releases and pin your favourites")]
struct Cli {
    /// Configuration file (defaults to config.json in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List cached libraries, fetching the catalog if the cache is empty
    List {
        /// Sort order; also saved as the new default
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        /// Only show libraries whose name contains this text
        #[arg(long, default_value = "")]
        search: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Fetch the latest catalog, keeping pins
    Refresh,
    /// Pin a library
    Pin { name: String },
    /// Unpin a library
    Unpin { name: String },
    /// Show or change the saved sort order
    Sort {
        #[arg(value_enum)]
        order: Option<SortArg>,
    },
    /// Show the date of the last successful refresh
    RefreshDate {
        /// Keep printing each new refresh date
        #[arg(long)]
        follow: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    AToZ,
    ZToA,
    PinnedFirst,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::AToZ => SortOrder::AToZ,
            SortArg::ZToA => SortOrder::ZToA,
            SortArg::PinnedFirst => SortOrder::PinnedFirst,
        }
    }
}

type Engine = SyncEngine<Cache, Settings>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = logging::init(&config::log_path())?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.unwrap_or_else(config::config_path);
    let app_config = AppConfig::load(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    let engine = build_engine(&app_config)?;

    match cli.command {
        Command::List { sort, search, json } => {
            let sort_order = match sort {
                Some(sort) => {
                    let sort_order = sort.into();
                    engine.save_sort_order(sort_order)?;
                    sort_order
                }
                None => engine.sort_order()?,
            };
            let state = SyncState::from_result(engine.get_libraries(sort_order, &search).await);
            print_state(&state, json)?;
        }
        Command::Refresh => {
            engine.refresh_libraries().await?;
            if let Some(date) = engine.refresh_date_stream().next().await {
                println!("Refreshed at {}", date);
            }
        }
        Command::Pin { name } => set_pinned(&engine, &name, true).await?,
        Command::Unpin { name } => set_pinned(&engine, &name, false).await?,
        Command::Sort { order } => match order {
            Some(order) => engine.save_sort_order(order.into())?,
            None => println!("{}", engine.sort_order()?),
        },
        Command::RefreshDate { follow } => {
            let mut dates = engine.refresh_date_stream();
            if follow {
                while let Some(date) = dates.next().await {
                    println!("{}", date);
                }
            } else if let Some(date) = dates.next().await {
                println!("{}", date);
            }
        }
    }

    Ok(())
}

fn build_engine(app_config: &AppConfig) -> anyhow::Result<Engine> {
    let data_dir = config::data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    let db_path = config::db_path();
    let cache = Arc::new(Cache::new(&db_path)?);
    let settings = Arc::new(Settings::new(&db_path)?);
    let fetcher = Arc::new(AndroidxFetcher::from_config(&app_config.catalog)?);

    Ok(SyncEngine::new(cache, settings, fetcher, Arc::new(SystemClock)))
}

async fn set_pinned(engine: &Engine, name: &str, pinned: bool) -> anyhow::Result<()> {
    let library = engine
        .get_libraries(SortOrder::AToZ, name)
        .await?
        .into_iter()
        .find(|library| library.same_name(name))
        .ok_or_else(|| SyncError::NotFound(name.to_string()))?;

    engine.pin_library(&library, pinned).await?;
    Ok(())
}

fn print_state(state: &SyncState, json: bool) -> anyhow::Result<()> {
    match state {
        SyncState::Loading => println!("Loading..."),
        SyncState::Success(libraries) if json => {
            println!("{}", serde_json::to_string_pretty(libraries)?);
        }
        SyncState::Success(libraries) => {
            for library in libraries {
                println!("{}", format_library(library));
            }
        }
        SyncState::Error(message) => anyhow::bail!("{}", message),
    }
    Ok(())
}

fn format_library(library: &LibraryRecord) -> String {
    format!(
        "{} {:<28} stable {:<14} preview {:<18} {}",
        if library.pinned { "*" } else { " " },
        library.name,
        library.stable_version.name,
        library.preview_version.name,
        library.release_date
    )
}
