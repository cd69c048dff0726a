//! 🚀 reel-cli: the front door of the movie dashboard.
//!
//! 📦 Thin wrapper: set up logging, parse args, load config, hand a `Command` to `reel::run`,
//! and make the error readable if it comes back wrong. Like a manager. 🦆

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use reel::form::NewMovie;
use reel::identity::compute_document_id;
use reel::{Command, StoreError};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// 🎬 Browse and grow a movie collection in a document store.
#[derive(Debug, Parser)]
#[command(name = "reel", version, about)]
struct Cli {
    /// 🔧 TOML config file. Defaults to `reel.toml` if it exists, else env vars only.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// 🎬 Override the collection from the config.
    #[arg(long, global = true)]
    collection: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// 📋 Show every movie.
    List,
    /// 🔎 Find movies whose title contains QUERY (case-insensitive).
    Search { query: String },
    /// 🎥 List the distinct directors.
    Directors,
    /// 🎥 Show movies by exactly this director.
    Director { name: String },
    /// ➕ Save a movie. Saving the same four fields again overwrites, never duplicates.
    Insert(MovieFields),
    /// 📊 Total movies, unique directors, unique genres.
    Stats,
    /// 🪪 Print the document id for four fields without touching the store.
    Id(MovieFields),
}

#[derive(Debug, Args)]
struct MovieFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    company: String,
    #[arg(long)]
    director: String,
    #[arg(long)]
    genre: String,
}

impl From<MovieFields> for NewMovie {
    fn from(fields: MovieFields) -> Self {
        NewMovie::new(fields.name, fields.company, fields.director, fields.genre)
    }
}

impl From<Action> for Command {
    fn from(action: Action) -> Self {
        match action {
            Action::List => Command::List,
            Action::Search { query } => Command::Search { query },
            Action::Directors => Command::Directors,
            Action::Director { name } => Command::Director { name },
            Action::Insert(fields) => Command::Insert(fields.into()),
            Action::Stats => Command::Stats,
            Action::Id(fields) => Command::Id(fields.into()),
        }
    }
}

/// 🔧 Pick the config file: the one asked for (which must exist), or `reel.toml` if it's lying
/// around, or nothing at all.
fn resolve_config_path(requested: Option<PathBuf>) -> Result<Option<PathBuf>> {
    match requested {
        Some(path) => {
            let exists = path.try_exists().with_context(|| {
                format!(
                    "💀 Couldn't check whether the configuration file exists. Was checking here: '{}'",
                    path.display()
                )
            })?;
            if !exists {
                anyhow::bail!(
                    "💀 Configuration file '{}' does not exist. If it's a relative path, \
                     try an absolute one; the working directory may not be what you think.",
                    path.display()
                );
            }
            Ok(Some(path))
        }
        None => {
            let fallback = PathBuf::from("reel.toml");
            Ok(fallback.is_file().then_some(fallback))
        }
    }
}

/// 🪪 Commands that answer without a store, and so without a config.
fn answer_offline(command: &Command) -> Option<String> {
    match command {
        Command::Id(movie) => Some(
            compute_document_id(&movie.name, &movie.company, &movie.director, &movie.genre)
                .to_string(),
        ),
        _ => None,
    }
}

/// 🚀 main(), where it all begins.
///
/// 🔧 Steps:
/// 1. Init tracing (so we can see what goes wrong, and when)
/// 2. Parse args
/// 3. Load config
/// 4. Run the command
/// 5. Handle errors (cry, then print a hint)
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = async move {
        let command = Command::from(cli.action);
        if let Some(answer) = answer_offline(&command) {
            println!("{answer}");
            return Ok(());
        }
        let config_path = resolve_config_path(cli.config)?;
        let mut app_config = reel::app_config::load_config(config_path.as_deref())
            .context("💀 In reel-cli, main, we couldn't load the config. Check the file and any REEL_* variables.")?;
        if let Some(collection) = cli.collection {
            app_config.collection = collection;
        }
        reel::run(app_config, command).await
    }
    .await;

    if let Err(err) = result {
        error!("💀 error: {}", err);
        // -- 🧅 peel the onion of sadness, one layer at a time
        let mut the_store_is_ghosting_us = false;
        for cause in err.chain().skip(1) {
            error!("⚠️  cause: {}", cause);
            let unavailable = cause
                .downcast_ref::<StoreError>()
                .is_some_and(StoreError::is_unavailable)
                || cause
                    .downcast_ref::<reel::InsertError>()
                    .is_some_and(|e| matches!(e, reel::InsertError::Store(s) if s.is_unavailable()));
            the_store_is_ghosting_us |= unavailable;
        }

        if the_store_is_ghosting_us {
            error!(
                "🔧 hint: the document store isn't reachable or didn't accept our credentials. \
                Check the URL and project id, refresh the access token, or if you're on the \
                emulator, make sure it's actually running."
            );
        }

        std::process::exit(1);
    }

    Ok(())
}
