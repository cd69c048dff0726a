//! 🎬 reel: a movie catalog over a document store.
//!
//! Content-addressed ids, a read-everything snapshot with a generation-checked cache, and the
//! handful of views the dashboard needs (title search, director filter, headline numbers).

pub mod access;
pub mod app_config;
pub mod backends;
pub mod cache;
pub mod catalog;
pub mod error;
pub mod form;
pub mod identity;
pub mod records;
pub mod render;
pub mod views;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::app_config::AppConfig;
use crate::backends::{DocumentStore, StoreBackend};
use crate::catalog::MovieCatalog;
use crate::form::NewMovie;
use crate::identity::compute_document_id;

pub use crate::access::{fetch_all, upsert};
pub use crate::error::{InsertError, StoreError, ValidationFailure};
pub use crate::identity::DocumentId;
pub use crate::records::{CollectionSnapshot, MovieRecord, MovieRow};

/// 🎛️ One dashboard interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 📋 Every movie.
    List,
    /// 🔎 Title substring search.
    Search { query: String },
    /// 🎥 The distinct directors on offer.
    Directors,
    /// 🎥 Movies by exactly this director.
    Director { name: String },
    /// ➕ Save a movie.
    Insert(NewMovie),
    /// 📊 Headline numbers.
    Stats,
    /// 🪪 Print the id four fields would be stored under. Doesn't touch the store.
    Id(NewMovie),
}

/// 🚀 Run one command against `catalog` and render the result as text.
///
/// Split from [`run`] so the whole front end can be exercised against any store.
pub async fn execute<S>(
    catalog: &mut MovieCatalog<S>,
    collection: &str,
    command: &Command,
) -> Result<String>
where
    S: DocumentStore,
{
    let output = match command {
        Command::Id(movie) => {
            compute_document_id(&movie.name, &movie.company, &movie.director, &movie.genre)
                .to_string()
        }
        Command::Insert(movie) => {
            let doc_id = catalog
                .insert(collection, movie)
                .await
                .context("💀 Could not save the movie.")?;
            let snapshot = catalog
                .snapshot(collection)
                .await
                .context("💀 Saved the movie, but could not read the collection back.")?;
            format!(
                "✅ Movie saved as {doc_id} ({} movies in '{collection}')",
                render::format_number(snapshot.len() as u64)
            )
        }
        read_only => {
            let snapshot = catalog.snapshot(collection).await.with_context(|| {
                format!("💀 Could not read collection '{collection}' from the store.")
            })?;
            render_view(&snapshot, read_only)
        }
    };
    Ok(output)
}

fn render_view(snapshot: &CollectionSnapshot, command: &Command) -> String {
    match command {
        Command::List => format!(
            "📋 All movies: {}\n{}",
            render::format_number(snapshot.len() as u64),
            render::movies_table(&snapshot.rows)
        ),
        Command::Search { query } => {
            let results = views::search_by_title(snapshot, query);
            format!(
                "🔎 Title results: {}\n{}",
                results.len(),
                render::movies_table(results)
            )
        }
        Command::Directors => {
            let directors = views::distinct_directors(snapshot);
            if directors.is_empty() {
                "🎥 No directors yet.".to_string()
            } else {
                render::directors_table(&directors).to_string()
            }
        }
        Command::Director { name } => {
            let results = views::filter_by_director(snapshot, name);
            format!(
                "🎥 Movies by {name}: {}\n{}",
                results.len(),
                render::movies_table(results)
            )
        }
        Command::Stats => {
            if snapshot.is_empty() && snapshot.skipped.is_empty() {
                "📊 The collection is empty.".to_string()
            } else {
                render::summary_table(&views::summary(snapshot)).to_string()
            }
        }
        Command::Insert(_) | Command::Id(_) => String::new(),
    }
}

/// 🚀 Build the store handle once, run `command`, print what it says.
pub async fn run(app_config: AppConfig, command: Command) -> Result<()> {
    let store = StoreBackend::from_config(&app_config.store)
        .context("💀 Could not set up the document store from the configuration.")?;
    info!(
        "🎬 {} / collection '{}'",
        store.describe(),
        app_config.collection
    );
    if matches!(store, StoreBackend::InMemory(_)) && matches!(command, Command::Insert(_)) {
        warn!("⚠️ saving to an in-memory store; the movie is gone when this process exits");
    }
    let mut catalog = MovieCatalog::new(store);
    let output = execute(&mut catalog, &app_config.collection, &command).await?;
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::InMemoryStore;

    async fn seeded_catalog() -> MovieCatalog<InMemoryStore> {
        let mut catalog = MovieCatalog::new(InMemoryStore::new());
        for (n, c, d, g) in [
            ("Inception", "WB", "Nolan", "SciFi"),
            ("Tenet", "WB", "Nolan", "SciFi"),
            ("Heat", "WB", "Mann", "Crime"),
        ] {
            catalog
                .insert("movies", &NewMovie::new(n, c, d, g))
                .await
                .expect("💀 seeding should not fail");
        }
        catalog
    }

    #[tokio::test]
    async fn the_one_where_search_renders_only_the_hits() {
        let mut catalog = seeded_catalog().await;
        let output = execute(
            &mut catalog,
            "movies",
            &Command::Search {
                query: "incep".into(),
            },
        )
        .await
        .expect("💀 search should render");
        assert!(output.starts_with("🔎 Title results: 1"));
        assert!(output.contains("Inception"));
        assert!(!output.contains("Heat"));
    }

    #[tokio::test]
    async fn the_one_where_a_blank_search_renders_zero() {
        let mut catalog = seeded_catalog().await;
        let output = execute(&mut catalog, "movies", &Command::Search { query: " ".into() })
            .await
            .expect("💀 search should render");
        assert!(output.starts_with("🔎 Title results: 0"));
    }

    #[tokio::test]
    async fn the_one_where_the_director_view_is_exact() {
        let mut catalog = seeded_catalog().await;
        let output = execute(
            &mut catalog,
            "movies",
            &Command::Director {
                name: "Nolan".into(),
            },
        )
        .await
        .expect("💀 filter should render");
        assert!(output.starts_with("🎥 Movies by Nolan: 2"));

        let directors = execute(&mut catalog, "movies", &Command::Directors)
            .await
            .expect("💀 directors should render");
        assert!(directors.contains("Mann") && directors.contains("Nolan"));
    }

    #[tokio::test]
    async fn the_one_where_a_bad_insert_is_an_error_with_a_reason() {
        let mut catalog = seeded_catalog().await;
        let err = execute(
            &mut catalog,
            "movies",
            &Command::Insert(NewMovie::new("Dune", "", "Villeneuve", "")),
        )
        .await
        .expect_err("💀 blank fields must not save");
        let validation = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<InsertError>())
            .expect("💀 the InsertError should be in the chain");
        assert!(matches!(validation, InsertError::Validation(_)));
        assert_eq!(catalog.store().count("movies").await, 3);
    }

    #[tokio::test]
    async fn the_one_where_insert_reports_the_new_total() {
        let mut catalog = seeded_catalog().await;
        let output = execute(
            &mut catalog,
            "movies",
            &Command::Insert(NewMovie::new("Dune", "Legendary", "Villeneuve", "SciFi")),
        )
        .await
        .expect("💀 insert should succeed");
        let expected_id = compute_document_id("Dune", "Legendary", "Villeneuve", "SciFi");
        assert!(output.contains(expected_id.as_str()));
        assert!(output.contains("4 movies"));
    }

    #[tokio::test]
    async fn the_one_where_stats_and_id_need_no_ceremony() {
        let mut catalog = seeded_catalog().await;
        let stats = execute(&mut catalog, "movies", &Command::Stats)
            .await
            .expect("💀 stats should render");
        assert!(stats.contains("Total movies") && stats.contains("Unique genres"));

        let empty = execute(&mut catalog, "nothing-here", &Command::Stats)
            .await
            .expect("💀 stats on an empty collection should render");
        assert_eq!(empty, "📊 The collection is empty.");

        let id = execute(
            &mut catalog,
            "movies",
            &Command::Id(NewMovie::new("Dune", "Legendary", "Villeneuve", "SciFi")),
        )
        .await
        .expect("💀 id is pure");
        assert_eq!(id.len(), identity::DOCUMENT_ID_LEN);
    }
}
