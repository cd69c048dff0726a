//! 🔧 App Configuration: the sacred TOML-to-struct pipeline.
//!
//! 🏗️ Powered by Figment, because manually parsing env vars is a form of
//! self-harm that even the borrow checker wouldn't approve of.
//!
//! Credentials arrive here already minted. Turning a service-account key into a bearer token
//! happens outside this crate; we only carry the token to the store.

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::backends::StoreConfig;

/// 🎬 The collection everyone means when they don't say.
pub const DEFAULT_COLLECTION: &str = "movies";

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

/// 📦 The AppConfig: which store, which collection. That's the whole personality.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// 🎬 Collection to read and write. Defaults to `movies`.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// 🗄️ Where the documents live. Required: there is no store anyone would want by accident.
    pub store: StoreConfig,
}

/// 🚀 Load the config from `REEL_*` env vars, plus a TOML file if one was given.
///
/// 📐 DESIGN NOTE:
///   - `None` → env vars only. No file. No assumptions.
///   - `Some(path)` → env vars + TOML file, merged. TOML wins on conflicts.
///   - Nested keys use `__` in env vars: `REEL_STORE__FIRESTORE__ACCESS_TOKEN=...`.
pub fn load_config(config_file_name: Option<&Path>) -> anyhow::Result<AppConfig> {
    info!(
        "🔧 Loading configuration: {:#?}",
        config_file_name.unwrap_or(Path::new(""))
    );

    let config = Figment::new().merge(Env::prefixed("REEL_").split("__"));

    let config = match config_file_name {
        Some(file_name) => config.merge(Toml::file(file_name)),
        None => config,
    };

    let context_msg = match config_file_name {
        Some(path) => format!(
            "💀 Failed to parse configuration from file '{}' and environment variables (REEL_*). \
             The file exists in our hearts, but apparently not in a shape serde recognises.",
            path.display()
        ),
        None => "💀 Failed to parse configuration from environment variables (REEL_*). \
                 No file was provided, so this one's all on the environment. A store is required: \
                 add a reel.toml with a [store.Firestore], [store.File] or [store.InMemory] table."
            .to_string(),
    };

    config.extract().context(context_msg)
}
