use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Runtime settings: built-in defaults, then `lessons.toml`, then `LESSON_*` env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root the catalog's source documents are resolved against.
    pub lessons_dir: PathBuf,
    /// Root the catalog's JSON outputs are resolved against.
    pub output_dir: PathBuf,
    pub dictionary_url: String,
    pub translate_url: String,
    pub lang_pair: String,
    pub timeout_secs: u64,
    /// Pause after every external call.
    pub cooldown_ms: u64,
    /// Paragraphs longer than this are translated sentence by sentence.
    pub chunk_limit: usize,
    pub translate_questions: bool,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("lessons").required(false))
                .add_source(Environment::with_prefix("LESSON")),
        )
    }

    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        builder
            .set_default("lessons_dir", "lessons")?
            .set_default("output_dir", "public/lessons/json")?
            .set_default("dictionary_url", "https://api.dictionaryapi.dev/api/v2/entries/en")?
            .set_default("translate_url", "https://api.mymemory.translated.net/get")?
            .set_default("lang_pair", "en|vi")?
            .set_default("timeout_secs", 10)?
            .set_default("cooldown_ms", 500)?
            .set_default("chunk_limit", 450)?
            .set_default("translate_questions", false)?
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}
