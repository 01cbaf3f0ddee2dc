//! Configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_ALIGNMENT__MATCHING__TOP_K`).
//! Alignment parameters live under `[alignment]`; every field has a default.
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::chunker::ChunkingConfig;
use crate::error::Error;

pub struct Config {
    figment: Figment,
}

impl Config {
    /// Merge `config.toml`, `config.<env>.toml` (env from `RUST_ENV`,
    /// default `dev`) and `APP_*` variables. Missing files are skipped.
    pub fn load_from(base: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file(base.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(base.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// The `[alignment]` section, defaulted when absent. Not validated:
    /// callers apply their overrides first, then call
    /// [`AlignmentSettings::validate`].
    pub fn alignment(&self) -> anyhow::Result<AlignmentSettings> {
        if self.figment.contains("alignment") {
            self.get::<AlignmentSettings>("alignment")
        } else {
            Ok(AlignmentSettings::default())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    #[default]
    Lexical,
    Embedding,
}

impl FromStr for ScorerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexical" => Ok(Self::Lexical),
            "embedding" | "vector" => Ok(Self::Embedding),
            other => Err(format!("unknown scorer '{other}' (expected lexical or embedding)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub top_k: usize,
    /// Floor for top-k picks; `None` uses the scorer's own default.
    pub min_score: Option<f64>,
    pub scorer: ScorerKind,
    /// Dimensionality of the built-in hashing embedder.
    pub embedding_dim: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self { top_k: 3, min_score: None, scorer: ScorerKind::Lexical, embedding_dim: 256 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentSettings {
    pub chunking: ChunkingConfig,
    pub matching: MatchingConfig,
}

impl AlignmentSettings {
    pub fn validate(&self) -> crate::error::Result<()> {
        self.chunking.validate()?;
        if self.matching.top_k == 0 {
            return Err(Error::InvalidConfig("matching.top_k must be > 0".into()));
        }
        if let Some(min_score) = self.matching.min_score {
            if !min_score.is_finite() {
                return Err(Error::InvalidConfig(format!("matching.min_score must be finite, got {min_score}")));
            }
        }
        if self.matching.embedding_dim == 0 {
            return Err(Error::InvalidConfig("matching.embedding_dim must be > 0".into()));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
