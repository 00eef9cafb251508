use crate::geo::index::DEFAULT_MAX_DISTANCE_MILES;
use crate::matcher::DEFAULT_SIMILARITY_THRESHOLD;
use crate::model::{ConfigError, Cuisine, ProviderError, Source};
use crate::provider::{ApiKey, CandidateSource, FileSource, HttpSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Names must score strictly above this to count as the same venue.
    pub similarity_threshold: f64,
    /// Farther than this from every center resolves to "Unknown".
    pub neighborhood_radius_miles: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            neighborhood_radius_miles: DEFAULT_MAX_DISTANCE_MILES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub request_delay_ms: u64,
    /// Cuisine used when no rule matches.
    pub default_cuisine: Cuisine,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 250,
            default_cuisine: Cuisine::American,
        }
    }
}

/// Minimum data a candidate from one source must carry to be considered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QualityPolicy {
    pub min_review_count: u32,
    pub require_price: bool,
    pub require_coordinates: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    File {
        source: Source,
        path: PathBuf,
    },
    Http {
        source: Source,
        url: String,
        /// Environment variable holding the API key.
        #[serde(default)]
        api_key_env: Option<String>,
        /// Send the key as this query parameter instead of a bearer token.
        #[serde(default)]
        api_key_param: Option<String>,
    },
}

impl SourceConfig {
    pub fn source(&self) -> Source {
        match self {
            SourceConfig::File { source, .. } | SourceConfig::Http { source, .. } => *source,
        }
    }

    pub fn build(&self) -> Result<Box<dyn CandidateSource>, ProviderError> {
        Ok(match self {
            SourceConfig::File { source, path } => Box::new(FileSource::new(*source, path.clone())),
            SourceConfig::Http {
                source,
                url,
                api_key_env,
                api_key_param,
            } => {
                let api_key = api_key_env.clone().map(|env| match api_key_param {
                    Some(param) => ApiKey::QueryParam {
                        env,
                        param: param.clone(),
                    },
                    None => ApiKey::Bearer { env },
                });
                Box::new(HttpSource::new(*source, url.clone(), api_key)?)
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: String,
    pub matching: MatchingConfig,
    pub pipeline: PipelineConfig,
    /// Per-source quality policy; sources not listed accept everything.
    pub quality: HashMap<Source, QualityPolicy>,
    pub sources: Vec<SourceConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "venues.db".to_string(),
            matching: MatchingConfig::default(),
            pipeline: PipelineConfig::default(),
            quality: HashMap::new(),
            sources: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.matching.similarity_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "matching.similarity_threshold must be in (0, 1], got {}",
                threshold
            )));
        }

        let radius = self.matching.neighborhood_radius_miles;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "matching.neighborhood_radius_miles must be positive, got {}",
                radius
            )));
        }

        if self.pipeline.default_cuisine == Cuisine::Delete {
            return Err(ConfigError::Invalid(
                "pipeline.default_cuisine cannot be the Delete sentinel".to_string(),
            ));
        }

        if self.database_path.trim().is_empty() {
            return Err(ConfigError::Invalid("database_path is empty".to_string()));
        }

        for source in &self.sources {
            if let SourceConfig::Http { url, .. } = source {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::Invalid(format!("source url '{}' is not http(s)", url)));
                }
            }
        }

        Ok(())
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
