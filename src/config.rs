use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::format::PriceFormat;

/// Settings for the detail view, read from a TOML file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Origin, optionally with a path prefix, used when building shareable links
    pub site_url: String,
    /// Path of the detail page, appended to the path of `site_url`
    pub property_path: String,
    pub login_path: String,
    pub listings_path: String,
    pub currency_prefix: String,
    /// Suffix after the price of rental listings
    pub rent_period: String,
    /// Carousel transition; navigation is ignored until it finishes
    pub transition_ms: u64,
    /// Shown when a listing has no images of its own
    pub sample_images: Vec<String>,
    pub firestore: Option<FirestoreConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: "https://estatehub.example".to_string(),
            property_path: "/property".to_string(),
            login_path: "/login".to_string(),
            listings_path: "/properties".to_string(),
            currency_prefix: "Rs.".to_string(),
            rent_period: "month".to_string(),
            transition_ms: 500,
            sample_images: vec![
                "https://images.estatehub.example/samples/exterior.jpg".to_string(),
                "https://images.estatehub.example/samples/living-room.jpg".to_string(),
                "https://images.estatehub.example/samples/bedroom.jpg".to_string(),
            ],
            firestore: None,
        }
    }
}

/// Connection settings for the Firestore REST API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub database: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database: "(default)".to_string(),
            api_key: None,
            base_url: "https://firestore.googleapis.com/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("Failed to parse TOML")?;
        if config.sample_images.is_empty() {
            anyhow::bail!("sample_images must list at least one image");
        }
        if let Some(firestore) = &config.firestore {
            if firestore.project_id.trim().is_empty() {
                anyhow::bail!("firestore.project_id is required");
            }
        }
        Ok(config)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn price_format(&self) -> PriceFormat {
        PriceFormat {
            currency_prefix: self.currency_prefix.clone(),
            rent_period: self.rent_period.clone(),
        }
    }
}
