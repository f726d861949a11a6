//! Application configuration: built-in defaults, an optional TOML file under
//! the user's config directory, then `MULFORCE_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{catalog::CatalogSource, roster::DEFAULT_POINT_LIMIT};

/// Directory under the user's config root holding `config.toml`.
pub const CONFIG_DIR: &str = "mulforce";
/// Config file name.
pub const CONFIG_FILE: &str = "config.toml";

const DEFAULT_CONFIG_TOML: &str = r#"# mulforce configuration

# Local unit catalog (JSON array, {"units": [...]}, or a generated units.js).
catalog_path = "units.json"

# Fetch the catalog from an endpoint instead of a file.
# catalog_url = "http://localhost:5000/get_units"

# Directory holding card images named after each unit's full name.
cards_dir = "Cards"
card_extension = "gif"
placeholder_card = "Cards/placeholder.png"

# Point limit for a new force and the quick-select presets.
default_point_limit = 32
point_presets = [32, 64, 96]

# Where printouts are written, and how long to wait for card images.
print_dir = "prints"
print_timeout_secs = 10
"#;

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Catalog document on disk.
    pub catalog_path: Option<PathBuf>,
    /// Catalog endpoint; takes precedence over `catalog_path`.
    pub catalog_url: Option<String>,
    /// Directory searched for card images.
    pub cards_dir: PathBuf,
    /// Card image extension.
    pub card_extension: String,
    /// Image shown when a card is missing.
    pub placeholder_card: PathBuf,
    /// Point limit applied to a new force.
    pub default_point_limit: u32,
    /// Quick-select point limits.
    pub point_presets: Vec<u32>,
    /// Output directory for printouts.
    pub print_dir: PathBuf,
    /// Upper bound on waiting for card images before printing.
    pub print_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: Some(PathBuf::from("units.json")),
            catalog_url: None,
            cards_dir: PathBuf::from("Cards"),
            card_extension: "gif".to_string(),
            placeholder_card: PathBuf::from("Cards").join("placeholder.png"),
            default_point_limit: DEFAULT_POINT_LIMIT,
            point_presets: vec![32, 64, 96],
            print_dir: PathBuf::from("prints"),
            print_timeout_secs: 10,
        }
    }
}

impl AppConfig {
    /// Load from the default config file plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from `path` (optional) plus environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("MULFORCE")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("point_presets"),
            )
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        config.normalize();
        Ok(config)
    }

    /// Catalog source implied by the settings; a URL wins over a path.
    pub fn catalog_source(&self) -> CatalogSource {
        match self.catalog_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => CatalogSource::Url(url.to_string()),
            _ => CatalogSource::File(
                self.catalog_path
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("units.json")),
            ),
        }
    }

    /// Card wait timeout as a [`Duration`].
    pub fn print_timeout(&self) -> Duration {
        Duration::from_secs(self.print_timeout_secs)
    }

    fn normalize(&mut self) {
        if self.default_point_limit == 0 {
            self.default_point_limit = DEFAULT_POINT_LIMIT;
        }
        self.point_presets.retain(|preset| *preset > 0);
        if self.point_presets.is_empty() {
            self.point_presets = AppConfig::default().point_presets;
        }
        self.card_extension = self.card_extension.trim_start_matches('.').to_string();
    }
}

/// Default config file location, e.g. `~/.config/mulforce/config.toml`.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the commented default config file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    ensure_default_config_at(config_path())
}

/// Write the commented default config to `path` if it does not exist.
pub fn ensure_default_config_at(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("failed to write default config {}", path.display()))?;
    info!("Wrote default configuration to {}", path.display());
    Ok(())
}
