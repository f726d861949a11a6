use std::{fmt, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use parking_lot::RwLock;
use tracing::info;

use crate::{
    models::{UnitDefinition, UnitType},
    roster::lookup,
};

use super::parse::{default_type_for_path, parse_catalog};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the unit catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Local JSON document or generated script.
    File(PathBuf),
    /// HTTP endpoint returning the JSON unit list.
    Url(String),
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Url(url) => f.write_str(url),
        }
    }
}

/// Immutable snapshot of the unit catalog.
///
/// Definitions are reference counted so force entries can share them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    units: Vec<Arc<UnitDefinition>>,
}

impl Catalog {
    pub fn new(units: Vec<UnitDefinition>) -> Self {
        Self {
            units: units.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn units(&self) -> &[Arc<UnitDefinition>] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Units of a user-supplied category, sorted by name.
    pub fn list_units_by_type(&self, raw_type: &str) -> Vec<Arc<UnitDefinition>> {
        lookup::list_units_by_type(&self.units, raw_type)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Units of a canonical category, sorted by name.
    pub fn units_of_type(&self, unit_type: UnitType) -> Vec<Arc<UnitDefinition>> {
        lookup::units_of_type(&self.units, unit_type)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn find_unit(&self, name: &str) -> Option<Arc<UnitDefinition>> {
        lookup::find_unit(&self.units, name).cloned()
    }

    pub fn find_by_full_name(&self, full_name: &str) -> Option<Arc<UnitDefinition>> {
        lookup::find_by_full_name(&self.units, full_name).cloned()
    }

    /// Number of units per category, in [`UnitType::ALL`] order.
    pub fn counts_by_type(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for unit in &self.units {
            counts[unit.unit_type.index()] += 1;
        }
        counts
    }
}

/// Thread-safe loader that caches the most recent catalog snapshot.
#[derive(Clone)]
pub struct CatalogLoader {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    source: CatalogSource,
    cache: Option<Catalog>,
}

impl CatalogLoader {
    pub fn new(source: CatalogSource) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                source,
                cache: None,
            })),
        }
    }

    pub fn source(&self) -> CatalogSource {
        self.inner.read().source.clone()
    }

    /// Snapshot loaded by the last successful [`CatalogLoader::load`], if any.
    pub fn cached(&self) -> Option<Catalog> {
        self.inner.read().cache.clone()
    }

    /// Point the loader at a new source and drop the cached snapshot.
    pub fn refresh(&self, source: CatalogSource) {
        let mut inner = self.inner.write();
        inner.source = source;
        inner.cache = None;
    }

    /// Drop the cached snapshot so the next load re-reads the source.
    pub fn invalidate(&self) {
        self.inner.write().cache = None;
    }

    /// Return the catalog, reading the source on first use.
    pub async fn load(&self) -> Result<Catalog> {
        if let Some(cached) = self.cached() {
            return Ok(cached);
        }

        let source = self.source();
        let units = match &source {
            CatalogSource::File(path) => {
                let content = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("failed to read catalog {}", path.display()))?;
                parse_catalog(&content, default_type_for_path(path))
                    .with_context(|| format!("failed to parse catalog {}", path.display()))?
            }
            CatalogSource::Url(url) => {
                let content = fetch(url).await?;
                parse_catalog(&content, None)
                    .with_context(|| format!("failed to parse catalog from {url}"))?
            }
        };

        let catalog = Catalog::new(units);
        let counts = catalog.counts_by_type();
        info!(
            source = %source,
            total = catalog.len(),
            vehicles = counts[0],
            protomechs = counts[1],
            battle_armor = counts[2],
            infantry = counts[3],
            "Catalog loaded"
        );

        let mut inner = self.inner.write();
        if inner.source == source {
            inner.cache = Some(catalog.clone());
        }
        Ok(catalog)
    }
}

async fn fetch(url: &str) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("failed to fetch catalog from {url}"))?
        .error_for_status()
        .with_context(|| format!("catalog request to {url} failed"))?;
    response
        .text()
        .await
        .with_context(|| format!("failed to read catalog body from {url}"))
}
