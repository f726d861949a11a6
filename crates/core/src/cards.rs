//! Card image resolution with placeholder fallback.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::models::UnitDefinition;

/// Default card image extension.
pub const DEFAULT_CARD_EXTENSION: &str = "gif";

/// Display information for one unit card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardImage {
    /// Image on disk, or the placeholder image when the card is missing.
    pub path: PathBuf,
    /// Caption shown with the image.
    pub label: String,
    /// True when the real card could not be found.
    pub placeholder: bool,
}

/// Resolves unit cards from a directory of images.
///
/// The directory is indexed once, case-insensitively by file stem, and the
/// index is reused until [`CardResolver::refresh`] is called.
#[derive(Clone)]
pub struct CardResolver {
    cards_dir: PathBuf,
    extension: String,
    placeholder: PathBuf,
    index: Arc<RwLock<Option<HashMap<String, PathBuf>>>>,
}

impl CardResolver {
    /// Create a resolver for `cards_dir` using `placeholder` for missing cards.
    pub fn new(cards_dir: impl Into<PathBuf>, placeholder: impl Into<PathBuf>) -> Self {
        Self {
            cards_dir: cards_dir.into(),
            extension: DEFAULT_CARD_EXTENSION.to_string(),
            placeholder: placeholder.into(),
            index: Arc::new(RwLock::new(None)),
        }
    }

    /// Use a different image extension (without the leading dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_lowercase();
        self
    }

    /// Directory searched for card images.
    pub fn cards_dir(&self) -> &Path {
        &self.cards_dir
    }

    /// Image used when a card is missing.
    pub fn placeholder(&self) -> &Path {
        &self.placeholder
    }

    /// Drop the directory index so new or removed images are picked up.
    pub fn refresh(&self) {
        *self.index.write() = None;
    }

    /// Number of card images found in the directory.
    pub fn indexed_count(&self) -> usize {
        self.ensure_index();
        self.index.read().as_ref().map(HashMap::len).unwrap_or(0)
    }

    /// Path the card would have if present: `<cards_dir>/<card key>.<ext>`.
    pub fn expected_path(&self, unit: &UnitDefinition) -> PathBuf {
        self.cards_dir
            .join(format!("{}.{}", unit.card_key(), self.extension))
    }

    /// Resolve the card for `unit`, substituting the placeholder when missing.
    pub fn resolve(&self, unit: &UnitDefinition) -> CardImage {
        self.ensure_index();
        let found = {
            let index = self.index.read();
            index.as_ref().and_then(|index| {
                index
                    .get(&unit.card_key().to_lowercase())
                    .or_else(|| index.get(&unit.name.to_lowercase()))
                    .cloned()
            })
        };

        match found {
            Some(path) => CardImage {
                path,
                label: unit.card_key().to_string(),
                placeholder: false,
            },
            None => {
                debug!(unit = %unit.name, card = unit.card_key(), "Card image missing; using placeholder");
                CardImage {
                    path: self.placeholder.clone(),
                    label: format!("{} (card missing)", unit.name),
                    placeholder: true,
                }
            }
        }
    }

    fn ensure_index(&self) {
        if self.index.read().is_some() {
            return;
        }
        let built = build_index(&self.cards_dir, &self.extension);
        let mut index = self.index.write();
        if index.is_none() {
            *index = Some(built);
        }
    }
}

fn build_index(root: &Path, extension: &str) -> HashMap<String, PathBuf> {
    let mut index = HashMap::new();
    if !root.is_dir() {
        warn!("Card directory {} not found", root.display());
        return index;
    }

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable card entry: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let matches_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if !matches_extension {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            index
                .entry(stem.to_lowercase())
                .or_insert_with(|| path.to_path_buf());
        }
    }
    debug!(root = %root.display(), cards = index.len(), "Card directory indexed");
    index
}
