//! Unit catalog loading and normalisation.

/// Snapshot type and the cached, source-aware loader.
#[allow(missing_docs)]
pub mod loader;
/// Conversion of raw catalog documents into canonical definitions.
#[allow(missing_docs)]
pub mod parse;

pub use loader::{Catalog, CatalogLoader, CatalogSource};
pub use parse::{default_type_for_path, parse_catalog, CatalogError, MAX_POINT_VALUE, VETERAN_MULTIPLIER};
