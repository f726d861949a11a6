#![warn(clippy::all, missing_docs)]

//! Core domain logic for the mulforce roster builder.
//!
//! This crate hosts the unit data model, catalog loading, the force
//! roster engine, card image resolution and print composition used by
//! the terminal UI and any future frontends.

pub mod cards;
pub mod catalog;
pub mod config;
pub mod models;
pub mod print;
pub mod roster;

pub use cards::{CardImage, CardResolver};
pub use catalog::{Catalog, CatalogLoader, CatalogSource};
pub use config::AppConfig;
pub use models::{Experience, UnitDefinition, UnitType};
pub use print::{PrintDocument, PrintJob};
pub use roster::{BudgetStatus, EntryId, ForceEntry, ForceRoster, PrintGroup, RosterError};
