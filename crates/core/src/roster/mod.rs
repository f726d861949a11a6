#![allow(missing_docs)]

//! Force roster engine: unit lookup, point accounting and print grouping.

mod force;
pub mod lookup;
mod models;

pub use force::{parse_point_limit, ForceRoster, RosterError, DEFAULT_POINT_LIMIT};
pub use lookup::{find_by_full_name, find_unit, list_units_by_type, units_of_type};
pub use models::{BudgetStatus, EntryId, ForceEntry, PrintGroup};
