use std::{borrow::Borrow, cmp::Ordering};

use crate::models::{UnitDefinition, UnitType};

/// Catalog entries of the requested category, sorted by name.
///
/// `raw_type` comes straight from user input and is normalized first; an
/// unrecognized category yields an empty list rather than an error.
pub fn list_units_by_type<'a, U>(catalog: &'a [U], raw_type: &str) -> Vec<&'a U>
where
    U: Borrow<UnitDefinition>,
{
    let Some(unit_type) = UnitType::normalize(raw_type) else {
        return Vec::new();
    };
    units_of_type(catalog, unit_type)
}

/// Same as [`list_units_by_type`] for an already canonical category.
pub fn units_of_type<U>(catalog: &[U], unit_type: UnitType) -> Vec<&U>
where
    U: Borrow<UnitDefinition>,
{
    let mut units: Vec<&U> = catalog
        .iter()
        .filter(|unit| definition(*unit).unit_type == unit_type)
        .collect();
    units.sort_by(|a, b| compare_names(&definition(*a).name, &definition(*b).name));
    units
}

/// Exact match on `name`; the first match wins when the catalog has duplicates.
pub fn find_unit<'a, U>(catalog: &'a [U], name: &str) -> Option<&'a U>
where
    U: Borrow<UnitDefinition>,
{
    catalog.iter().find(|unit| definition(*unit).name == name)
}

/// Exact match on `full_name`, used when the UI keys its selection by card name.
pub fn find_by_full_name<'a, U>(catalog: &'a [U], full_name: &str) -> Option<&'a U>
where
    U: Borrow<UnitDefinition>,
{
    catalog
        .iter()
        .find(|unit| definition(*unit).full_name == full_name)
}

fn definition<U: Borrow<UnitDefinition>>(unit: &U) -> &UnitDefinition {
    unit.borrow()
}

/// Dictionary-style ordering: case-folded first, then lowercase before
/// uppercase at the first differing letter.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}
