use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::models::{UnitDefinition, UnitType};

/// Cost multiplier applied when a record carries no explicit veteran value.
pub const VETERAN_MULTIPLIER: f64 = 1.5;

/// Largest point value accepted from a catalog record; larger values are clamped.
pub const MAX_POINT_VALUE: f64 = 10_000.0;

const NAME_KEYS: &[&str] = &["Name", "name"];
const FULL_NAME_KEYS: &[&str] = &["FullName", "fullName", "full_name"];
const TYPE_KEYS: &[&str] = &["UnitType", "unitType", "unit_type", "Type", "type"];
const PV_KEYS: &[&str] = &["PV", "pv"];
const REGULAR_KEYS: &[&str] = &["RegPV", "regPV", "reg_pv", "regular_point_value"];
const VETERAN_KEYS: &[&str] = &["VetPV", "vetPV", "vet_pv", "veteran_point_value"];

/// Faults that make a whole catalog document unusable.
///
/// Individual bad records never produce these; they are skipped with a warning.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog document does not contain a list of units")]
    UnexpectedShape,
    #[error("unable to locate unit data inside script")]
    MissingScriptData,
}

/// Parse a catalog document into canonical unit definitions.
///
/// Accepts a JSON array, an object with a `units` array, or a generated
/// script such as `const unitData = [ ... ];`. Records without a type fall
/// back to `default_type` when one is given.
pub fn parse_catalog(
    content: &str,
    default_type: Option<UnitType>,
) -> Result<Vec<UnitDefinition>, CatalogError> {
    let payload = extract_payload(content)?;
    let document: Value = serde_json::from_str(&sanitize_nan(payload))?;

    let records = match document {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("units") {
            Some(Value::Array(records)) => records,
            _ => return Err(CatalogError::UnexpectedShape),
        },
        _ => return Err(CatalogError::UnexpectedShape),
    };

    let units = records
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| match record {
            Value::Object(fields) => parse_record(idx, fields, default_type),
            _ => {
                warn!(index = idx, "Skipping catalog record that is not an object");
                None
            }
        })
        .collect();
    Ok(units)
}

/// Guess a default unit type from a catalog file name such as
/// `MULOutput - Vehicles.csv`.
pub fn default_type_for_path(path: &Path) -> Option<UnitType> {
    let stem = path.file_stem()?.to_str()?;
    let key: String = stem
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if key.contains("protomech") {
        Some(UnitType::ProtoMech)
    } else if key.contains("battlearmor") || key.contains("battlearmour") {
        Some(UnitType::BattleArmor)
    } else if key.contains("infantry") {
        Some(UnitType::Infantry)
    } else if key.contains("vehicle") {
        Some(UnitType::Vehicle)
    } else {
        None
    }
}

fn extract_payload(content: &str) -> Result<&str, CatalogError> {
    static SCRIPT_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?s)(?:const|let|var)\s+[A-Za-z_$][\w$]*\s*=\s*(.*?)\s*;?\s*$")
            .expect("invalid script regex")
    });

    let trimmed = content.trim_start_matches('\u{feff}').trim();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return Ok(trimmed);
    }
    SCRIPT_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(CatalogError::MissingScriptData)
}

/// Python's JSON writer emits bare `NaN` for blank spreadsheet cells.
fn sanitize_nan(payload: &str) -> String {
    static NAN_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r":\s*-?NaN\b").expect("invalid NaN regex"));
    NAN_RE.replace_all(payload, ": null").into_owned()
}

fn parse_record(
    idx: usize,
    fields: &Map<String, Value>,
    default_type: Option<UnitType>,
) -> Option<UnitDefinition> {
    let Some(name) = text_field(fields, NAME_KEYS) else {
        warn!(index = idx, "Skipping catalog record without a name");
        return None;
    };

    let raw_type = text_field(fields, TYPE_KEYS);
    let unit_type = match raw_type.as_deref().and_then(UnitType::normalize) {
        Some(unit_type) => unit_type,
        None => match default_type {
            Some(unit_type) => unit_type,
            None => {
                warn!(
                    unit = %name,
                    raw_type = raw_type.as_deref().unwrap_or(""),
                    "Skipping catalog record with unknown unit type"
                );
                return None;
            }
        },
    };

    let full_name = text_field(fields, FULL_NAME_KEYS).unwrap_or_else(|| name.clone());

    let pv = number_field(fields, PV_KEYS);
    let regular = number_field(fields, REGULAR_KEYS).or(pv);
    let veteran = number_field(fields, VETERAN_KEYS)
        .or_else(|| pv.map(|value| value * VETERAN_MULTIPLIER))
        .or_else(|| regular.map(|value| value * VETERAN_MULTIPLIER));

    let regular = match regular {
        Some(value) => checked_points(&name, "regular", value),
        None => {
            warn!(unit = %name, "Catalog record has no point value; using 0");
            0.0
        }
    };
    let regular_point_value = if regular.fract() != 0.0 {
        let rounded = regular.round();
        warn!(unit = %name, value = regular, rounded, "Rounding fractional regular point value");
        rounded as u32
    } else {
        regular as u32
    };
    let veteran_point_value = veteran
        .map(|value| checked_points(&name, "veteran", value))
        .unwrap_or(0.0);

    Some(UnitDefinition {
        name,
        full_name,
        unit_type,
        regular_point_value,
        veteran_point_value,
    })
}

fn checked_points(name: &str, label: &str, value: f64) -> f64 {
    if !value.is_finite() || value < 0.0 {
        warn!(unit = %name, kind = label, value, "Invalid point value; using 0");
        0.0
    } else if value > MAX_POINT_VALUE {
        warn!(
            unit = %name,
            kind = label,
            value,
            max = MAX_POINT_VALUE,
            "Point value out of range; clamping"
        );
        MAX_POINT_VALUE
    } else {
        value
    }
}

fn field<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| !value.is_null())
}

fn text_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    let value = field(fields, keys)?;
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    Some(text).filter(|text| !text.is_empty())
}

fn number_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    match field(fields, keys)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_field_spellings() {
        let content = r#"[
            {"Name": "Scorpion", "FullName": "Scorpion Light Tank", "UnitType": "VEHICLE", "RegPV": 3, "VetPV": 4.2},
            {"name": "Minotaur", "Type": "Proto-Mech", "PV": 8},
            {"Name": "Elemental", "UnitType": "Battle Armor", "RegPV": "5", "VetPV": "7.5"}
        ]"#;
        let units = parse_catalog(content, None).expect("valid catalog");
        assert_eq!(units.len(), 3);

        assert_eq!(units[0].full_name, "Scorpion Light Tank");
        assert_eq!(units[0].unit_type, UnitType::Vehicle);
        assert_eq!(units[0].veteran_point_value, 4.2);

        assert_eq!(units[1].full_name, "Minotaur");
        assert_eq!(units[1].unit_type, UnitType::ProtoMech);
        assert_eq!(units[1].regular_point_value, 8);
        assert_eq!(units[1].veteran_point_value, 12.0);

        assert_eq!(units[2].unit_type, UnitType::BattleArmor);
        assert_eq!(units[2].regular_point_value, 5);
    }

    #[test]
    fn reads_generated_script() {
        let content = r#"// Auto-generated from multiple CSV files
const unitData = [
  {"UnitType": "Vehicle", "Name": "Harasser", "PV": 5, "Specials": NaN},
  {"UnitType": "Protomech", "Name": "Satyr", "PV": 3, "RegPV": 3, "VetPV": 4.5}
];
"#;
        let units = parse_catalog(content, None).expect("script parses");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].name, "Harasser");
        assert_eq!(units[0].veteran_point_value, 7.5);
        assert_eq!(units[1].veteran_point_value, 4.5);
    }

    #[test]
    fn accepts_units_object() {
        let content = r#"{"units": [{"Name": "Zephyr", "UnitType": "vehicle", "PV": 4}]}"#;
        let units = parse_catalog(content, None).expect("object parses");
        assert_eq!(units.len(), 1);

        let err = parse_catalog(r#"{"other": []}"#, None).unwrap_err();
        assert!(matches!(err, CatalogError::UnexpectedShape));
        let err = parse_catalog("nothing to see here", None).unwrap_err();
        assert!(matches!(err, CatalogError::MissingScriptData));
    }

    #[test]
    fn skips_and_repairs_bad_records() {
        let content = r#"[
            {"Name": "", "UnitType": "Vehicle", "PV": 3},
            {"Name": "Mystery", "UnitType": "Aerospace", "PV": 3},
            {"Name": "Broken", "UnitType": "Vehicle", "RegPV": -2, "VetPV": "abc"},
            {"Name": "Fraction", "UnitType": "Vehicle", "RegPV": 2.6, "VetPV": 3.9},
            {"Name": "Untyped", "PV": 2},
            42
        ]"#;
        let units = parse_catalog(content, None).expect("document parses");
        let names: Vec<_> = units.iter().map(|unit| unit.name.as_str()).collect();
        assert_eq!(names, vec!["Broken", "Fraction"]);

        assert_eq!(units[0].regular_point_value, 0);
        assert_eq!(units[0].veteran_point_value, 0.0);
        assert_eq!(units[1].regular_point_value, 3);
    }

    #[test]
    fn clamps_oversized_point_values() {
        let content = r#"[
            {"Name": "Big", "UnitType": "Vehicle", "RegPV": 1e10, "VetPV": 1e12},
            {"Name": "Huge", "UnitType": "Vehicle", "PV": 99999}
        ]"#;
        let units = parse_catalog(content, None).expect("document parses");
        assert_eq!(units[0].regular_point_value, MAX_POINT_VALUE as u32);
        assert_eq!(units[0].veteran_point_value, MAX_POINT_VALUE);
        assert_eq!(units[1].regular_point_value, MAX_POINT_VALUE as u32);
        assert_eq!(units[1].veteran_point_value, MAX_POINT_VALUE);
    }

    #[test]
    fn default_type_fills_blank_types() {
        let content = r#"[{"Name": "Untyped", "PV": 2, "UnitType": null}]"#;
        let units = parse_catalog(content, Some(UnitType::ProtoMech)).expect("parses");
        assert_eq!(units[0].unit_type, UnitType::ProtoMech);
    }

    #[test]
    fn infers_type_from_file_name() {
        assert_eq!(
            default_type_for_path(Path::new("MULOutput - Vehicles.csv")),
            Some(UnitType::Vehicle)
        );
        assert_eq!(
            default_type_for_path(Path::new("data/MULOutput - Protomechs.json")),
            Some(UnitType::ProtoMech)
        );
        assert_eq!(
            default_type_for_path(Path::new("Battle Armor_unit_list.json")),
            Some(UnitType::BattleArmor)
        );
        assert_eq!(default_type_for_path(Path::new("units.js")), None);
    }
}
