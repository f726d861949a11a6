//! Shared domain models.

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Canonical unit categories offered by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnitType {
    /// Combat and support vehicles.
    Vehicle,
    /// ProtoMechs.
    ProtoMech,
    /// Battle armor squads and points.
    BattleArmor,
    /// Conventional infantry.
    Infantry,
}

impl UnitType {
    /// Every category in display order.
    pub const ALL: [UnitType; 4] = [
        UnitType::Vehicle,
        UnitType::ProtoMech,
        UnitType::BattleArmor,
        UnitType::Infantry,
    ];

    /// Map a raw, possibly misspelled category name onto a canonical value.
    ///
    /// Matching ignores case, whitespace, hyphens and underscores, so
    /// `"Proto-Mech"`, `"PROTOMECH"` and `"protomech"` all resolve to
    /// [`UnitType::ProtoMech`].
    pub fn normalize(raw: &str) -> Option<Self> {
        let key: String = raw
            .trim()
            .chars()
            .filter(|ch| !ch.is_whitespace() && !matches!(ch, '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "vehicle" | "vehicles" | "veh" | "cv" | "sv" => Some(UnitType::Vehicle),
            "protomech" | "protomechs" | "pm" => Some(UnitType::ProtoMech),
            "battlearmor" | "battlearmour" | "ba" => Some(UnitType::BattleArmor),
            "infantry" | "ci" | "conventionalinfantry" => Some(UnitType::Infantry),
            _ => None,
        }
    }

    /// Human readable label, also used as the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            UnitType::Vehicle => "Vehicle",
            UnitType::ProtoMech => "ProtoMech",
            UnitType::BattleArmor => "BattleArmor",
            UnitType::Infantry => "Infantry",
        }
    }

    /// Position within [`UnitType::ALL`].
    pub fn index(self) -> usize {
        match self {
            UnitType::Vehicle => 0,
            UnitType::ProtoMech => 1,
            UnitType::BattleArmor => 2,
            UnitType::Infantry => 3,
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UnitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitType::normalize(s).ok_or_else(|| format!("unknown unit type '{s}'"))
    }
}

impl Serialize for UnitType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for UnitType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        UnitType::normalize(&raw).ok_or_else(|| de::Error::custom(format!("unknown unit type '{raw}'")))
    }
}

/// Experience tier a unit is fielded at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Experience {
    /// Base cost.
    #[default]
    Regular,
    /// Increased cost, charged with ceiling rounding.
    Veteran,
}

impl Experience {
    /// Build from the veteran checkbox state.
    pub fn from_veteran(is_veteran: bool) -> Self {
        if is_veteran {
            Experience::Veteran
        } else {
            Experience::Regular
        }
    }

    /// Whether this is the veteran tier.
    pub fn is_veteran(self) -> bool {
        matches!(self, Experience::Veteran)
    }

    /// Display label used by the force list and the print summary.
    pub fn label(self) -> &'static str {
        match self {
            Experience::Regular => "Regular",
            Experience::Veteran => "Veteran",
        }
    }

    /// The other tier.
    pub fn toggled(self) -> Self {
        Experience::from_veteran(!self.is_veteran())
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A selectable unit, immutable once loaded from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    /// Short name, unique within its category.
    pub name: String,
    /// More specific identifier used to locate the card image.
    pub full_name: String,
    /// Canonical category.
    pub unit_type: UnitType,
    /// Cost when fielded as a regular unit.
    pub regular_point_value: u32,
    /// Cost when fielded as a veteran unit; may be fractional.
    pub veteran_point_value: f64,
}

impl UnitDefinition {
    /// Convenience constructor; `full_name` defaults to `name`.
    pub fn new(
        name: impl Into<String>,
        unit_type: UnitType,
        regular_point_value: u32,
        veteran_point_value: f64,
    ) -> Self {
        let name = name.into();
        Self {
            full_name: name.clone(),
            name,
            unit_type,
            regular_point_value,
            veteran_point_value,
        }
    }

    /// Replace the full name.
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    /// Points charged when this unit joins a force at the given experience.
    ///
    /// Veteran values are rounded up to the next whole point.
    pub fn charged_points(&self, experience: Experience) -> u32 {
        match experience {
            Experience::Regular => self.regular_point_value,
            Experience::Veteran => {
                let value = self.veteran_point_value;
                if value.is_finite() && value > 0.0 {
                    value.ceil() as u32
                } else {
                    0
                }
            }
        }
    }

    /// Identifier used to look up the card image.
    pub fn card_key(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.name
        } else {
            &self.full_name
        }
    }

    /// Catalog label, e.g. `Scorpion (PV: 3/4.2)`.
    pub fn display_name(&self) -> String {
        format!(
            "{} (PV: {}/{})",
            self.name, self.regular_point_value, self.veteran_point_value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_type_spellings() {
        for raw in ["ProtoMech", "PROTOMECH", "Proto-Mech", " protomech ", "Protomechs"] {
            assert_eq!(UnitType::normalize(raw), Some(UnitType::ProtoMech), "{raw}");
        }
        assert_eq!(UnitType::normalize("Battle Armor"), Some(UnitType::BattleArmor));
        assert_eq!(UnitType::normalize("battlearmor"), Some(UnitType::BattleArmor));
        assert_eq!(UnitType::normalize("VEHICLE"), Some(UnitType::Vehicle));
        assert_eq!(UnitType::normalize("Infantry"), Some(UnitType::Infantry));
        assert_eq!(UnitType::normalize("BattleMech"), None);
        assert_eq!(UnitType::normalize(""), None);
    }

    #[test]
    fn unit_type_serde_uses_canonical_label() {
        let json = serde_json::to_string(&UnitType::BattleArmor).unwrap();
        assert_eq!(json, "\"BattleArmor\"");
        let parsed: UnitType = serde_json::from_str("\"Proto-Mech\"").unwrap();
        assert_eq!(parsed, UnitType::ProtoMech);
        assert!(serde_json::from_str::<UnitType>("\"Aerospace\"").is_err());
    }

    #[test]
    fn veteran_cost_rounds_up() {
        let unit = UnitDefinition::new("Scorpion", UnitType::Vehicle, 3, 4.2);
        assert_eq!(unit.charged_points(Experience::Regular), 3);
        assert_eq!(unit.charged_points(Experience::Veteran), 5);

        let half = UnitDefinition::new("Half", UnitType::Vehicle, 3, 4.5);
        assert_eq!(half.charged_points(Experience::Veteran), 5);

        let whole = UnitDefinition::new("Whole", UnitType::Vehicle, 4, 6.0);
        assert_eq!(whole.charged_points(Experience::Veteran), 6);
    }

    #[test]
    fn card_key_prefers_full_name() {
        let unit = UnitDefinition::new("Hauptmann", UnitType::ProtoMech, 8, 12.0)
            .with_full_name("Hauptmann (Standard)");
        assert_eq!(unit.card_key(), "Hauptmann (Standard)");

        let bare = UnitDefinition::new("Elemental", UnitType::BattleArmor, 5, 7.5).with_full_name("");
        assert_eq!(bare.card_key(), "Elemental");
    }

    #[test]
    fn experience_toggles() {
        assert_eq!(Experience::Regular.toggled(), Experience::Veteran);
        assert!(Experience::from_veteran(true).is_veteran());
        assert_eq!(Experience::default(), Experience::Regular);
    }
}
