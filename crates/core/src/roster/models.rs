use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::models::{Experience, UnitDefinition};

/// Stable identifier assigned to a force entry when it is created.
///
/// Identifiers are never reused within a roster, so a stale id held by the
/// UI after a removal resolves to nothing instead of a different unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(u64);

impl EntryId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit added to the force.
///
/// The charged points are computed once at creation and never recomputed,
/// so later catalog edits cannot shift the roster total.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceEntry {
    id: EntryId,
    unit: Arc<UnitDefinition>,
    experience: Experience,
    charged_points: u32,
}

impl ForceEntry {
    pub(crate) fn new(id: EntryId, unit: Arc<UnitDefinition>, experience: Experience) -> Self {
        let charged_points = unit.charged_points(experience);
        Self {
            id,
            unit,
            experience,
            charged_points,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn unit(&self) -> &UnitDefinition {
        &self.unit
    }

    /// Shared handle to the catalog definition.
    pub fn unit_handle(&self) -> Arc<UnitDefinition> {
        Arc::clone(&self.unit)
    }

    pub fn experience(&self) -> Experience {
        self.experience
    }

    pub fn is_veteran(&self) -> bool {
        self.experience.is_veteran()
    }

    pub fn charged_points(&self) -> u32 {
        self.charged_points
    }

    /// Force list label, e.g. `Scorpion (Veteran) - 5 PV`.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}) - {} PV",
            self.unit.name,
            self.experience.label(),
            self.charged_points
        )
    }
}

/// Point total measured against the configured limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub total: u32,
    pub limit: u32,
    pub over_budget: bool,
    /// Points above the limit; zero when within budget.
    pub overage: u32,
}

impl BudgetStatus {
    pub fn new(total: u32, limit: u32) -> Self {
        Self {
            total,
            limit,
            over_budget: total > limit,
            overage: total.saturating_sub(limit),
        }
    }

    /// Points still available before the limit is exceeded.
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.total)
    }
}

/// One row of the print summary: every entry sharing a unit name and experience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintGroup {
    pub name: String,
    pub experience: Experience,
    pub points_each: u32,
    pub count: usize,
}

impl PrintGroup {
    pub fn subtotal(&self) -> u32 {
        self.points_each.saturating_mul(self.count as u32)
    }
}
