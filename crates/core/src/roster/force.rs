use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::models::{Experience, UnitDefinition};

use super::models::{BudgetStatus, EntryId, ForceEntry, PrintGroup};

/// Point limit applied to a fresh roster.
pub const DEFAULT_POINT_LIMIT: u32 = 32;

/// Faults raised by roster mutations.
///
/// These indicate the caller acted on a stale view of the roster; they are
/// reported rather than clamped so integration bugs surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("force entry index {index} out of range (force has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("force entry {0} is not part of the roster")]
    UnknownEntry(EntryId),
}

/// The player's force for one session.
///
/// All mutation goes through the methods below; the point total is always
/// derived from the entry list and never stored on its own.
#[derive(Debug, Clone)]
pub struct ForceRoster {
    entries: Vec<ForceEntry>,
    point_limit: u32,
    next_id: u64,
}

impl Default for ForceRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceRoster {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_POINT_LIMIT)
    }

    pub fn with_limit(point_limit: u32) -> Self {
        Self {
            entries: Vec::new(),
            point_limit,
            next_id: 1,
        }
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[ForceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&ForceEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Current display position of an entry.
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == id)
    }

    pub fn point_limit(&self) -> u32 {
        self.point_limit
    }

    pub fn set_point_limit(&mut self, limit: u32) {
        self.point_limit = limit;
    }

    /// Append a resolved unit to the force and return its identifier.
    pub fn add(&mut self, unit: Arc<UnitDefinition>, experience: Experience) -> EntryId {
        let id = EntryId::new(self.next_id);
        self.next_id += 1;
        let entry = ForceEntry::new(id, unit, experience);
        debug!(
            %id,
            unit = %entry.unit().name,
            experience = %experience,
            points = entry.charged_points(),
            "Unit added to force"
        );
        self.entries.push(entry);
        id
    }

    /// Remove the entry at `index`; later entries shift down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<ForceEntry, RosterError> {
        if index >= self.entries.len() {
            return Err(RosterError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let entry = self.entries.remove(index);
        debug!(id = %entry.id(), index, "Unit removed from force");
        Ok(entry)
    }

    /// Remove an entry by its stable identifier.
    pub fn remove(&mut self, id: EntryId) -> Result<ForceEntry, RosterError> {
        let index = self.position(id).ok_or(RosterError::UnknownEntry(id))?;
        self.remove_at(index)
    }

    /// Drop every entry. The point limit is left untouched.
    pub fn clear(&mut self) {
        debug!(removed = self.entries.len(), "Force cleared");
        self.entries.clear();
    }

    /// Sum of charged points, recomputed from the entries on every call.
    pub fn total_points(&self) -> u32 {
        self.entries
            .iter()
            .map(ForceEntry::charged_points)
            .fold(0u32, u32::saturating_add)
    }

    pub fn budget(&self) -> BudgetStatus {
        BudgetStatus::new(self.total_points(), self.point_limit)
    }

    pub fn is_over_budget(&self) -> bool {
        self.budget().over_budget
    }

    /// Points above the limit, zero when within budget.
    pub fn overage(&self) -> u32 {
        self.budget().overage
    }

    /// Collapse entries sharing a unit name and experience into counted rows,
    /// in first-seen order.
    pub fn group_for_print(&self) -> Vec<PrintGroup> {
        let mut groups: Vec<PrintGroup> = Vec::new();
        for entry in &self.entries {
            let name = &entry.unit().name;
            let experience = entry.experience();
            match groups
                .iter_mut()
                .find(|group| &group.name == name && group.experience == experience)
            {
                Some(group) => group.count += 1,
                None => groups.push(PrintGroup {
                    name: name.clone(),
                    experience,
                    points_each: entry.charged_points(),
                    count: 1,
                }),
            }
        }
        groups
    }
}

/// Parse a point limit typed by the user.
///
/// Blank, non-numeric or zero input falls back to [`DEFAULT_POINT_LIMIT`].
pub fn parse_point_limit(input: &str) -> u32 {
    match input.trim().parse::<u32>() {
        Ok(value) if value > 0 => value,
        _ => DEFAULT_POINT_LIMIT,
    }
}
