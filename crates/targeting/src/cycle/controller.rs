use std::collections::BTreeSet;

use crate::config::TargetingConfig;
use crate::geometry::ROTATION_SLOTS;
use crate::host::EntityId;
use crate::scene::Candidate;

use super::triggers::TriggerStates;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CyclingState {
    index: Option<usize>,
    previous_ids: BTreeSet<EntityId>,
    previous_closest: Option<EntityId>,
    pending_rotation: [bool; ROTATION_SLOTS],
}

impl CyclingState {
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn previous_closest(&self) -> Option<EntityId> {
        self.previous_closest
    }

    pub fn previous_ids(&self) -> &BTreeSet<EntityId> {
        &self.previous_ids
    }

    pub fn pending_rotation(&self) -> [bool; ROTATION_SLOTS] {
        self.pending_rotation
    }

    pub fn mark_rotation_pending(&mut self, slot: usize) {
        if let Some(pending) = self.pending_rotation.get_mut(slot) {
            *pending = true;
        }
    }

    pub fn clear_rotation_pending(&mut self, slot: usize) {
        if let Some(pending) = self.pending_rotation.get_mut(slot) {
            *pending = false;
        }
    }

    pub fn triggers(&self, selection: &[Candidate]) -> TriggerStates {
        let ids: BTreeSet<EntityId> = selection.iter().map(|candidate| candidate.id).collect();
        TriggerStates {
            camera_pending: self.pending_rotation,
            set_changed: ids != self.previous_ids,
            closest_changed: selection.first().map(|candidate| candidate.id)
                != self.previous_closest,
        }
    }

    pub fn next_index(
        &self,
        selection: &[Candidate],
        reset: bool,
        current_target: Option<EntityId>,
        config: &TargetingConfig,
    ) -> Option<usize> {
        let closest = selection.first()?;
        if config.reset_on_no_target && current_target.is_none() {
            return Some(0);
        }
        if reset && (config.sticky_target_on_reset || current_target != Some(closest.id)) {
            return Some(0);
        }
        Some(match self.index {
            Some(index) if index + 1 < selection.len() => index + 1,
            _ => 0,
        })
    }

    pub fn commit(&mut self, selection: &[Candidate], index: usize) {
        self.index = Some(index);
        self.previous_ids = selection.iter().map(|candidate| candidate.id).collect();
        self.previous_closest = selection.first().map(|candidate| candidate.id);
    }

    pub fn unset_index(&mut self) {
        self.index = None;
    }

    pub fn drop_stale_index(&mut self, len: usize) {
        if self.index.is_some_and(|index| index >= len) {
            self.index = None;
        }
    }

    /// Forgets the cycle entirely. Pending rotation flags survive.
    pub fn clear(&mut self) {
        self.index = None;
        self.previous_ids.clear();
        self.previous_closest = None;
    }
}
