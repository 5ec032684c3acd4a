use std::f32::consts::PI;

use glam::{Mat4, Vec3};

use super::math::percent_to_unit;

pub const ROTATION_SLOTS: usize = 3;
const THRESHOLD_EPSILON: f32 = 1e-6;

pub fn view_basis(view: &Mat4) -> (Vec3, Vec3) {
    (view.row(2).truncate(), view.row(1).truncate())
}

fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let (Some(a), Some(b)) = (a.try_normalize(), b.try_normalize()) else {
        return 0.0;
    };
    a.dot(b).clamp(-1.0, 1.0).acos()
}

pub fn rotation_fraction(checkpoint: &Mat4, current: &Mat4) -> f32 {
    let (last_forward, last_up) = view_basis(checkpoint);
    let (forward, up) = view_basis(current);
    let forward_angle = angle_between(last_forward, forward);
    let up_angle = angle_between(last_up, up);
    (forward_angle.max(up_angle) / PI).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy)]
struct RotationSlot {
    checkpoint: Mat4,
    last_fraction: f32,
}

impl Default for RotationSlot {
    fn default() -> Self {
        Self {
            checkpoint: Mat4::IDENTITY,
            last_fraction: 0.0,
        }
    }
}

/// Independent camera-rotation checkpoints. Polling never moves a checkpoint; only
/// [`RotationTracker::commit_checkpoint`] or a re-arming check does.
#[derive(Debug, Clone, Default)]
pub struct RotationTracker {
    slots: [RotationSlot; ROTATION_SLOTS],
}

impl RotationTracker {
    pub fn new(initial_view: Mat4) -> Self {
        let mut tracker = Self::default();
        tracker.seed(initial_view);
        tracker
    }

    pub fn seed(&mut self, view: Mat4) {
        for slot in &mut self.slots {
            slot.checkpoint = view;
            slot.last_fraction = 0.0;
        }
    }

    pub fn check_exceeds(
        &mut self,
        slot_index: usize,
        threshold_percent: f32,
        rearm_if_exceeded: bool,
        current_view: &Mat4,
    ) -> bool {
        let Some(slot) = self.slots.get_mut(slot_index) else {
            return false;
        };

        slot.last_fraction = rotation_fraction(&slot.checkpoint, current_view);
        let threshold = percent_to_unit(threshold_percent);
        if slot.last_fraction + THRESHOLD_EPSILON < threshold {
            return false;
        }

        if rearm_if_exceeded {
            slot.checkpoint = *current_view;
        }
        true
    }

    pub fn commit_checkpoint(&mut self, slot_index: usize, current_view: &Mat4) {
        if let Some(slot) = self.slots.get_mut(slot_index) {
            slot.checkpoint = *current_view;
        }
    }

    pub fn last_fraction(&self, slot_index: usize) -> f32 {
        self.slots
            .get(slot_index)
            .map_or(0.0, |slot| slot.last_fraction)
    }
}
