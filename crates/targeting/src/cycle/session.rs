use std::time::{Duration, Instant};

use glam::{Mat4, Vec2};
use tracing::{debug, info, warn};

use super::controller::CyclingState;
use super::triggers::{winning_trigger, TriggerKind};
use crate::config::TargetingConfig;
use crate::geometry::math::percent_to_unit;
use crate::geometry::{RotationTracker, ROTATION_SLOTS};
use crate::host::{EntityId, GameHost};
use crate::overlay::{draw_raycasts, draw_selection, Overlay, RotationStatus, SelectionView};
use crate::scene::{query, Candidate, RaycastDebugCache, SceneBuilder, SceneError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Skipped,
    NoCandidates,
    Targeted {
        id: EntityId,
        index: usize,
        reset: Option<TriggerKind>,
    },
}

fn camera_ready(view: &Mat4) -> bool {
    view.is_finite() && *view != Mat4::IDENTITY
}

fn interval_elapsed(last: Option<Instant>, now: Instant, interval_ms: u64) -> bool {
    match last {
        None => true,
        Some(last) => now.saturating_duration_since(last) >= Duration::from_millis(interval_ms),
    }
}

#[derive(Debug, Default)]
pub struct TargetingSession {
    ready: bool,
    scene: SceneBuilder,
    rotation: RotationTracker,
    cycling: CyclingState,
    selection: Vec<Candidate>,
    aim_point: Vec2,
    last_camera_check: Option<Instant>,
    last_refresh: Option<Instant>,
    last_reset: Option<TriggerKind>,
}

impl TargetingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn cycling(&self) -> &CyclingState {
        &self.cycling
    }

    pub fn rotation(&self) -> &RotationTracker {
        &self.rotation
    }

    pub fn selection(&self) -> &[Candidate] {
        &self.selection
    }

    pub fn last_reset(&self) -> Option<TriggerKind> {
        self.last_reset
    }

    pub fn raycast_debug(&self) -> &RaycastDebugCache {
        self.scene.raycast_debug()
    }

    fn ensure_ready(&mut self, host: &dyn GameHost) -> Option<Mat4> {
        let view = host.camera().map(|camera| camera.view_matrix());
        let Some(view) = view.filter(camera_ready) else {
            debug!(service = "camera", "targeting_not_ready");
            return None;
        };
        if host.groups().is_none() {
            debug!(service = "groups", "targeting_not_ready");
            return None;
        }

        if !self.ready {
            self.rotation.seed(view);
            self.ready = true;
            info!("targeting_ready");
        }
        Some(view)
    }

    fn poll_rotation(&mut self, view: &Mat4, config: &TargetingConfig) {
        for slot in 0..ROTATION_SLOTS {
            let Some(threshold) = config.rotation_threshold_percent(slot) else {
                continue;
            };
            if self.rotation.check_exceeds(slot, threshold, false, view) {
                self.cycling.mark_rotation_pending(slot);
            }
        }
    }

    fn refresh_selection(
        &mut self,
        host: &dyn GameHost,
        config: &TargetingConfig,
    ) -> Result<Vec<Candidate>, SceneError> {
        let snapshot = self.scene.rebuild(host, config)?;
        let selection = query(
            &snapshot.candidates,
            snapshot.aim_point,
            config.selection_area(),
            config.selection_order(),
        );
        self.aim_point = snapshot.aim_point;
        self.selection = selection.clone();
        Ok(selection)
    }

    pub fn on_cycle_input(
        &mut self,
        host: &mut dyn GameHost,
        config: &TargetingConfig,
    ) -> CycleOutcome {
        let Some(view) = self.ensure_ready(&*host) else {
            return CycleOutcome::Skipped;
        };
        let selection = match self.refresh_selection(&*host, config) {
            Ok(selection) => selection,
            Err(err) => {
                warn!(error = %err, "cycle_skipped");
                return CycleOutcome::Skipped;
            }
        };
        self.poll_rotation(&view, config);

        let triggers = self.cycling.triggers(&selection);
        let reset = winning_trigger(&config.reset_rules, &triggers);
        let current_target = host.current_target();
        let chosen = self
            .cycling
            .next_index(&selection, reset.is_some(), current_target, config)
            .and_then(|index| selection.get(index).map(|candidate| (index, candidate.id)));
        let Some((index, id)) = chosen else {
            self.cycling.unset_index();
            debug!("cycle_no_candidates");
            return CycleOutcome::NoCandidates;
        };

        if let Some(kind) = reset {
            let slot = kind.rotation_slot();
            self.cycling.clear_rotation_pending(slot);
            self.rotation.commit_checkpoint(slot, &view);
            if config.show_debug_selection {
                warn!(trigger = kind.name(), ?triggers, "reset_triggered");
            } else {
                debug!(trigger = kind.name(), "reset_triggered");
            }
        }

        host.set_target(Some(id));
        self.cycling.commit(&selection, index);
        self.last_reset = reset;
        debug!(
            entity = id.0,
            index,
            candidates = selection.len(),
            "target_committed"
        );

        CycleOutcome::Targeted { id, index, reset }
    }

    pub fn update_visuals(&mut self, host: &dyn GameHost, config: &TargetingConfig, now: Instant) {
        let Some(view) = self.ensure_ready(host) else {
            return;
        };

        if interval_elapsed(self.last_camera_check, now, config.camera_check_interval_ms) {
            self.last_camera_check = Some(now);
            self.poll_rotation(&view, config);
        }

        if config.debug_views_enabled()
            && interval_elapsed(self.last_refresh, now, config.draw_refresh_ms)
        {
            self.last_refresh = Some(now);
            match self.refresh_selection(host, config) {
                Ok(selection) if selection.is_empty() => self.cycling.clear(),
                Ok(selection) => self.cycling.drop_stale_index(selection.len()),
                Err(err) => debug!(error = %err, "debug_refresh_failed"),
            }
        }
    }

    pub fn debug_overlay(&self, host: &dyn GameHost, config: &TargetingConfig) -> Overlay {
        let mut overlay = Overlay::default();
        if !self.ready {
            return overlay;
        }

        if config.show_debug_selection {
            let pending = self.cycling.pending_rotation();
            let rotation = std::array::from_fn(|slot| RotationStatus {
                fraction: self.rotation.last_fraction(slot),
                threshold: config
                    .rotation_threshold_percent(slot)
                    .map_or(0.0, percent_to_unit),
                pending: pending[slot],
            });
            draw_selection(
                &mut overlay,
                &SelectionView {
                    aim_point: self.aim_point,
                    area: config.selection_area(),
                    selection: &self.selection,
                    cycle_index: self.cycling.index(),
                    rotation,
                    camera_reset_enabled: config.reset_rules.camera_rotation.enabled,
                },
            );
        }

        if config.show_debug_raycast {
            draw_raycasts(&mut overlay, host, &self.scene.raycast_debug().entries());
        }

        overlay
    }
}
