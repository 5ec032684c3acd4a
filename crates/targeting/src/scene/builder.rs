use std::sync::Arc;

use glam::Vec3;
use thiserror::Error;
use tracing::trace;

use super::candidate::{Candidate, SceneSnapshot};
use super::visibility::{check_visibility, EntityRaycastDebug, RaycastDebugCache};
use crate::config::TargetingConfig;
use crate::geometry::math::{lerp, normalize_distance};
use crate::geometry::{aim_point, edge_sample_points, edge_world_positions};
use crate::host::{EntityId, EntityKind, EntityState, GameHost, GroupView, HostError};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("host not ready: {0}")]
    NotReady(&'static str),
    #[error(transparent)]
    Host(#[from] HostError),
}

#[derive(Debug, Default)]
pub struct SceneBuilder {
    snapshot: SceneSnapshot,
    raycast_debug: RaycastDebugCache,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        self.snapshot.clone()
    }

    pub fn raycast_debug(&self) -> &RaycastDebugCache {
        &self.raycast_debug
    }

    pub fn rebuild(
        &mut self,
        host: &dyn GameHost,
        config: &TargetingConfig,
    ) -> Result<SceneSnapshot, SceneError> {
        let player = host
            .local_player()
            .ok_or(SceneError::NotReady("local player"))?;
        let camera = host.camera().ok_or(SceneError::NotReady("camera"))?;
        let groups = host.groups().ok_or(SceneError::NotReady("groups"))?;

        let viewport = host.viewport_size();
        let aim = aim_point(viewport, config, Some(camera.zoom()));
        let capture_debug = config.capture_raycast_debug();
        let edge_positions = if config.only_visible_objects {
            let samples = edge_sample_points(viewport, config);
            edge_world_positions(camera, &samples, config.edge_depth())
        } else {
            Vec::new()
        };

        let max_distance = config.max_target_distance;
        let is_pvp = host.is_pvp();
        let mut candidates = Vec::new();
        let mut debug_entries = Vec::new();

        if max_distance.is_finite() && max_distance > 0.0 {
            for id in host.entity_ids() {
                if id == player.id {
                    continue;
                }
                let entity = match host.entity(id) {
                    Ok(entity) => entity,
                    Err(HostError::EntityGone(_)) => {
                        trace!(entity = id.0, "candidate_gone");
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                };

                if !is_selectable(&entity) {
                    continue;
                }
                let world_distance = player.position.distance(entity.position);
                if !world_distance.is_finite() || world_distance > max_distance {
                    continue;
                }
                if config.only_attackable_objects && !is_attackable(id, &entity, is_pvp, groups) {
                    continue;
                }

                let anchor = anchor_point(&entity, world_distance, config);
                let Some(projection) = host.world_to_screen(anchor) else {
                    continue;
                };
                if !projection.in_view {
                    continue;
                }

                if config.only_visible_objects {
                    let mut debug = capture_debug.then(EntityRaycastDebug::default);
                    let visibility =
                        check_visibility(host, &entity, &edge_positions, config, debug.as_mut());
                    if let Some(debug) = debug {
                        debug_entries.push((id, debug));
                    }
                    if !visibility.visible {
                        trace!(entity = id.0, successes = visibility.successes, "candidate_occluded");
                        continue;
                    }
                }

                candidates.push(Candidate {
                    id,
                    label: entity.name.clone(),
                    kind: entity.kind,
                    screen_position: projection.position,
                    world_position: entity.position,
                    world_distance,
                    camera_distance: projection.position.distance(aim),
                    hostile: entity.hostile,
                    neutral: entity.is_neutral(),
                    player: entity.kind == EntityKind::Player,
                    pet: entity.is_pet_or_companion(),
                    faction: entity.faction,
                });
            }
        }

        if capture_debug {
            self.raycast_debug.clear();
            for (id, entry) in debug_entries {
                self.raycast_debug.record(id, entry);
            }
        }

        self.snapshot = SceneSnapshot {
            aim_point: aim,
            candidates: Arc::new(candidates),
        };
        Ok(self.snapshot.clone())
    }
}

fn is_selectable(entity: &EntityState) -> bool {
    entity.is_alive()
        && entity.targetable
        && !entity.name.trim().is_empty()
        && entity.model_height.is_finite()
        && entity.model_height > 0.0
        && entity.position.is_finite()
}

fn is_attackable(id: EntityId, entity: &EntityState, is_pvp: bool, groups: &dyn GroupView) -> bool {
    if matches!(entity.kind, EntityKind::EventNpc | EntityKind::Companion) {
        return false;
    }
    if entity.is_pet_or_companion() {
        return false;
    }
    if !entity.hostile && !entity.is_neutral() && !is_pvp {
        return false;
    }
    if is_pvp && entity.kind == EntityKind::Player && groups.is_party_or_alliance_member(id) {
        return false;
    }
    true
}

fn anchor_point(entity: &EntityState, world_distance: f32, config: &TargetingConfig) -> Vec3 {
    let mut anchor = entity.position;
    if config.use_distance_lerp {
        let t = normalize_distance(
            world_distance,
            config.max_target_distance,
            config.distance_lerp,
        );
        anchor.y = lerp(
            entity.position.y,
            entity.position.y + entity.model_height / 2.0,
            t,
        );
    }
    anchor
}
