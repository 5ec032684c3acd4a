use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use glam::Vec3;
use tracing::warn;

use crate::config::TargetingConfig;
use crate::geometry::math::clamp_unit;
use crate::host::{EntityId, EntityState, GameHost, Ray, ScreenProjection};

pub const FEET_HEIGHT_FRACTION: f32 = 0.2;

static RAYCAST_CACHE_POISON_WARNED: AtomicBool = AtomicBool::new(false);

fn warn_cache_lock_poison_once(operation: &'static str) {
    if RAYCAST_CACHE_POISON_WARNED
        .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
        .is_ok()
    {
        warn!(operation, "raycast debug cache lock poisoned; recovered inner value");
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastRecord {
    pub origin: Vec3,
    pub target: Vec3,
    pub visible: bool,
    pub hit_distance: Option<f32>,
    pub actual_distance: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityRaycastDebug {
    pub feet: Vec3,
    pub head: Vec3,
    pub feet_screen: Option<ScreenProjection>,
    pub head_screen: Option<ScreenProjection>,
    pub rays: Vec<RaycastRecord>,
    pub visibility_percent: f32,
}

#[derive(Debug, Clone, Default)]
pub struct RaycastDebugCache {
    entries: Arc<RwLock<HashMap<EntityId, EntityRaycastDebug>>>,
}

impl RaycastDebugCache {
    fn read(&self) -> RwLockReadGuard<'_, HashMap<EntityId, EntityRaycastDebug>> {
        self.entries.read().unwrap_or_else(|poisoned| {
            warn_cache_lock_poison_once("read");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<EntityId, EntityRaycastDebug>> {
        self.entries.write().unwrap_or_else(|poisoned| {
            warn_cache_lock_poison_once("write");
            poisoned.into_inner()
        })
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn record(&self, id: EntityId, entry: EntityRaycastDebug) {
        self.write().insert(id, entry);
    }

    pub fn get(&self, id: EntityId) -> Option<EntityRaycastDebug> {
        self.read().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn entries(&self) -> Vec<(EntityId, EntityRaycastDebug)> {
        let mut entries: Vec<_> = self
            .read()
            .iter()
            .map(|(id, entry)| (*id, entry.clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub visible: bool,
    pub successes: usize,
    pub cast: usize,
    pub total: usize,
}

impl Visibility {
    fn unobstructed() -> Self {
        Self {
            visible: true,
            successes: 0,
            cast: 0,
            total: 0,
        }
    }
}

pub fn required_successes(total: usize, fraction: f32) -> usize {
    if total == 0 {
        return 0;
    }
    let fraction = clamp_unit(fraction);
    let meets = |k: usize| k as f32 / total as f32 >= fraction;

    let mut required = ((fraction * total as f32).ceil() as usize).min(total);
    while required > 0 && meets(required - 1) {
        required -= 1;
    }
    while required < total && !meets(required) {
        required += 1;
    }
    required
}

fn cast_ray(
    host: &dyn GameHost,
    origin: Vec3,
    target: Vec3,
    config: &TargetingConfig,
) -> RaycastRecord {
    let delta = target - origin;
    let actual_distance = delta.length();
    if !actual_distance.is_finite() || actual_distance <= 0.0 {
        return RaycastRecord {
            origin,
            target,
            visible: false,
            hit_distance: None,
            actual_distance: 0.0,
        };
    }

    let direction = delta / actual_distance;
    let hit = host.raycast(Ray { origin, direction }, config.raycast_max_distance);
    let visible = match hit {
        None => true,
        Some(hit) => hit.distance + config.raycast_tolerance >= actual_distance,
    };

    RaycastRecord {
        origin,
        target,
        visible,
        hit_distance: hit.map(|hit| hit.distance),
        actual_distance,
    }
}

/// Passing `debug` records every ray and turns off the early exit, so the full ray set
/// is always cast. Both paths compare against the same required count and agree.
pub fn check_visibility(
    host: &dyn GameHost,
    entity: &EntityState,
    edge_positions: &[Vec3],
    config: &TargetingConfig,
    mut debug: Option<&mut EntityRaycastDebug>,
) -> Visibility {
    let total = edge_positions.len() * 2;
    if total == 0 {
        return Visibility::unobstructed();
    }

    let required = required_successes(total, config.visibility_fraction());
    let feet = entity.position + Vec3::Y * (entity.model_height * FEET_HEIGHT_FRACTION);
    let head = entity.position + Vec3::Y * entity.model_height;

    if let Some(debug) = debug.as_deref_mut() {
        debug.feet = feet;
        debug.head = head;
        debug.feet_screen = host.world_to_screen(feet);
        debug.head_screen = host.world_to_screen(head);
        debug.rays.clear();
        debug.rays.reserve(total);
    }
    let early_exit = debug.is_none();

    let mut successes = 0;
    let mut cast = 0;
    for &origin in edge_positions {
        for target in [feet, head] {
            let record = cast_ray(host, origin, target, config);
            cast += 1;
            if record.visible {
                successes += 1;
            }
            if let Some(debug) = debug.as_deref_mut() {
                debug.rays.push(record);
            }
        }

        if early_exit {
            if successes >= required {
                return Visibility {
                    visible: true,
                    successes,
                    cast,
                    total,
                };
            }
            if successes + (total - cast) < required {
                return Visibility {
                    visible: false,
                    successes,
                    cast,
                    total,
                };
            }
        }
    }

    if let Some(debug) = debug {
        debug.visibility_percent = successes as f32 / total as f32 * 100.0;
    }

    Visibility {
        visible: successes >= required,
        successes,
        cast,
        total,
    }
}
