use std::collections::{BTreeMap, BTreeSet};

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};
use serde::{Deserialize, Serialize};
use targeting::{
    CameraView, EntityId, EntityState, GameHost, GroupView, HostError, LocalPlayer, Ray, RayHit,
    ScreenProjection, ZoomState,
};

const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 1000.0;
const MAX_PITCH_DEGREES: f32 = 89.0;
const MIN_CLIP_W: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct Occluder {
    pub min: Vec3,
    pub max: Vec3,
}

impl Occluder {
    pub(crate) fn intersect(&self, ray: &Ray, max_distance: f32) -> Option<f32> {
        let mut t_near = 0.0_f32;
        let mut t_far = max_distance;
        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if direction.abs() < f32::EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / direction;
            let (t0, t1) = {
                let a = (lo - origin) * inv;
                let b = (hi - origin) * inv;
                (a.min(b), a.max(b))
            };
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }
        Some(t_near)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SimCamera {
    pub eye: Vec3,
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub fov_degrees: f32,
    pub viewport: Vec2,
    pub zoom: ZoomState,
}

impl SimCamera {
    pub(crate) fn forward(&self) -> Vec3 {
        let yaw = self.yaw_degrees.to_radians();
        let pitch = self
            .pitch_degrees
            .clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES)
            .to_radians();
        Vec3::new(
            yaw.sin() * pitch.cos(),
            pitch.sin(),
            -yaw.cos() * pitch.cos(),
        )
    }

    pub(crate) fn rotate(&mut self, yaw_degrees: f32, pitch_degrees: f32) {
        self.yaw_degrees = (self.yaw_degrees + yaw_degrees).rem_euclid(360.0);
        self.pitch_degrees =
            (self.pitch_degrees + pitch_degrees).clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES);
    }

    fn projection(&self) -> Mat4 {
        let aspect = if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        };
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
    }

    fn view_projection(&self) -> Mat4 {
        self.projection() * self.view_matrix()
    }

    pub(crate) fn project(&self, world: Vec3) -> Option<ScreenProjection> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= MIN_CLIP_W {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        let position = Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        );
        let in_view = (-1.0..=1.0).contains(&ndc.x)
            && (-1.0..=1.0).contains(&ndc.y)
            && (0.0..=1.0).contains(&ndc.z);
        Some(ScreenProjection { position, in_view })
    }
}

impl CameraView for SimCamera {
    fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.eye, self.forward(), Vec3::Y)
    }

    fn zoom(&self) -> ZoomState {
        self.zoom
    }

    fn screen_point_to_ray(&self, screen: Vec2) -> Ray {
        let ndc = Vec2::new(
            screen.x / self.viewport.x * 2.0 - 1.0,
            1.0 - screen.y / self.viewport.y * 2.0,
        );
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        Ray {
            origin: near,
            direction: (far - near).normalize_or_zero(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SimParty {
    pub members: BTreeSet<EntityId>,
}

impl GroupView for SimParty {
    fn is_party_or_alliance_member(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SimHost {
    pub player: LocalPlayer,
    pub camera: SimCamera,
    pub party: SimParty,
    pub entities: BTreeMap<EntityId, EntityState>,
    pub occluders: Vec<Occluder>,
    pub pvp: bool,
    pub target: Option<EntityId>,
}

impl SimHost {
    pub(crate) fn despawn(&mut self, id: EntityId) -> bool {
        let removed = self.entities.remove(&id).is_some();
        if self.target == Some(id) {
            self.target = None;
        }
        removed
    }

    pub(crate) fn move_entity(&mut self, id: EntityId, position: Vec3) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.position = position;
                true
            }
            None => false,
        }
    }
}

impl GameHost for SimHost {
    fn local_player(&self) -> Option<LocalPlayer> {
        Some(self.player)
    }

    fn entity_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.keys().copied().collect();
        ids.push(self.player.id);
        ids
    }

    fn entity(&self, id: EntityId) -> Result<EntityState, HostError> {
        self.entities
            .get(&id)
            .cloned()
            .ok_or(HostError::EntityGone(id))
    }

    fn is_pvp(&self) -> bool {
        self.pvp
    }

    fn viewport_size(&self) -> Vec2 {
        self.camera.viewport
    }

    fn world_to_screen(&self, world: Vec3) -> Option<ScreenProjection> {
        self.camera.project(world)
    }

    fn raycast(&self, ray: Ray, max_distance: f32) -> Option<RayHit> {
        let distance = self
            .occluders
            .iter()
            .filter_map(|occluder| occluder.intersect(&ray, max_distance))
            .min_by(f32::total_cmp)?;
        Some(RayHit {
            distance,
            point: ray.origin + ray.direction * distance,
        })
    }

    fn camera(&self) -> Option<&dyn CameraView> {
        Some(&self.camera)
    }

    fn groups(&self) -> Option<&dyn GroupView> {
        Some(&self.party)
    }

    fn current_target(&self) -> Option<EntityId> {
        self.target
    }

    fn set_target(&mut self, target: Option<EntityId>) {
        self.target = target;
    }
}
