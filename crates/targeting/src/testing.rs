use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

use glam::{Mat4, Vec2, Vec3};

use crate::host::{
    CameraView, EntityId, EntityKind, EntityState, GameHost, GroupView, HostError, LocalPlayer,
    Ray, RayHit, ScreenProjection, ZoomState,
};

pub(crate) const PLAYER_ID: u64 = 1;
pub(crate) const VIEWPORT: Vec2 = Vec2::new(1000.0, 600.0);
const PIXELS_PER_UNIT: f32 = 10.0;
const BLOCKED_HIT_DISTANCE: f32 = 0.5;

pub(crate) fn mob(name: &str, x: f32, z: f32) -> EntityState {
    EntityState {
        name: name.to_string(),
        kind: EntityKind::BattleNpc,
        position: Vec3::new(x, 0.0, z),
        model_height: 2.0,
        is_dead: false,
        current_hp: 100,
        targetable: true,
        hostile: true,
        faction: 0,
        owner: None,
    }
}

pub(crate) fn view_looking(direction: Vec3) -> Mat4 {
    Mat4::look_to_rh(Vec3::new(0.0, 30.0, -30.0), direction, Vec3::Y)
}

#[derive(Debug, Clone)]
pub(crate) struct FakeCamera {
    pub view: Mat4,
    pub zoom: ZoomState,
}

impl CameraView for FakeCamera {
    fn view_matrix(&self) -> Mat4 {
        self.view
    }

    fn zoom(&self) -> ZoomState {
        self.zoom
    }

    fn screen_point_to_ray(&self, screen: Vec2) -> Ray {
        let offset = (screen - VIEWPORT / 2.0) / PIXELS_PER_UNIT;
        Ray {
            origin: Vec3::new(offset.x, 30.0, offset.y - 30.0),
            direction: Vec3::new(0.0, -1.0, 1.0).normalize(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeGroups {
    pub party: BTreeSet<EntityId>,
}

impl GroupView for FakeGroups {
    fn is_party_or_alliance_member(&self, id: EntityId) -> bool {
        self.party.contains(&id)
    }
}

#[derive(Debug)]
pub(crate) struct FakeHost {
    pub player: Option<LocalPlayer>,
    pub entities: BTreeMap<EntityId, EntityState>,
    pub gone: BTreeSet<EntityId>,
    pub failure: Option<HostError>,
    pub pvp: bool,
    pub camera: Option<FakeCamera>,
    pub groups: Option<FakeGroups>,
    pub target: Option<EntityId>,
    pub target_commits: usize,
    pub blocked_rays: Vec<bool>,
    pub wall_distance: Option<f32>,
    pub ray_calls: Cell<usize>,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        Self {
            player: Some(LocalPlayer {
                id: EntityId(PLAYER_ID),
                position: Vec3::ZERO,
            }),
            entities: BTreeMap::new(),
            gone: BTreeSet::new(),
            failure: None,
            pvp: false,
            camera: Some(FakeCamera {
                view: view_looking(Vec3::new(0.0, -1.0, 1.0)),
                zoom: ZoomState {
                    current: 10.0,
                    min: 1.5,
                    max: 20.0,
                },
            }),
            groups: Some(FakeGroups::default()),
            target: None,
            target_commits: 0,
            blocked_rays: Vec::new(),
            wall_distance: None,
            ray_calls: Cell::new(0),
        }
    }

    pub(crate) fn add(&mut self, id: u64, entity: EntityState) {
        self.entities.insert(EntityId(id), entity);
    }

    pub(crate) fn remove(&mut self, id: u64) {
        self.entities.remove(&EntityId(id));
    }

    pub(crate) fn set_party(&mut self, ids: &[u64]) {
        if let Some(groups) = self.groups.as_mut() {
            groups.party = ids.iter().copied().map(EntityId).collect();
        }
    }

    pub(crate) fn set_view(&mut self, view: Mat4) {
        if let Some(camera) = self.camera.as_mut() {
            camera.view = view;
        }
    }
}

impl GameHost for FakeHost {
    fn local_player(&self) -> Option<LocalPlayer> {
        self.player
    }

    fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    fn entity(&self, id: EntityId) -> Result<EntityState, HostError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        if self.gone.contains(&id) {
            return Err(HostError::EntityGone(id));
        }
        self.entities
            .get(&id)
            .cloned()
            .ok_or(HostError::EntityGone(id))
    }

    fn is_pvp(&self) -> bool {
        self.pvp
    }

    fn viewport_size(&self) -> Vec2 {
        VIEWPORT
    }

    fn world_to_screen(&self, world: Vec3) -> Option<ScreenProjection> {
        let position = VIEWPORT / 2.0
            + Vec2::new(world.x, world.z - world.y) * PIXELS_PER_UNIT;
        if !position.is_finite() {
            return None;
        }
        let in_view = position.x >= 0.0
            && position.y >= 0.0
            && position.x <= VIEWPORT.x
            && position.y <= VIEWPORT.y;
        Some(ScreenProjection { position, in_view })
    }

    fn raycast(&self, ray: Ray, max_distance: f32) -> Option<RayHit> {
        let call = self.ray_calls.get();
        self.ray_calls.set(call + 1);

        let distance = match self.wall_distance {
            Some(distance) => distance,
            None if self.blocked_rays.is_empty() => return None,
            None if self.blocked_rays[call % self.blocked_rays.len()] => BLOCKED_HIT_DISTANCE,
            None => return None,
        };
        (distance <= max_distance).then(|| RayHit {
            distance,
            point: ray.origin + ray.direction * distance,
        })
    }

    fn camera(&self) -> Option<&dyn CameraView> {
        self.camera.as_ref().map(|camera| camera as &dyn CameraView)
    }

    fn groups(&self) -> Option<&dyn GroupView> {
        self.groups.as_ref().map(|groups| groups as &dyn GroupView)
    }

    fn current_target(&self) -> Option<EntityId> {
        self.target
    }

    fn set_target(&mut self, target: Option<EntityId>) {
        self.target = target;
        self.target_commits += 1;
    }
}
