use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NEUTRAL_FACTION: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    BattleNpc,
    EventNpc,
    Companion,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityState {
    pub name: String,
    pub kind: EntityKind,
    pub position: Vec3,
    pub model_height: f32,
    pub is_dead: bool,
    pub current_hp: u32,
    pub targetable: bool,
    pub hostile: bool,
    pub faction: u8,
    pub owner: Option<EntityId>,
}

impl EntityState {
    pub fn is_neutral(&self) -> bool {
        self.faction == NEUTRAL_FACTION
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead && self.current_hp > 0
    }

    pub fn is_pet_or_companion(&self) -> bool {
        self.owner.is_some() && !self.is_neutral()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPlayer {
    pub id: EntityId,
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenProjection {
    pub position: Vec2,
    pub in_view: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    pub current: f32,
    pub min: f32,
    pub max: f32,
}

impl ZoomState {
    pub fn ratio(&self) -> f32 {
        let span = self.max - self.min;
        if !span.is_finite() || span <= 0.0 {
            return 0.0;
        }
        let current = self.current.clamp(self.min, self.max);
        ((current - self.min) / span).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("entity {0:?} no longer exists")]
    EntityGone(EntityId),
    #[error("host service not ready: {0}")]
    NotReady(&'static str),
    #[error("host error: {0}")]
    Other(String),
}

pub trait CameraView {
    fn view_matrix(&self) -> Mat4;
    fn zoom(&self) -> ZoomState;
    fn screen_point_to_ray(&self, screen: Vec2) -> Ray;
}

pub trait GroupView {
    fn is_party_or_alliance_member(&self, id: EntityId) -> bool;
}

pub trait GameHost {
    fn local_player(&self) -> Option<LocalPlayer>;
    fn entity_ids(&self) -> Vec<EntityId>;
    fn entity(&self, id: EntityId) -> Result<EntityState, HostError>;
    fn is_pvp(&self) -> bool;
    fn viewport_size(&self) -> Vec2;
    fn world_to_screen(&self, world: Vec3) -> Option<ScreenProjection>;
    fn raycast(&self, ray: Ray, max_distance: f32) -> Option<RayHit>;
    fn camera(&self) -> Option<&dyn CameraView>;
    fn groups(&self) -> Option<&dyn GroupView>;
    fn current_target(&self) -> Option<EntityId>;
    fn set_target(&mut self, target: Option<EntityId>);
}
