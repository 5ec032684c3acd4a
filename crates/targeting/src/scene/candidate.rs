use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::host::{EntityId, EntityKind};

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: EntityId,
    pub label: String,
    pub kind: EntityKind,
    pub screen_position: Vec2,
    pub world_position: Vec3,
    pub world_distance: f32,
    pub camera_distance: f32,
    pub hostile: bool,
    pub neutral: bool,
    pub player: bool,
    pub pet: bool,
    pub faction: u8,
}

#[derive(Debug, Clone, Default)]
pub struct SceneSnapshot {
    pub aim_point: Vec2,
    pub candidates: Arc<Vec<Candidate>>,
}

impl SceneSnapshot {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn get(&self, id: EntityId) -> Option<&Candidate> {
        self.candidates.iter().find(|candidate| candidate.id == id)
    }
}
