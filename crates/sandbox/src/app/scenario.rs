use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use targeting::{EntityId, EntityKind, EntityState, LocalPlayer, ZoomState};

use super::sim_host::{Occluder, SimCamera, SimHost, SimParty};
use super::SandboxError;

const DEMO_SCENARIO: &str = include_str!("../../scenarios/demo.json");

fn default_viewport() -> Vec2 {
    Vec2::new(1280.0, 720.0)
}

fn default_frame_ms() -> u64 {
    16
}

fn default_height() -> f32 {
    2.0
}

fn default_hp() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

fn default_kind() -> EntityKind {
    EntityKind::BattleNpc
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct CameraSpec {
    pub eye: Vec3,
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub fov_degrees: f32,
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for CameraSpec {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 5.0, 10.0),
            yaw_degrees: 0.0,
            pitch_degrees: -10.0,
            fov_degrees: 60.0,
            zoom: 10.0,
            min_zoom: 1.5,
            max_zoom: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PlayerSpec {
    pub id: u64,
    pub position: Vec3,
}

impl Default for PlayerSpec {
    fn default() -> Self {
        Self {
            id: 1,
            position: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct EntitySpec {
    pub id: u64,
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: EntityKind,
    pub position: Vec3,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_true")]
    pub hostile: bool,
    #[serde(default)]
    pub faction: u8,
    #[serde(default)]
    pub owner: Option<u64>,
    #[serde(default = "default_hp")]
    pub hp: u32,
    #[serde(default)]
    pub dead: bool,
    #[serde(default = "default_true")]
    pub targetable: bool,
}

impl EntitySpec {
    fn to_state(&self) -> EntityState {
        EntityState {
            name: self.name.clone(),
            kind: self.kind,
            position: self.position,
            model_height: self.height,
            is_dead: self.dead,
            current_hp: self.hp,
            targetable: self.targetable,
            hostile: self.hostile,
            faction: self.faction,
            owner: self.owner.map(EntityId),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub(crate) enum Step {
    Cycle,
    RotateCamera {
        #[serde(default)]
        yaw_degrees: f32,
        #[serde(default)]
        pitch_degrees: f32,
    },
    Despawn {
        id: u64,
    },
    ClearTarget,
    Wait {
        ms: u64,
    },
    MoveEntity {
        id: u64,
        position: Vec3,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_viewport")]
    pub viewport: Vec2,
    #[serde(default)]
    pub camera: CameraSpec,
    #[serde(default)]
    pub player: PlayerSpec,
    #[serde(default)]
    pub entities: Vec<EntitySpec>,
    #[serde(default)]
    pub occluders: Vec<Occluder>,
    #[serde(default)]
    pub pvp: bool,
    #[serde(default)]
    pub party: Vec<u64>,
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub(crate) fn from_json_str(raw: &str, origin: &str) -> Result<Self, SandboxError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
            let location = error.path().to_string();
            SandboxError::Scenario {
                origin: origin.to_string(),
                location,
                source: error.into_inner(),
            }
        })
    }

    pub(crate) fn load(path: &Path) -> Result<Self, SandboxError> {
        let raw = fs::read_to_string(path).map_err(|source| SandboxError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw, &path.display().to_string())
    }

    pub(crate) fn demo() -> Result<Self, SandboxError> {
        Self::from_json_str(DEMO_SCENARIO, "built-in demo")
    }

    pub(crate) fn build_host(&self) -> SimHost {
        let camera = SimCamera {
            eye: self.camera.eye,
            yaw_degrees: self.camera.yaw_degrees,
            pitch_degrees: self.camera.pitch_degrees,
            fov_degrees: self.camera.fov_degrees,
            viewport: self.viewport,
            zoom: ZoomState {
                current: self.camera.zoom,
                min: self.camera.min_zoom,
                max: self.camera.max_zoom,
            },
        };
        SimHost {
            player: LocalPlayer {
                id: EntityId(self.player.id),
                position: self.player.position,
            },
            camera,
            party: SimParty {
                members: self.party.iter().copied().map(EntityId).collect(),
            },
            entities: self
                .entities
                .iter()
                .map(|spec| (EntityId(spec.id), spec.to_state()))
                .collect(),
            occluders: self.occluders.clone(),
            pvp: self.pvp,
            target: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use targeting::GameHost;

    use super::*;

    #[test]
    fn demo_scenario_parses() {
        let scenario = Scenario::demo().expect("demo");
        assert_eq!(scenario.name, "demo");
        assert_eq!(scenario.entities.len(), 8);
        assert_eq!(scenario.frame_ms, 16);
        assert_eq!(scenario.steps[0], Step::Cycle);
        assert_eq!(
            scenario.steps[3],
            Step::RotateCamera {
                yaw_degrees: 50.0,
                pitch_degrees: 0.0
            }
        );
    }

    #[test]
    fn entity_defaults_fill_missing_fields() {
        let scenario = Scenario::from_json_str(
            r#"{ "entities": [ { "id": 5, "name": "Slime", "position": [1.0, 0.0, 2.0] } ] }"#,
            "inline",
        )
        .expect("parse");
        let host = scenario.build_host();
        let slime = host.entity(EntityId(5)).expect("slime");
        assert_eq!(slime.kind, EntityKind::BattleNpc);
        assert_eq!(slime.model_height, 2.0);
        assert!(slime.hostile && slime.targetable && slime.is_alive());
        assert!(scenario.steps.is_empty());
    }

    #[test]
    fn unknown_step_reports_location() {
        let err = Scenario::from_json_str(
            r#"{ "steps": [ { "action": "cycle" }, { "action": "jump" } ] }"#,
            "inline",
        )
        .expect_err("unknown action");
        let message = err.to_string();
        assert!(message.contains("steps[1]"), "unexpected: {message}");
        assert!(message.contains("inline"), "unexpected: {message}");
    }

    #[test]
    fn party_and_owner_ids_map_to_entity_ids() {
        let scenario = Scenario::from_json_str(
            r#"{
                "party": [3],
                "entities": [
                    { "id": 4, "name": "Pet", "owner": 1, "position": [0.0, 0.0, 0.0] }
                ]
            }"#,
            "inline",
        )
        .expect("parse");
        let host = scenario.build_host();
        let groups = host.groups().expect("groups");
        assert!(groups.is_party_or_alliance_member(EntityId(3)));
        assert_eq!(
            host.entity(EntityId(4)).expect("pet").owner,
            Some(EntityId(1))
        );
    }
}
