pub mod config;
pub mod cycle;
pub mod geometry;
pub mod host;
pub mod input;
pub mod overlay;
pub mod scene;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, ResetRule, ResetRules, TargetingConfig};
pub use cycle::{CycleOutcome, TargetingSession, TriggerKind};
pub use host::{
    CameraView, EntityId, EntityKind, EntityState, GameHost, GroupView, HostError, LocalPlayer,
    Ray, RayHit, ScreenProjection, ZoomState, NEUTRAL_FACTION,
};
pub use input::CycleKey;
pub use overlay::{Overlay, Rgba, Shape};
pub use scene::{Candidate, SceneError, SelectionArea, SelectionOrder};
