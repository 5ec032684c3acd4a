use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cycle::TriggerKind;
use crate::geometry::{math::percent_to_unit, ROTATION_SLOTS};
use crate::scene::{SelectionArea, SelectionOrder};

const MAX_EDGE_SEGMENTS: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse targeting config: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("parse targeting config at {path}: {source}")]
    ParseAt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("encode targeting config: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetRule {
    pub enabled: bool,
    pub with_next: bool,
    pub with_previous: bool,
}

impl ResetRule {
    pub const fn enabled() -> Self {
        Self {
            enabled: true,
            with_next: false,
            with_previous: false,
        }
    }

    pub fn requiring(base: TriggerKind, co_triggers: &[TriggerKind]) -> Self {
        let mut rule = Self::enabled();
        for &kind in co_triggers {
            if kind == base.next() {
                rule.with_next = true;
            } else if kind == base.previous() {
                rule.with_previous = true;
            }
        }
        rule
    }

    pub fn required_co_triggers(&self, base: TriggerKind) -> impl Iterator<Item = TriggerKind> {
        let next = self.with_next.then(|| base.next());
        let previous = self.with_previous.then(|| base.previous());
        next.into_iter().chain(previous)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetRules {
    pub camera_rotation: ResetRule,
    pub set_changed: ResetRule,
    pub closest_changed: ResetRule,
}

impl Default for ResetRules {
    fn default() -> Self {
        Self {
            camera_rotation: ResetRule::enabled(),
            set_changed: ResetRule::enabled(),
            closest_changed: ResetRule::default(),
        }
    }
}

impl ResetRules {
    pub fn none() -> Self {
        Self {
            camera_rotation: ResetRule::default(),
            set_changed: ResetRule::default(),
            closest_changed: ResetRule::default(),
        }
    }

    pub fn rule(&self, kind: TriggerKind) -> &ResetRule {
        match kind {
            TriggerKind::CameraRotation => &self.camera_rotation,
            TriggerKind::SetChanged => &self.set_changed,
            TriggerKind::ClosestChanged => &self.closest_changed,
        }
    }

    pub fn rule_mut(&mut self, kind: TriggerKind) -> &mut ResetRule {
        match kind {
            TriggerKind::CameraRotation => &mut self.camera_rotation,
            TriggerKind::SetChanged => &mut self.set_changed,
            TriggerKind::ClosestChanged => &mut self.closest_changed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingConfig {
    pub monitor_x: f32,
    pub monitor_y: f32,
    pub max_target_distance: f32,
    pub camera_radius: f32,
    pub use_rectangle_selection: bool,
    pub rectangle_width: f32,
    pub rectangle_height: f32,
    pub alternative_targeting: bool,
    pub only_attackable_objects: bool,
    pub only_visible_objects: bool,
    pub visibility_percent: f32,
    pub raycast_percent: f32,
    pub raycast_multiplier: u32,
    pub raycast_tolerance: f32,
    pub raycast_max_distance: f32,
    pub camera_depth: f32,
    pub use_camera_lerp: bool,
    pub camera_lerp: f32,
    pub use_distance_lerp: bool,
    pub distance_lerp: f32,
    pub reset_on_no_target: bool,
    pub sticky_target_on_reset: bool,
    pub reset_rules: ResetRules,
    pub rotation_percent: [f32; ROTATION_SLOTS],
    pub show_debug_selection: bool,
    pub show_debug_raycast: bool,
    pub draw_refresh_ms: u64,
    pub camera_check_interval_ms: u64,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            monitor_x: 50.0,
            monitor_y: 50.0,
            max_target_distance: 55.0,
            camera_radius: 400.0,
            use_rectangle_selection: false,
            rectangle_width: 600.0,
            rectangle_height: 300.0,
            alternative_targeting: false,
            only_attackable_objects: true,
            only_visible_objects: true,
            visibility_percent: 50.0,
            raycast_percent: 80.0,
            raycast_multiplier: 2,
            raycast_tolerance: 0.2,
            raycast_max_distance: 1000.0,
            camera_depth: 1.0,
            use_camera_lerp: false,
            camera_lerp: 0.05,
            use_distance_lerp: false,
            distance_lerp: 1.0,
            reset_on_no_target: true,
            sticky_target_on_reset: false,
            reset_rules: ResetRules::default(),
            rotation_percent: [25.0; ROTATION_SLOTS],
            show_debug_selection: false,
            show_debug_raycast: false,
            draw_refresh_ms: 100,
            camera_check_interval_ms: 50,
        }
    }
}

impl TargetingConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        serde_path_to_error::deserialize::<_, Self>(&mut deserializer).map_err(|error| {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                ConfigError::Parse(source)
            } else {
                ConfigError::ParseAt { path, source }
            }
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Encode)
    }

    pub fn visibility_fraction(&self) -> f32 {
        percent_to_unit(self.visibility_percent)
    }

    pub fn raycast_scale(&self) -> f32 {
        percent_to_unit(self.raycast_percent)
    }

    pub fn edge_segments(&self) -> usize {
        (self.raycast_multiplier as usize).clamp(1, MAX_EDGE_SEGMENTS)
    }

    pub fn edge_depth(&self) -> f32 {
        if self.camera_depth.is_finite() {
            self.camera_depth - 1.0
        } else {
            0.0
        }
    }

    pub fn rotation_threshold_percent(&self, slot: usize) -> Option<f32> {
        self.rotation_percent.get(slot).copied()
    }

    pub fn capture_raycast_debug(&self) -> bool {
        self.show_debug_raycast
    }

    pub fn debug_views_enabled(&self) -> bool {
        self.show_debug_raycast || self.show_debug_selection
    }

    pub fn selection_area(&self) -> SelectionArea {
        if self.use_rectangle_selection {
            SelectionArea::Rectangle {
                half_width: self.rectangle_width / 2.0,
                half_height: self.rectangle_height / 2.0,
            }
        } else {
            SelectionArea::Circle {
                radius: self.camera_radius,
            }
        }
    }

    pub fn selection_order(&self) -> SelectionOrder {
        if self.alternative_targeting {
            SelectionOrder::ProximityChain
        } else {
            SelectionOrder::CameraDistance
        }
    }
}
