use glam::Vec2;

use crate::geometry::ROTATION_SLOTS;
use crate::host::{EntityId, GameHost};
use crate::scene::{Candidate, EntityRaycastDebug, SelectionArea};

pub type Rgba = [u8; 4];

pub const AIM_COLOR: Rgba = [255, 255, 255, 255];
pub const AREA_COLOR: Rgba = [176, 198, 220, 160];
pub const ROTATION_BELOW_COLOR: Rgba = [66, 135, 245, 200];
pub const ROTATION_EXCEEDED_COLOR: Rgba = [255, 165, 0, 220];
pub const HOSTILE_COLOR: Rgba = [235, 64, 52, 255];
pub const NEUTRAL_COLOR: Rgba = [240, 210, 60, 255];
pub const OTHER_COLOR: Rgba = [120, 220, 120, 255];
pub const LABEL_COLOR: Rgba = [244, 248, 252, 255];
pub const SAMPLE_ORIGIN_COLOR: Rgba = [255, 0, 0, 255];
pub const RAY_CLEAR_COLOR: Rgba = [0, 255, 0, 160];
pub const RAY_BLOCKED_COLOR: Rgba = [255, 0, 0, 160];
pub const FEET_COLOR: Rgba = [255, 255, 0, 255];
pub const HEAD_COLOR: Rgba = [0, 255, 255, 255];

const AIM_DOT_RADIUS: f32 = 4.0;
const ROTATION_RING_RADIUS: f32 = 24.0;
const CANDIDATE_DOT_RADIUS: f32 = 5.0;
const SAMPLE_DOT_RADIUS: f32 = 3.0;
const BODY_DOT_RADIUS: f32 = 4.0;
const LABEL_OFFSET: Vec2 = Vec2::new(8.0, -8.0);
const STATUS_ORIGIN: Vec2 = Vec2::new(12.0, 12.0);
const STATUS_LINE_ADVANCE: f32 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
        filled: bool,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgba,
    },
    Rect {
        min: Vec2,
        max: Vec2,
        color: Rgba,
    },
    Text {
        position: Vec2,
        text: String,
        color: Rgba,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub shapes: Vec<Shape>,
}

impl Overlay {
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Rgba, filled: bool) {
        self.shapes.push(Shape::Circle {
            center,
            radius,
            color,
            filled,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        self.shapes.push(Shape::Line { from, to, color });
    }

    fn text(&mut self, position: Vec2, text: String, color: Rgba) {
        self.shapes.push(Shape::Text {
            position,
            text,
            color,
        });
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationStatus {
    pub fraction: f32,
    pub threshold: f32,
    pub pending: bool,
}

impl RotationStatus {
    pub fn exceeded(&self) -> bool {
        self.pending || self.fraction >= self.threshold
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SelectionView<'a> {
    pub aim_point: Vec2,
    pub area: SelectionArea,
    pub selection: &'a [Candidate],
    pub cycle_index: Option<usize>,
    pub rotation: [RotationStatus; ROTATION_SLOTS],
    pub camera_reset_enabled: bool,
}

fn candidate_color(candidate: &Candidate) -> Rgba {
    if candidate.hostile {
        HOSTILE_COLOR
    } else if candidate.neutral {
        NEUTRAL_COLOR
    } else {
        OTHER_COLOR
    }
}

fn candidate_flags(candidate: &Candidate) -> String {
    let mut text = format!("{:?} faction {}", candidate.kind, candidate.faction);
    for (set, name) in [
        (candidate.hostile, "hostile"),
        (candidate.neutral, "neutral"),
        (candidate.player, "player"),
        (candidate.pet, "pet"),
    ] {
        if set {
            text.push(' ');
            text.push_str(name);
        }
    }
    text
}

pub fn draw_selection(overlay: &mut Overlay, view: &SelectionView<'_>) {
    let aim = view.aim_point;
    overlay.circle(aim, AIM_DOT_RADIUS, AIM_COLOR, true);

    if view.camera_reset_enabled {
        let camera_slot = view.rotation[0];
        let (progress, color) = if camera_slot.exceeded() {
            (1.0, ROTATION_EXCEEDED_COLOR)
        } else if camera_slot.threshold > 0.0 {
            (
                (camera_slot.fraction / camera_slot.threshold).clamp(0.0, 1.0),
                ROTATION_BELOW_COLOR,
            )
        } else {
            (0.0, ROTATION_BELOW_COLOR)
        };
        overlay.circle(aim, ROTATION_RING_RADIUS, AREA_COLOR, false);
        if progress > 0.0 {
            overlay.circle(aim, ROTATION_RING_RADIUS * progress, color, true);
        }
    }

    match view.area {
        SelectionArea::Circle { radius } if radius > 0.0 => {
            overlay.circle(aim, radius, AREA_COLOR, false);
        }
        SelectionArea::Rectangle {
            half_width,
            half_height,
        } if half_width > 0.0 && half_height > 0.0 => {
            let half = Vec2::new(half_width, half_height);
            overlay.shapes.push(Shape::Rect {
                min: aim - half,
                max: aim + half,
                color: AREA_COLOR,
            });
        }
        _ => {}
    }

    for (index, candidate) in view.selection.iter().enumerate() {
        let color = candidate_color(candidate);
        overlay.line(aim, candidate.screen_position, color);
        overlay.circle(candidate.screen_position, CANDIDATE_DOT_RADIUS, color, true);
        let marker = if view.cycle_index == Some(index) { ">" } else { "" };
        overlay.text(
            candidate.screen_position + LABEL_OFFSET,
            format!(
                "{marker}{} {} ({:.1}y)",
                index + 1,
                candidate.label,
                candidate.world_distance
            ),
            LABEL_COLOR,
        );
        overlay.text(
            candidate.screen_position + LABEL_OFFSET + Vec2::Y * STATUS_LINE_ADVANCE,
            candidate_flags(candidate),
            LABEL_COLOR,
        );
    }

    let mut status = vec![format!("targets: {}", view.selection.len())];
    for (slot, rotation) in view.rotation.iter().enumerate() {
        status.push(format!(
            "rot {slot}: {:.0}%/{:.0}%{}",
            rotation.fraction * 100.0,
            rotation.threshold * 100.0,
            if rotation.pending { " pending" } else { "" }
        ));
    }
    for (line, text) in status.into_iter().enumerate() {
        let position = STATUS_ORIGIN + Vec2::Y * (line as f32 * STATUS_LINE_ADVANCE);
        overlay.text(position, text, LABEL_COLOR);
    }
}

pub fn draw_raycasts(
    overlay: &mut Overlay,
    host: &dyn GameHost,
    entries: &[(EntityId, EntityRaycastDebug)],
) {
    for (_, entry) in entries {
        for ray in &entry.rays {
            let Some(origin) = host.world_to_screen(ray.origin) else {
                continue;
            };
            if let Some(target) = host.world_to_screen(ray.target) {
                let color = if ray.visible {
                    RAY_CLEAR_COLOR
                } else {
                    RAY_BLOCKED_COLOR
                };
                overlay.line(origin.position, target.position, color);
            }
            overlay.circle(origin.position, SAMPLE_DOT_RADIUS, SAMPLE_ORIGIN_COLOR, true);
        }

        if let Some(feet) = entry.feet_screen.filter(|feet| feet.in_view) {
            overlay.circle(feet.position, BODY_DOT_RADIUS, FEET_COLOR, true);
        }
        if let Some(head) = entry.head_screen.filter(|head| head.in_view) {
            overlay.circle(head.position, BODY_DOT_RADIUS, HEAD_COLOR, true);
            overlay.text(
                head.position + LABEL_OFFSET,
                format!("{:.0}%", entry.visibility_percent),
                LABEL_COLOR,
            );
        }
    }
}
