use glam::Vec2;

use super::candidate::Candidate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionArea {
    Circle { radius: f32 },
    Rectangle { half_width: f32, half_height: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOrder {
    CameraDistance,
    ProximityChain,
}

impl SelectionArea {
    pub fn contains(&self, candidate: &Candidate, aim_point: Vec2) -> bool {
        match *self {
            SelectionArea::Circle { radius } => {
                radius.is_finite() && radius > 0.0 && candidate.camera_distance <= radius
            }
            SelectionArea::Rectangle {
                half_width,
                half_height,
            } => {
                if !(half_width.is_finite() && half_height.is_finite())
                    || half_width <= 0.0
                    || half_height <= 0.0
                {
                    return false;
                }
                let offset = candidate.screen_position - aim_point;
                offset.x.abs() <= half_width && offset.y.abs() <= half_height
            }
        }
    }
}

pub fn query(
    candidates: &[Candidate],
    aim_point: Vec2,
    area: SelectionArea,
    order: SelectionOrder,
) -> Vec<Candidate> {
    let mut selected: Vec<Candidate> = candidates
        .iter()
        .filter(|candidate| area.contains(candidate, aim_point))
        .cloned()
        .collect();
    // Stable, so exact ties keep snapshot order.
    selected.sort_by(|a, b| a.camera_distance.total_cmp(&b.camera_distance));

    match order {
        SelectionOrder::CameraDistance => selected,
        SelectionOrder::ProximityChain => proximity_chain(selected),
    }
}

fn proximity_chain(mut remaining: Vec<Candidate>) -> Vec<Candidate> {
    if remaining.is_empty() {
        return remaining;
    }

    let mut chained = Vec::with_capacity(remaining.len());
    chained.push(remaining.remove(0));
    while !remaining.is_empty() {
        let Some(previous) = chained.last().map(|candidate| candidate.world_position) else {
            break;
        };
        let mut best = 0;
        let mut best_distance = f32::INFINITY;
        for (index, candidate) in remaining.iter().enumerate() {
            let distance = candidate.world_position.distance(previous);
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }
        chained.push(remaining.remove(best));
    }
    chained
}
