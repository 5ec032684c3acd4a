pub mod math;
mod projection;
mod rotation;

pub use projection::{aim_point, edge_sample_points, edge_world_positions, point_along_ray};
pub use rotation::{view_basis, RotationTracker, ROTATION_SLOTS};
