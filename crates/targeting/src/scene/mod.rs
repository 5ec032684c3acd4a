mod builder;
mod candidate;
mod selection;
mod visibility;

pub use builder::{SceneBuilder, SceneError};
pub use candidate::{Candidate, SceneSnapshot};
pub use selection::{query, SelectionArea, SelectionOrder};
pub use visibility::{
    check_visibility, required_successes, EntityRaycastDebug, RaycastDebugCache, RaycastRecord,
    Visibility, FEET_HEIGHT_FRACTION,
};
