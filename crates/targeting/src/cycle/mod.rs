mod controller;
mod session;
mod triggers;

pub use controller::CyclingState;
pub use session::{CycleOutcome, TargetingSession};
pub use triggers::{winning_trigger, TriggerKind, TriggerStates};
