use crate::config::ResetRules;
use crate::geometry::ROTATION_SLOTS;

const TRIGGER_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    CameraRotation,
    SetChanged,
    ClosestChanged,
}

impl TriggerKind {
    pub const ORDER: [TriggerKind; TRIGGER_COUNT] = [
        TriggerKind::CameraRotation,
        TriggerKind::SetChanged,
        TriggerKind::ClosestChanged,
    ];

    pub const fn index(self) -> usize {
        match self {
            TriggerKind::CameraRotation => 0,
            TriggerKind::SetChanged => 1,
            TriggerKind::ClosestChanged => 2,
        }
    }

    pub const fn from_index(index: usize) -> Self {
        Self::ORDER[index % TRIGGER_COUNT]
    }

    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub const fn previous(self) -> Self {
        Self::from_index(self.index() + TRIGGER_COUNT - 1)
    }

    pub const fn rotation_slot(self) -> usize {
        self.index()
    }

    pub const fn name(self) -> &'static str {
        match self {
            TriggerKind::CameraRotation => "camera_rotation",
            TriggerKind::SetChanged => "set_changed",
            TriggerKind::ClosestChanged => "closest_changed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerStates {
    pub camera_pending: [bool; ROTATION_SLOTS],
    pub set_changed: bool,
    pub closest_changed: bool,
}

impl TriggerStates {
    pub fn value(&self, kind: TriggerKind, rule: TriggerKind) -> bool {
        match kind {
            TriggerKind::CameraRotation => self
                .camera_pending
                .get(rule.rotation_slot())
                .copied()
                .unwrap_or(false),
            TriggerKind::SetChanged => self.set_changed,
            TriggerKind::ClosestChanged => self.closest_changed,
        }
    }
}

pub fn winning_trigger(rules: &ResetRules, states: &TriggerStates) -> Option<TriggerKind> {
    TriggerKind::ORDER.into_iter().find(|&kind| {
        let rule = rules.rule(kind);
        rule.enabled
            && states.value(kind, kind)
            && rule
                .required_co_triggers(kind)
                .all(|co_trigger| states.value(co_trigger, kind))
    })
}
