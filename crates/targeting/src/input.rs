#[derive(Debug, Clone, Copy, Default)]
pub struct CycleKey {
    was_down: bool,
}

impl CycleKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, is_down: bool) -> bool {
        let pressed = is_down && !self.was_down;
        self.was_down = is_down;
        pressed
    }

    pub fn is_down(&self) -> bool {
        self.was_down
    }
}
