use std::collections::HashSet;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPos {
    pub x: f64,
    pub y: f64,
}

impl PointerPos {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when either axis moved farther than `slop` pixels.
    pub fn moved_beyond(self, other: PointerPos, slop: f64) -> bool {
        (self.x - other.x).abs() > slop || (self.y - other.y).abs() > slop
    }
}

#[derive(Clone, Debug, Default)]
pub struct InteractionState {
    pub down_at: Option<PointerPos>,
    pub last_pointer: Option<PointerPos>,
    pub hover_target: Option<String>,
    pub over_empty: bool,
    opened_pages: HashSet<String>,
}

impl InteractionState {
    /// Records `content_id` as opened. Returns true the first time only.
    pub fn open_page(&mut self, content_id: &str) -> bool {
        self.opened_pages.insert(content_id.to_string())
    }

    pub fn was_opened(&self, content_id: &str) -> bool {
        self.opened_pages.contains(content_id)
    }
}
