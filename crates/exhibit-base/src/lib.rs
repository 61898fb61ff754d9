use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index of a node inside a scene graph arena.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pixel size of the render container.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        if self.height <= f64::EPSILON {
            1.0
        } else {
            self.width / self.height
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to load asset {url}: {reason}")]
    Load { url: String, reason: String },
    #[error("malformed scene description: {0}")]
    Parse(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_contains_edges() {
        let viewport = Viewport::new(800.0, 600.0);
        assert!(viewport.contains(0.0, 0.0));
        assert!(viewport.contains(800.0, 600.0));
        assert!(!viewport.contains(-1.0, 10.0));
        assert!(!viewport.contains(10.0, 601.0));
    }

    #[test]
    fn degenerate_viewport_has_unit_aspect() {
        assert_eq!(Viewport::new(100.0, 0.0).aspect(), 1.0);
        assert_eq!(Viewport::new(200.0, 100.0).aspect(), 2.0);
    }
}
