use exhibit_scene::{Vec3, vec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Internal,
    Vertical,
    External,
}

impl ViewMode {
    /// Successor in the fixed cycle internal → vertical → external → internal.
    pub fn next(self) -> Self {
        match self {
            Self::Internal => Self::Vertical,
            Self::Vertical => Self::External,
            Self::External => Self::Internal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Vertical => "vertical",
            Self::External => "external",
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: [f64; 3],
    pub target: [f64; 3],
}

impl CameraPose {
    pub const fn new(position: [f64; 3], target: [f64; 3]) -> Self {
        Self { position, target }
    }

    pub fn position(&self) -> Vec3 {
        vec3(self.position[0], self.position[1], self.position[2])
    }

    pub fn target(&self) -> Vec3 {
        vec3(self.target[0], self.target[1], self.target[2])
    }
}

/// Everything a view mode sets on entry. Applying a policy twice leaves the
/// same state as applying it once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewModePolicy {
    pub enable_zoom: bool,
    pub enable_rotate: bool,
    pub max_polar_angle: f64,
    pub min_distance: f64,
    /// `None` leaves zoom distance unbounded.
    pub max_distance: Option<f64>,
    pub ceiling_visible: bool,
    pub entry_arrow_visible: bool,
    pub labels_visible: bool,
    pub label_scale: [f64; 2],
    pub pose: CameraPose,
    /// Re-dispatch the initial focus node once the entry tween lands.
    pub focus_on_arrival: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewPolicies {
    pub internal: ViewModePolicy,
    pub vertical: ViewModePolicy,
    pub external: ViewModePolicy,
}

impl ViewPolicies {
    pub fn get(&self, mode: ViewMode) -> &ViewModePolicy {
        match mode {
            ViewMode::Internal => &self.internal,
            ViewMode::Vertical => &self.vertical,
            ViewMode::External => &self.external,
        }
    }
}

pub const LABEL_SCALE: [f64; 2] = [8.0, 6.0];
pub const LABEL_EXPANDED_SCALE: [f64; 2] = [85.0, 70.0];

impl Default for ViewPolicies {
    fn default() -> Self {
        Self {
            internal: ViewModePolicy {
                enable_zoom: false,
                enable_rotate: true,
                max_polar_angle: PI * 0.7,
                min_distance: 0.0,
                max_distance: None,
                ceiling_visible: true,
                entry_arrow_visible: false,
                labels_visible: false,
                label_scale: LABEL_SCALE,
                pose: CameraPose::new([-6.7, 44.0, 497.0], [5.79, 26.0, 26.0]),
                focus_on_arrival: true,
            },
            vertical: ViewModePolicy {
                enable_zoom: true,
                enable_rotate: false,
                max_polar_angle: PI * 0.7,
                min_distance: 500.0,
                max_distance: Some(900.0),
                ceiling_visible: false,
                entry_arrow_visible: true,
                labels_visible: true,
                label_scale: LABEL_EXPANDED_SCALE,
                pose: CameraPose::new([0.0, 672.0, 0.0], [0.0, 0.0, -1.0]),
                focus_on_arrival: false,
            },
            external: ViewModePolicy {
                enable_zoom: true,
                enable_rotate: true,
                max_polar_angle: PI,
                min_distance: 500.0,
                max_distance: Some(900.0),
                ceiling_visible: true,
                entry_arrow_visible: true,
                labels_visible: false,
                label_scale: LABEL_SCALE,
                pose: CameraPose::new([-315.0, 350.0, 478.0], [0.0, 0.0, -1.0]),
                focus_on_arrival: false,
            },
        }
    }
}

/// Owns the current view mode. Only the runtime drives it.
#[derive(Clone, Debug)]
pub struct ViewStateMachine {
    current: ViewMode,
}

impl Default for ViewStateMachine {
    fn default() -> Self {
        Self::new(ViewMode::Internal)
    }
}

impl ViewStateMachine {
    pub fn new(initial: ViewMode) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> ViewMode {
        self.current
    }

    pub fn advance(&mut self) -> ViewMode {
        self.current = self.current.next();
        self.current
    }

    pub fn force(&mut self, mode: ViewMode) -> ViewMode {
        self.current = mode;
        self.current
    }
}
