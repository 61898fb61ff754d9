use std::collections::HashMap;
use std::fs;
use std::path::Path;

use exhibit_base::Result;
use serde::{Deserialize, Serialize};

use crate::viewer::{CameraPose, LABEL_SCALE, ViewPolicies};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 45.0,
            near: 1.0,
            far: 5000.0,
        }
    }
}

/// Construction-time settings for a [`crate::SceneRuntime`]. Nothing here is
/// read back after the runtime is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExhibitConfig {
    pub scene_url: String,
    pub camera: CameraConfig,
    /// Camera placement right after the scene is loaded.
    pub intro_pose: CameraPose,
    /// Delay before the first internal view tween starts.
    pub intro_delay_ms: u64,
    pub tween_duration_ms: u64,
    pub views: ViewPolicies,
    pub label_scale: [f64; 2],
    /// Height of a label sprite above its source node.
    pub label_lift: f64,
    /// Rate limit shared by the pointer and resize event streams.
    pub throttle_ms: u64,
    /// Max pointer travel between down and up still treated as a click.
    pub click_slop_px: f64,
    pub initial_focus_tag: String,
    pub entry_arrow_tag: String,
    pub ceiling_name: String,
    /// Playback position all clips start from, in seconds.
    pub animation_start: f64,
    pub clip_time_scales: HashMap<String, f64>,
    /// Radians per frame the model turns while the pointer is off the model.
    pub idle_spin: Option<f64>,
}

impl Default for ExhibitConfig {
    fn default() -> Self {
        Self {
            scene_url: "exhibition.json".to_string(),
            camera: CameraConfig::default(),
            intro_pose: CameraPose::new([-556.0, 563.0, 227.0], [0.0, 0.0, -1.0]),
            intro_delay_ms: 800,
            tween_duration_ms: 3000,
            views: ViewPolicies::default(),
            label_scale: LABEL_SCALE,
            label_lift: 3.0,
            throttle_ms: 100,
            click_slop_px: 2.0,
            initial_focus_tag: "move-computer".to_string(),
            entry_arrow_tag: "enter-arrow".to_string(),
            ceiling_name: "ceiling".to_string(),
            animation_start: 1.0,
            clip_time_scales: HashMap::new(),
            idle_spin: None,
        }
    }
}

impl ExhibitConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ExhibitConfig =
            serde_json::from_str(r#"{ "tween_duration_ms": 500, "ceiling_name": "roof" }"#)
                .expect("valid config");
        assert_eq!(config.tween_duration_ms, 500);
        assert_eq!(config.ceiling_name, "roof");
        assert_eq!(config.intro_delay_ms, 800);
        assert_eq!(config.views, ViewPolicies::default());
    }
}
