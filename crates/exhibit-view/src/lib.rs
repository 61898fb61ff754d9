pub mod config;
pub mod viewer;

pub use config::{CameraConfig, ExhibitConfig};
pub use viewer::{HeadlessBackend, Notification, RenderBackend, SceneRuntime, ViewMode};
