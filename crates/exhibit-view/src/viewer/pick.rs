use exhibit_scene::{Hit, SceneGraph, Viewport, intersect_objects};

use super::camera::PerspectiveCamera;

/// Nodes under the pixel `(x, y)`, nearest first. An empty list means the
/// pointer is over empty space.
pub fn pick(
    x: f64,
    y: f64,
    viewport: Viewport,
    camera: &PerspectiveCamera,
    scene: &SceneGraph,
) -> Vec<Hit> {
    if !viewport.contains(x, y) {
        return Vec::new();
    }
    let Some(ray) = camera.screen_ray(x, y, viewport) else {
        return Vec::new();
    };
    intersect_objects(scene, scene.children(scene.root()), ray, camera.facing())
}
