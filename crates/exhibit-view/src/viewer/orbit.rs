use cgmath::InnerSpace;
use exhibit_scene::{Vec3, vec3};
use std::f64::consts::PI;

use super::camera::PerspectiveCamera;

const POLAR_EPS: f64 = 1.0e-6;

/// Orbit navigation around `target`, in the style of an orbit-controls
/// widget: spherical offset, polar clamp, distance clamp, enable flags.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub min_polar_angle: f64,
    pub max_polar_angle: f64,
    pub min_distance: f64,
    pub max_distance: Option<f64>,
    pub rotate_speed: f64,
    pub zoom_speed: f64,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: vec3(0.0, 0.0, 0.0),
            enable_rotate: true,
            enable_zoom: true,
            enable_pan: false,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            min_distance: 0.0,
            max_distance: None,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

impl OrbitControls {
    /// Turns the camera by a pointer drag of `(dx, dy)` pixels. Returns false
    /// when rotation is disabled.
    pub fn rotate(
        &mut self,
        camera: &mut PerspectiveCamera,
        dx: f64,
        dy: f64,
        height: f64,
    ) -> bool {
        if !self.enable_rotate || height <= 0.0 {
            return false;
        }
        let (radius, theta, phi) = self.spherical(camera);
        let theta = theta - 2.0 * PI * dx / height * self.rotate_speed;
        let phi = phi - 2.0 * PI * dy / height * self.rotate_speed;
        camera.position = self.target + from_spherical(radius, theta, phi);
        self.update(camera);
        true
    }

    /// Dollies toward (`steps > 0`) or away from the target.
    pub fn zoom(&mut self, camera: &mut PerspectiveCamera, steps: f64) -> bool {
        if !self.enable_zoom {
            return false;
        }
        let (radius, theta, phi) = self.spherical(camera);
        let scale = 0.95_f64.powf(self.zoom_speed * steps);
        camera.position = self.target + from_spherical(radius * scale, theta, phi);
        self.update(camera);
        true
    }

    /// Applies the polar and distance clamps and re-aims the camera.
    pub fn update(&self, camera: &mut PerspectiveCamera) {
        let (radius, theta, phi) = self.spherical(camera);
        let phi = phi
            .clamp(self.min_polar_angle, self.max_polar_angle.max(self.min_polar_angle))
            .clamp(POLAR_EPS, PI - POLAR_EPS);
        let mut radius = radius.max(self.min_distance);
        if let Some(max) = self.max_distance {
            radius = radius.min(max);
        }
        camera.position = self.target + from_spherical(radius, theta, phi);
        camera.look_at(self.target);
    }

    pub fn distance(&self, camera: &PerspectiveCamera) -> f64 {
        (camera.position - self.target).magnitude()
    }

    fn spherical(&self, camera: &PerspectiveCamera) -> (f64, f64, f64) {
        let offset = camera.position - self.target;
        let radius = offset.magnitude();
        if radius <= f64::EPSILON {
            return (0.0, 0.0, 0.0);
        }
        let theta = offset.x.atan2(offset.z);
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        (radius, theta, phi)
    }
}

fn from_spherical(radius: f64, theta: f64, phi: f64) -> Vec3 {
    let sin_phi = phi.sin();
    vec3(
        radius * sin_phi * theta.sin(),
        radius * phi.cos(),
        radius * sin_phi * theta.cos(),
    )
}
