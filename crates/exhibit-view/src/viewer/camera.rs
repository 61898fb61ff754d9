use cgmath::{Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, SquareMatrix, Vector4, perspective};
use exhibit_scene::{Ray, SpriteFacing, Vec3, Viewport, vec3};

use crate::config::CameraConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    look_target: Vec3,
    pub up: Vec3,
    pub fov_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, viewport: Viewport) -> Self {
        Self {
            position: vec3(0.0, 0.0, 1.0),
            look_target: vec3(0.0, 0.0, 0.0),
            up: vec3(0.0, 1.0, 0.0),
            fov_deg: config.fov_deg,
            aspect: viewport.aspect(),
            near: config.near,
            far: config.far,
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.look_target = target;
    }

    pub fn look_target(&self) -> Vec3 {
        self.look_target
    }

    pub fn set_aspect(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
    }

    pub fn forward(&self) -> Vec3 {
        let dir = self.look_target - self.position;
        if dir.magnitude() <= f64::EPSILON {
            vec3(0.0, 0.0, -1.0)
        } else {
            dir.normalize()
        }
    }

    pub fn facing(&self) -> SpriteFacing {
        let forward = self.forward();
        let mut right = forward.cross(self.up);
        if right.magnitude() <= 1.0e-6 {
            right = forward.cross(vec3(0.0, 0.0, -1.0));
        }
        let right = right.normalize();
        SpriteFacing {
            right,
            up: right.cross(forward).normalize(),
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f64> {
        let up = self.facing().up;
        Matrix4::look_at_rh(
            Point3::from_vec(self.position),
            Point3::from_vec(self.position + self.forward()),
            up,
        )
    }

    pub fn projection_matrix(&self) -> Matrix4<f64> {
        perspective(Deg(self.fov_deg), self.aspect, self.near, self.far)
    }

    /// World-space ray through the pixel `(x, y)` of `viewport`.
    pub fn screen_ray(&self, x: f64, y: f64, viewport: Viewport) -> Option<Ray> {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return None;
        }
        let ndc_x = 2.0 * x / viewport.width - 1.0;
        let ndc_y = -(2.0 * y / viewport.height - 1.0);
        let inverse = (self.projection_matrix() * self.view_matrix()).invert()?;
        let unproject = |z: f64| {
            let p = inverse * Vector4::new(ndc_x, ndc_y, z, 1.0);
            vec3(p.x / p.w, p.y / p.w, p.z / p.w)
        };
        let dir = unproject(1.0) - unproject(-1.0);
        if dir.magnitude() <= f64::EPSILON {
            return None;
        }
        Some(Ray::new(self.position, dir))
    }

    /// Pixel of `viewport` that `point` lands on, or `None` behind the camera.
    pub fn project(&self, point: Vec3, viewport: Viewport) -> Option<(f64, f64)> {
        let clip = self.projection_matrix()
            * self.view_matrix()
            * Vector4::new(point.x, point.y, point.z, 1.0);
        if clip.w <= f64::EPSILON {
            return None;
        }
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        Some((
            (ndc_x + 1.0) * 0.5 * viewport.width,
            (1.0 - ndc_y) * 0.5 * viewport.height,
        ))
    }
}
