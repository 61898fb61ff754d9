use cgmath::VectorSpace;
use exhibit_scene::{Vec3, vec3};
use std::f64::consts::PI;
use std::time::Duration;
use tracing::debug;

use super::camera::PerspectiveCamera;
use super::orbit::OrbitControls;

/// Fraction of the way from the camera toward its subject where the orbit
/// target settles after an internal-blend tween.
const LOOK_AHEAD: f64 = 0.05;

pub type Easing = fn(f64) -> f64;

pub fn sinusoidal_in_out(k: f64) -> f64 {
    0.5 * (1.0 - (PI * k).cos())
}

/// Work queued behind a tween, run by the owner once the tween has landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AfterTween {
    FocusInitialNode,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenRequest {
    pub to_position: Vec3,
    pub to_target: Vec3,
    pub internal_blend: bool,
    pub duration: Duration,
    pub after: Option<AfterTween>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum RotationLock {
    Pending,
    Held { previous: bool },
}

#[derive(Clone, Copy, Debug)]
pub struct CameraTween {
    from_position: Vec3,
    to_position: Vec3,
    from_target: Vec3,
    to_target: Vec3,
    elapsed: f64,
    duration: f64,
    easing: Easing,
    internal_blend: bool,
    after: Option<AfterTween>,
    lock: RotationLock,
}

impl CameraTween {
    pub fn destination(&self) -> (Vec3, Vec3) {
        (self.to_position, self.to_target)
    }

    pub fn origin(&self) -> (Vec3, Vec3) {
        (self.from_position, self.from_target)
    }

    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenStatus {
    Idle,
    Running,
    Finished(Option<AfterTween>),
}

/// Holds at most one camera tween. Starting a new one drops the old one
/// without running its completion.
#[derive(Debug, Default)]
pub struct TweenEngine {
    active: Option<CameraTween>,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&CameraTween> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Replaces any in-flight tween. Returns true when one was displaced.
    pub fn start(
        &mut self,
        request: TweenRequest,
        camera: &PerspectiveCamera,
        orbit: &mut OrbitControls,
    ) -> bool {
        let displaced = self.cancel(orbit);
        let to_position = if request.internal_blend {
            vec3(request.to_position.x, request.to_target.y, request.to_position.z)
        } else {
            request.to_position
        };
        debug!(
            to = ?to_position,
            look_at = ?request.to_target,
            displaced,
            "camera tween started"
        );
        self.active = Some(CameraTween {
            from_position: camera.position,
            to_position,
            from_target: orbit.target,
            to_target: request.to_target,
            elapsed: 0.0,
            duration: request.duration.as_secs_f64(),
            easing: sinusoidal_in_out,
            internal_blend: request.internal_blend,
            after: request.after,
            lock: RotationLock::Pending,
        });
        displaced
    }

    /// Drops the in-flight tween, handing back any rotation lock it holds.
    pub fn cancel(&mut self, orbit: &mut OrbitControls) -> bool {
        let Some(tween) = self.active.take() else {
            return false;
        };
        if let RotationLock::Held { previous } = tween.lock {
            orbit.enable_rotate = previous;
        }
        true
    }

    pub fn step(
        &mut self,
        dt: f64,
        camera: &mut PerspectiveCamera,
        orbit: &mut OrbitControls,
    ) -> TweenStatus {
        let Some(mut tween) = self.active.take() else {
            return TweenStatus::Idle;
        };

        // The first tick only takes the lock; time spent before the tween
        // existed does not count toward it.
        if tween.lock == RotationLock::Pending {
            tween.lock = RotationLock::Held {
                previous: orbit.enable_rotate,
            };
            orbit.enable_rotate = false;
        } else {
            tween.elapsed += dt.max(0.0);
        }
        let t = tween.progress();
        let eased = (tween.easing)(t);
        camera.position = tween.from_position.lerp(tween.to_position, eased);
        orbit.target = tween.to_target * t + camera.position * (1.0 - t);
        orbit.update(camera);

        if t < 1.0 {
            self.active = Some(tween);
            return TweenStatus::Running;
        }

        if let RotationLock::Held { previous } = tween.lock {
            orbit.enable_rotate = previous;
        }
        if tween.internal_blend {
            let ahead = tween.to_position.lerp(tween.to_target, LOOK_AHEAD);
            orbit.target = vec3(ahead.x, tween.to_target.y, ahead.z);
            orbit.update(camera);
        }
        debug!(position = ?camera.position, "camera tween finished");
        TweenStatus::Finished(tween.after)
    }
}
