use std::time::Instant;

use exhibit_scene::{SceneProvider, Viewport};
use tracing::trace;

use crate::viewer::backend::RenderBackend;
use crate::viewer::input::PointerPos;
use crate::viewer::resolve::resolve;

use super::SceneRuntime;
use super::dispatch::{CLICK_KINDS, HOVER_KINDS};

impl<P: SceneProvider, R: RenderBackend> SceneRuntime<P, R> {
    /// Hover handling. Returns false when the runtime is gone or the event
    /// was held back by the throttle; a held event runs from a later frame
    /// unless a newer one replaces it.
    pub fn pointer_move(&mut self, x: f64, y: f64, now: Instant) -> bool {
        if !self.is_live() {
            return false;
        }
        match self.throttles.moved.offer(now, PointerPos::new(x, y)) {
            Some(pointer) => {
                self.hover_at(pointer);
                true
            }
            None => false,
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, now: Instant) -> bool {
        if !self.is_live() {
            return false;
        }
        match self.throttles.down.offer(now, PointerPos::new(x, y)) {
            Some(pointer) => {
                self.press_at(pointer);
                true
            }
            None => false,
        }
    }

    /// Click handling. A release farther than the click slop from the last
    /// press is a drag and dispatches nothing.
    pub fn pointer_up(&mut self, x: f64, y: f64, now: Instant) -> bool {
        if !self.is_live() {
            return false;
        }
        match self.throttles.up.offer(now, PointerPos::new(x, y)) {
            Some(pointer) => {
                self.release_at(pointer);
                true
            }
            None => false,
        }
    }

    /// Window resize, throttled like the pointer events.
    pub fn resize(&mut self, width: f64, height: f64, now: Instant) -> bool {
        if !self.is_live() {
            return false;
        }
        match self.throttles.resize.offer(now, Viewport::new(width, height)) {
            Some(viewport) => {
                self.apply_viewport(viewport);
                true
            }
            None => false,
        }
    }

    /// Orbit drag by `(dx, dy)` pixels, honoring the current policy.
    pub fn orbit_drag(&mut self, dx: f64, dy: f64) -> bool {
        if !self.is_live() {
            return false;
        }
        self.orbit.rotate(&mut self.camera, dx, dy, self.viewport.height)
    }

    /// Wheel zoom; positive `steps` moves toward the target.
    pub fn orbit_zoom(&mut self, steps: f64) -> bool {
        if !self.is_live() {
            return false;
        }
        self.orbit.zoom(&mut self.camera, steps)
    }

    /// Runs the latest held event of each burst whose window has closed.
    pub(super) fn flush_throttled(&mut self, now: Instant) {
        if let Some(pointer) = self.throttles.down.take_due(now) {
            self.press_at(pointer);
        }
        if let Some(pointer) = self.throttles.up.take_due(now) {
            self.release_at(pointer);
        }
        if let Some(pointer) = self.throttles.moved.take_due(now) {
            trace!(?pointer, "trailing pointer move");
            self.hover_at(pointer);
        }
        if let Some(viewport) = self.throttles.resize.take_due(now) {
            self.apply_viewport(viewport);
        }
    }

    fn hover_at(&mut self, pointer: PointerPos) {
        self.interaction.last_pointer = Some(pointer);
        let hits = self.pick_at(pointer.x, pointer.y);
        self.interaction.over_empty = hits.is_empty();
        let Some(first) = hits.first() else {
            return;
        };

        let mut tagged = None;
        if let Some(scene) = self.scene.as_ref() {
            resolve(scene, first.node, &HOVER_KINDS, |node, _| tagged = Some(node));
        }
        if let Some(node) = tagged {
            self.handle_hover(node, &HOVER_KINDS);
        }
    }

    fn press_at(&mut self, pointer: PointerPos) {
        self.interaction.down_at = Some(pointer);
    }

    fn release_at(&mut self, up: PointerPos) {
        let Some(down) = self.interaction.down_at else {
            trace!("pointer up without a press");
            return;
        };
        if up.moved_beyond(down, self.config.click_slop_px) {
            trace!(?down, ?up, "drag, not a click");
            return;
        }

        let hits = self.pick_at(up.x, up.y);
        let Some(first) = hits.first() else {
            return;
        };
        let mut tagged = None;
        if let Some(scene) = self.scene.as_ref() {
            resolve(scene, first.node, &CLICK_KINDS, |node, _| tagged = Some(node));
        }
        if let Some(node) = tagged {
            self.handle_click(node, &CLICK_KINDS);
        }
    }

    fn apply_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_aspect(viewport);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(viewport);
        }
    }
}
