use exhibit_scene::{SceneProvider, TagKind};
use tracing::{debug, info};

use crate::viewer::backend::RenderBackend;
use crate::viewer::events::Notification;
use crate::viewer::tween::{AfterTween, TweenRequest};
use crate::viewer::view::ViewMode;

use super::SceneRuntime;

/// What happens after a forced transition has updated the current mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostTransition {
    ApplyPolicy { with_tween: bool },
    Nothing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewChange {
    /// Step to the next mode in the cycle and apply its policy.
    Advance { with_tween: bool },
    Force { mode: ViewMode, then: PostTransition },
}

impl<P: SceneProvider, R: RenderBackend> SceneRuntime<P, R> {
    /// Switches view mode and tells the host about it. Every call emits one
    /// `ViewChanged`, including forcing the mode already current.
    pub fn change_view(&mut self, change: ViewChange) -> ViewMode {
        let mode = match change {
            ViewChange::Advance { with_tween } => {
                let mode = self.view.advance();
                self.enter_view(mode, with_tween);
                mode
            }
            ViewChange::Force { mode, then } => {
                self.view.force(mode);
                if let PostTransition::ApplyPolicy { with_tween } = then {
                    self.enter_view(mode, with_tween);
                }
                mode
            }
        };
        info!(mode = %mode, "view changed");
        self.notifications.emit(Notification::ViewChanged(mode));
        mode
    }

    /// The host's "next view" control.
    pub fn advance_view(&mut self) -> ViewMode {
        self.change_view(ViewChange::Advance { with_tween: true })
    }

    /// Applies the entry policy of `mode` to controls and scene, optionally
    /// tweening the camera to the mode's pose.
    pub(super) fn enter_view(&mut self, mode: ViewMode, with_tween: bool) {
        let policy = self.config.views.get(mode).clone();
        // A displaced tween hands its rotation lock back before the new
        // policy sets the flags.
        self.tweens.cancel(&mut self.orbit);

        self.orbit.enable_zoom = policy.enable_zoom;
        self.orbit.enable_rotate = policy.enable_rotate;
        self.orbit.max_polar_angle = policy.max_polar_angle;
        self.orbit.min_distance = policy.min_distance;
        self.orbit.max_distance = policy.max_distance;

        if let Some(scene) = self.scene.as_mut() {
            if let Some(ceiling) = self.anchors.ceiling {
                scene.set_visible(ceiling, policy.ceiling_visible);
            }
            if let Some(arrow) = self.anchors.entry_arrow {
                scene.set_visible(arrow, policy.entry_arrow_visible);
            }
            self.labels.set_all(scene, policy.labels_visible, policy.label_scale);
        }
        debug!(mode = %mode, with_tween, "view policy applied");

        if with_tween {
            let request = TweenRequest {
                to_position: policy.pose.position(),
                to_target: policy.pose.target(),
                internal_blend: false,
                duration: self.tween_duration(),
                after: policy.focus_on_arrival.then_some(AfterTween::FocusInitialNode),
            };
            self.move_camera(request);
        }
    }

    pub(super) fn run_after(&mut self, after: AfterTween) {
        match after {
            AfterTween::FocusInitialNode => match self.anchors.initial_focus {
                Some(node) => self.handle_click(node, &[TagKind::Move]),
                None => debug!("no initial focus node to revisit"),
            },
        }
    }
}
