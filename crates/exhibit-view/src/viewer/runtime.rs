use std::time::{Duration, Instant};

use cgmath::{Quaternion, Rad, Rotation3};
use exhibit_base::{Error, Result};
use exhibit_scene::{Hit, NodeId, SceneGraph, SceneProvider, Viewport};
use tracing::{debug, error, info};

use crate::config::ExhibitConfig;

use super::animation::AnimationPlayer;
use super::backend::{ListenerKind, RenderBackend};
use super::camera::PerspectiveCamera;
use super::events::{Notification, NotificationQueue};
use super::input::{InteractionState, PointerPos};
use super::labels::LabelSet;
use super::orbit::OrbitControls;
use super::pick::pick;
use super::throttle::Throttle;
use super::tween::{CameraTween, TweenEngine, TweenRequest, TweenStatus};
use super::view::{ViewMode, ViewStateMachine};

mod dispatch;
mod pointer;
mod views;

pub use views::{PostTransition, ViewChange};

/// Named scene parts the runtime drives directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneAnchors {
    pub initial_focus: Option<NodeId>,
    pub entry_arrow: Option<NodeId>,
    pub ceiling: Option<NodeId>,
}

/// One throttle per host event stream.
#[derive(Clone, Copy, Debug)]
struct EventThrottles {
    moved: Throttle<PointerPos>,
    down: Throttle<PointerPos>,
    up: Throttle<PointerPos>,
    resize: Throttle<Viewport>,
}

impl EventThrottles {
    fn new(interval: Duration) -> Self {
        Self {
            moved: Throttle::new(interval),
            down: Throttle::new(interval),
            up: Throttle::new(interval),
            resize: Throttle::new(interval),
        }
    }
}

/// One live exhibition scene: camera, orbit controls, the view state
/// machine, the tween engine and pick dispatch, on top of a provider and a
/// render backend.
pub struct SceneRuntime<P: SceneProvider, R: RenderBackend> {
    config: ExhibitConfig,
    provider: P,
    renderer: Option<R>,
    scene: Option<SceneGraph>,
    model: Option<NodeId>,
    anchors: SceneAnchors,
    labels: LabelSet,
    animation: Option<AnimationPlayer>,
    camera: PerspectiveCamera,
    orbit: OrbitControls,
    tweens: TweenEngine,
    view: ViewStateMachine,
    interaction: InteractionState,
    notifications: NotificationQueue,
    viewport: Viewport,
    throttles: EventThrottles,
    intro_remaining: Option<Duration>,
    last_frame: Option<Instant>,
}

impl<P: SceneProvider, R: RenderBackend> SceneRuntime<P, R> {
    pub fn new(config: ExhibitConfig, provider: P, mut renderer: R, viewport: Viewport) -> Self {
        let camera = PerspectiveCamera::new(&config.camera, viewport);
        let orbit = OrbitControls {
            enable_pan: false,
            ..OrbitControls::default()
        };
        renderer.resize(viewport);
        for kind in ListenerKind::ALL {
            renderer.attach_listener(kind);
        }
        let throttles = EventThrottles::new(Duration::from_millis(config.throttle_ms));
        Self {
            config,
            provider,
            renderer: Some(renderer),
            scene: Some(SceneGraph::new()),
            model: None,
            anchors: SceneAnchors::default(),
            labels: LabelSet::default(),
            animation: None,
            camera,
            orbit,
            tweens: TweenEngine::new(),
            view: ViewStateMachine::default(),
            interaction: InteractionState::default(),
            notifications: NotificationQueue::new(),
            viewport,
            throttles,
            intro_remaining: None,
            last_frame: None,
        }
    }

    /// Loads the configured scene and arms the intro tween. A failed load is
    /// logged and leaves the runtime without a model.
    pub fn load(&mut self) -> Result<()> {
        let url = self.config.scene_url.clone();
        let asset = self
            .provider
            .load(&url, &mut |progress| {
                debug!(loaded = progress.loaded, total = progress.total, "loading scene");
            })
            .inspect_err(|err| error!(url = %url, error = %err, "scene load failed"))?;

        let Some(scene) = self.scene.as_mut() else {
            return Err(Error::InvalidParameter("scene runtime already disposed".to_string()));
        };
        let root = scene.root();
        let model = scene.insert_template(root, &asset.root)?;

        let anchors = SceneAnchors {
            initial_focus: scene.find_by_tag_name(model, &self.config.initial_focus_tag),
            entry_arrow: scene.find_by_tag_name(model, &self.config.entry_arrow_tag),
            ceiling: scene.find_by_name(model, &self.config.ceiling_name),
        };
        if let Some(arrow) = anchors.entry_arrow {
            scene.set_visible(arrow, false);
        }
        self.labels =
            LabelSet::build(scene, model, self.config.label_scale, self.config.label_lift)?;
        self.animation = Some(AnimationPlayer::new(
            &asset.clips,
            self.config.animation_start,
            &self.config.clip_time_scales,
        ));

        self.camera.position = self.config.intro_pose.position();
        self.orbit.target = self.config.intro_pose.target();
        self.camera.look_at(self.orbit.target);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.draw(scene, &self.camera);
        }

        info!(
            url = %url,
            nodes = scene.len(),
            labels = self.labels.len(),
            clips = asset.clips.len(),
            focus = ?anchors.initial_focus,
            "scene loaded"
        );
        self.model = Some(model);
        self.anchors = anchors;
        self.intro_remaining = Some(Duration::from_millis(self.config.intro_delay_ms));
        Ok(())
    }

    /// One display refresh: held-back input, intro timer, tween step,
    /// animation, draw.
    pub fn frame(&mut self, now: Instant) {
        if !self.is_live() {
            return;
        }
        let dt = self
            .last_frame
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_frame = Some(now);
        self.flush_throttled(now);

        if let Some(remaining) = self.intro_remaining {
            if dt >= remaining {
                self.intro_remaining = None;
                debug!("intro delay elapsed");
                self.enter_view(ViewMode::Internal, true);
            } else {
                self.intro_remaining = Some(remaining - dt);
            }
        }

        let secs = dt.as_secs_f64();
        let status = self.tweens.step(secs, &mut self.camera, &mut self.orbit);
        if let TweenStatus::Finished(Some(after)) = status {
            self.run_after(after);
        }

        if let Some(animation) = self.animation.as_mut() {
            animation.update(secs);
        }
        self.idle_spin();

        if let (Some(renderer), Some(scene)) = (self.renderer.as_mut(), self.scene.as_ref()) {
            renderer.draw(scene, &self.camera);
        }
    }

    /// Starts a camera tween from the current camera position, replacing
    /// any tween in flight.
    pub fn move_camera(&mut self, request: TweenRequest) -> bool {
        self.tweens.start(request, &self.camera, &mut self.orbit)
    }

    /// Hits under the pixel `(x, y)`, nearest first.
    pub fn pick_at(&self, x: f64, y: f64) -> Vec<Hit> {
        match self.scene.as_ref() {
            Some(scene) => pick(x, y, self.viewport, &self.camera, scene),
            None => Vec::new(),
        }
    }

    /// Releases the scene and the renderer. Returns the released renderer
    /// on the first call and `None` afterwards.
    pub fn dispose(&mut self) -> Option<R> {
        let mut renderer = self.renderer.take();
        let scene = self.scene.take();
        if renderer.is_none() && scene.is_none() {
            debug!("scene runtime already disposed");
            return None;
        }

        self.tweens.cancel(&mut self.orbit);
        if let Some(renderer) = renderer.as_mut() {
            for kind in ListenerKind::ALL {
                renderer.detach_listener(kind);
            }
        }

        if let Some(mut scene) = scene {
            if let Some(model) = self.model {
                for id in scene.traverse(model) {
                    let drawable = scene.get(id).is_some_and(|node| node.is_drawable());
                    if let (true, Some(renderer)) = (drawable, renderer.as_mut()) {
                        renderer.dispose_drawable(id);
                    }
                }
                scene.detach(model);
            }
            scene.clear();
        }

        if let Some(renderer) = renderer.as_mut() {
            renderer.force_context_loss();
            renderer.dispose();
        }
        self.provider.clear_cache();

        self.model = None;
        self.anchors = SceneAnchors::default();
        self.labels = LabelSet::default();
        self.animation = None;
        self.intro_remaining = None;
        info!("scene runtime disposed");
        renderer
    }

    pub fn is_live(&self) -> bool {
        self.renderer.is_some() && self.scene.is_some()
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view.current()
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn orbit(&self) -> &OrbitControls {
        &self.orbit
    }

    pub fn active_tween(&self) -> Option<&CameraTween> {
        self.tweens.active()
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    pub fn model(&self) -> Option<NodeId> {
        self.model
    }

    pub fn anchors(&self) -> SceneAnchors {
        self.anchors
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn animation(&self) -> Option<&AnimationPlayer> {
        self.animation.as_ref()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &ExhibitConfig {
        &self.config
    }

    fn tween_duration(&self) -> Duration {
        Duration::from_millis(self.config.tween_duration_ms)
    }

    fn idle_spin(&mut self) {
        let (Some(rate), true) = (self.config.idle_spin, self.interaction.over_empty) else {
            return;
        };
        let (Some(model), Some(scene)) = (self.model, self.scene.as_mut()) else {
            return;
        };
        if let Some(node) = scene.get_mut(model) {
            node.rotation = node.rotation * Quaternion::from_angle_y(Rad(rate));
        }
    }
}
