mod animation;
mod backend;
mod camera;
mod events;
mod input;
mod labels;
mod orbit;
mod pick;
mod resolve;
mod runtime;
mod throttle;
mod tween;
mod view;

pub use animation::{AnimationPlayer, ClipAction};
pub use backend::{HeadlessBackend, ListenerKind, RenderBackend};
pub use camera::PerspectiveCamera;
pub use events::{Notification, NotificationQueue, SecondaryPage};
pub use input::{InteractionState, PointerPos};
pub use labels::{LabelSet, LabelSprite};
pub use orbit::OrbitControls;
pub use pick::pick;
pub use resolve::{resolve, tagged_ancestor};
pub use runtime::{PostTransition, SceneAnchors, SceneRuntime, ViewChange};
pub use throttle::Throttle;
pub use tween::{
    AfterTween, CameraTween, Easing, TweenEngine, TweenRequest, TweenStatus, sinusoidal_in_out,
};
pub use view::{
    CameraPose, LABEL_EXPANDED_SCALE, LABEL_SCALE, ViewMode, ViewModePolicy, ViewPolicies,
    ViewStateMachine,
};
