use exhibit_scene::{NodeId, SceneGraph, Viewport};

use super::camera::PerspectiveCamera;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Resize,
    PointerMove,
    PointerDown,
    PointerUp,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 4] = [
        ListenerKind::Resize,
        ListenerKind::PointerMove,
        ListenerKind::PointerDown,
        ListenerKind::PointerUp,
    ];
}

/// Renderer plus the container it draws into.
pub trait RenderBackend {
    fn attach_listener(&mut self, kind: ListenerKind);
    fn detach_listener(&mut self, kind: ListenerKind);
    fn resize(&mut self, viewport: Viewport);
    fn draw(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera);
    /// Frees GPU geometry and material of one drawable node.
    fn dispose_drawable(&mut self, node: NodeId);
    fn force_context_loss(&mut self);
    fn dispose(&mut self);
}

/// Backend that draws nothing and records what it was asked to do.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeadlessBackend {
    pub listeners: Vec<ListenerKind>,
    pub viewport: Option<Viewport>,
    pub draws: usize,
    pub disposed_nodes: Vec<NodeId>,
    pub context_lost: bool,
    pub disposed: bool,
}

impl RenderBackend for HeadlessBackend {
    fn attach_listener(&mut self, kind: ListenerKind) {
        if !self.listeners.contains(&kind) {
            self.listeners.push(kind);
        }
    }

    fn detach_listener(&mut self, kind: ListenerKind) {
        self.listeners.retain(|listener| *listener != kind);
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn draw(&mut self, _scene: &SceneGraph, _camera: &PerspectiveCamera) {
        self.draws += 1;
    }

    fn dispose_drawable(&mut self, node: NodeId) {
        self.disposed_nodes.push(node);
    }

    fn force_context_loss(&mut self) {
        self.context_lost = true;
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }
}
