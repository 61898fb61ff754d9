use exhibit_scene::{NodeId, SceneProvider, Tag, TagKind};
use tracing::{debug, info};

use crate::viewer::backend::RenderBackend;
use crate::viewer::events::{Notification, SecondaryPage};
use crate::viewer::tween::TweenRequest;
use crate::viewer::view::ViewMode;

use super::{PostTransition, SceneRuntime, ViewChange};

pub(super) const CLICK_KINDS: [TagKind; 3] = [TagKind::Move, TagKind::Click, TagKind::Enter];
pub(super) const HOVER_KINDS: [TagKind; 1] = [TagKind::Click];

impl<P: SceneProvider, R: RenderBackend> SceneRuntime<P, R> {
    fn accepted_tag(&self, node: NodeId, accepted: &[TagKind]) -> Option<Tag> {
        let tag = self.scene.as_ref()?.get(node)?.tag.clone()?;
        if accepted.contains(&tag.kind) {
            Some(tag)
        } else {
            debug!(node = %node, kind = %tag.kind, "tag kind not accepted here");
            None
        }
    }

    /// Runs the action for a clicked tagged node.
    pub(super) fn handle_click(&mut self, node: NodeId, accepted: &[TagKind]) {
        let Some(tag) = self.accepted_tag(node, accepted) else {
            return;
        };
        match tag.kind {
            TagKind::Move => self.dispatch_move(node, &tag),
            TagKind::Click => self.dispatch_page(&tag),
            TagKind::Text => self.dispatch_label(&tag),
            TagKind::Enter => self.dispatch_enter(),
            _ => debug!(tag = %tag, "no action for tag"),
        }
    }

    pub(super) fn handle_hover(&mut self, node: NodeId, accepted: &[TagKind]) {
        let Some(tag) = self.accepted_tag(node, accepted) else {
            return;
        };
        self.interaction.hover_target = Some(tag.target.clone());
        if tag.is(&TagKind::Click) {
            self.dispatch_label(&tag);
        }
    }

    /// Flies to the picked node, looking at the last matching `click` node,
    /// and puts the viewer back inside.
    fn dispatch_move(&mut self, node: NodeId, tag: &Tag) {
        let (Some(scene), Some(model)) = (self.scene.as_ref(), self.model) else {
            return;
        };
        // Last match in traversal order wins.
        let subject = scene.traverse(model).into_iter().rev().find(|id| {
            scene
                .get(*id)
                .and_then(|candidate| candidate.tag.as_ref())
                .is_some_and(|candidate| {
                    candidate.is(&TagKind::Click) && candidate.target == tag.target
                })
        });
        let Some(subject) = subject else {
            debug!(subject = %tag.target, "no click node matches move target");
            return;
        };
        let (Some(from), Some(toward)) = (scene.get(node), scene.get(subject)) else {
            return;
        };
        let request = TweenRequest {
            to_position: from.position,
            to_target: toward.position,
            internal_blend: true,
            duration: self.tween_duration(),
            after: None,
        };

        self.change_view(ViewChange::Force {
            mode: ViewMode::Internal,
            then: PostTransition::ApplyPolicy { with_tween: false },
        });
        self.move_camera(request);
    }

    fn dispatch_page(&mut self, tag: &Tag) {
        let is_first_open = self.interaction.open_page(&tag.target);
        info!(content = %tag.target, is_first_open, "secondary page requested");
        self.notifications.emit(Notification::SecondaryPageRequested(SecondaryPage {
            visible: true,
            content_id: tag.target.clone(),
            is_first_open,
        }));
    }

    /// Shows only the label for `tag`'s target. Labels belong to the
    /// internal view; elsewhere this does nothing.
    fn dispatch_label(&mut self, tag: &Tag) {
        if self.view.current() != ViewMode::Internal {
            return;
        }
        if let Some(scene) = self.scene.as_mut() {
            let shown = self.labels.show_only(scene, &tag.target);
            debug!(label = %tag.target, shown, "label shown");
        }
    }

    fn dispatch_enter(&mut self) {
        self.change_view(ViewChange::Force {
            mode: ViewMode::Internal,
            then: PostTransition::ApplyPolicy { with_tween: true },
        });
    }
}
