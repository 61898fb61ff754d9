use exhibit_scene::{NodeId, SceneGraph, TagKind};

/// Walks from `start` toward the root and hands the first tagged node to
/// `handler` together with `accepted`.
///
/// The whitelist is passed through untouched: deciding whether the tag kind
/// is acceptable is the handler's job. Returns whether the handler ran.
pub fn resolve<F>(graph: &SceneGraph, start: NodeId, accepted: &[TagKind], mut handler: F) -> bool
where
    F: FnMut(NodeId, &[TagKind]),
{
    match tagged_ancestor(graph, start) {
        Some(node) => {
            handler(node, accepted);
            true
        }
        None => false,
    }
}

/// Nearest node at or above `start` carrying a tag with at least two fields.
pub fn tagged_ancestor(graph: &SceneGraph, start: NodeId) -> Option<NodeId> {
    let mut current = Some(start);
    while let Some(id) = current {
        let node = graph.get(id)?;
        if node.tag.is_some() {
            return Some(id);
        }
        current = node.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use exhibit_scene::{NodeKind, SceneNode};

    #[test]
    fn finds_nearest_tagged_ancestor() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let outer = graph
            .add(root, SceneNode::new("outer", NodeKind::Group).with_tag("enter-arrow"))
            .expect("root");
        let booth = graph
            .add(outer, SceneNode::new("booth", NodeKind::Group).with_tag("click-42_v2"))
            .expect("outer");
        let panel = graph
            .add(booth, SceneNode::new("panel", NodeKind::Group).with_tag("decor"))
            .expect("booth");

        let mut seen = Vec::new();
        let ran = resolve(&graph, panel, &[TagKind::Move], |node, accepted| {
            seen.push((node, accepted.to_vec()));
        });
        assert!(ran);
        assert_eq!(seen, vec![(booth, vec![TagKind::Move])]);

        let tag = graph.get(booth).and_then(|n| n.tag.clone()).expect("tagged");
        assert_eq!(tag.kind, TagKind::Click);
        assert_eq!(tag.target, "42");
    }

    #[test]
    fn untagged_chain_invokes_nothing() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let wall = graph
            .add(root, SceneNode::new("wall", NodeKind::Group))
            .expect("root");
        let ran = resolve(&graph, wall, &[TagKind::Click], |_, _| panic!("no tag in chain"));
        assert!(!ran);
        assert!(!resolve(&graph, root, &[], |_, _| panic!("root is untagged")));
    }
}
