use exhibit_base::Result;
use exhibit_scene::{NodeId, NodeKind, SceneGraph, SceneNode, SpriteData, TagKind, vec3};

/// Billboard bound to one `finger` node.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelSprite {
    pub node: NodeId,
    pub source: NodeId,
    pub target: String,
}

#[derive(Clone, Debug, Default)]
pub struct LabelSet {
    labels: Vec<LabelSprite>,
}

impl LabelSet {
    /// Creates one hidden sprite per `finger` node under `model`, added as a
    /// child of `model` and lifted `lift` units above its source.
    pub fn build(
        graph: &mut SceneGraph,
        model: NodeId,
        scale: [f64; 2],
        lift: f64,
    ) -> Result<Self> {
        let fingers: Vec<(NodeId, String, String, exhibit_scene::Vec3)> = graph
            .traverse(model)
            .into_iter()
            .filter_map(|id| {
                let node = graph.get(id)?;
                let tag = node.tag.as_ref().filter(|tag| tag.is(&TagKind::Finger))?;
                let text = tag.label_text().unwrap_or_default().to_string();
                Some((id, tag.target.clone(), text, node.position))
            })
            .collect();

        let mut labels = Vec::with_capacity(fingers.len());
        for (source, target, text, position) in fingers {
            let mut sprite = SceneNode::new(
                format!("{}-{target}", TagKind::Text),
                NodeKind::Sprite(SpriteData { text }),
            )
            .at(vec3(position.x, position.y + lift, position.z));
            sprite.scale = vec3(scale[0], scale[1], 1.0);
            sprite.visible = false;
            let node = graph.add(model, sprite)?;
            labels.push(LabelSprite {
                node,
                source,
                target,
            });
        }
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[LabelSprite] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn set_all(&self, graph: &mut SceneGraph, visible: bool, scale: [f64; 2]) {
        for label in &self.labels {
            if let Some(node) = graph.get_mut(label.node) {
                node.visible = visible;
                node.scale = vec3(scale[0], scale[1], 1.0);
            }
        }
    }

    /// Hides every label, then shows the ones bound to `target`.
    pub fn show_only(&self, graph: &mut SceneGraph, target: &str) -> usize {
        let mut shown = 0;
        for label in &self.labels {
            if let Some(node) = graph.get_mut(label.node) {
                node.visible = false;
                if label.target == target {
                    node.visible = true;
                    shown += 1;
                }
            }
        }
        shown
    }

    pub fn visible_targets(&self, graph: &SceneGraph) -> Vec<&str> {
        self.labels
            .iter()
            .filter(|label| graph.get(label.node).is_some_and(|node| node.visible))
            .map(|label| label.target.as_str())
            .collect()
    }
}
