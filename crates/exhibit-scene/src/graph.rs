use cgmath::{Matrix4, One, Quaternion, SquareMatrix};
use exhibit_base::{Error, NodeId, Result};

use crate::math::{Vec3, transform_point, vec3};
use crate::provider::{NodeTemplate, TemplateKind};
use crate::tag::{Tag, TagKind};

#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[usize; 3]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpriteData {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LightData {
    pub intensity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh(MeshData),
    Sprite(SpriteData),
    Light(LightData),
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub tag_name: Option<String>,
    pub tag: Option<Tag>,
    pub position: Vec3,
    pub rotation: Quaternion<f64>,
    pub scale: Vec3,
    pub visible: bool,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            tag_name: None,
            tag: None,
            position: vec3(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: vec3(1.0, 1.0, 1.0),
            visible: true,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Sets the raw tag string and parses it once.
    pub fn with_tag(mut self, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        self.tag = Tag::parse(&raw);
        self.tag_name = Some(raw);
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_drawable(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh(_) | NodeKind::Sprite(_))
    }

    pub fn local_matrix(&self) -> Matrix4<f64> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn has_tag(&self, kind: &TagKind) -> bool {
        self.tag.as_ref().is_some_and(|tag| tag.is(kind))
    }
}

/// Arena-backed node tree. Index 0 is always the scene root.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::new("Scene", NodeKind::Group)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.index())
    }

    /// Returns false when `id` is not in the graph.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(SceneNode::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(SceneNode::children).unwrap_or(&[])
    }

    pub fn add(&mut self, parent: NodeId, mut node: SceneNode) -> Result<NodeId> {
        if parent.index() >= self.nodes.len() {
            return Err(Error::InvalidParameter(format!("unknown parent node {parent}")));
        }
        let id = NodeId::new(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    /// Instantiates a template subtree below `parent`, returning its root.
    pub fn insert_template(&mut self, parent: NodeId, template: &NodeTemplate) -> Result<NodeId> {
        let node = node_from_template(template)?;
        let id = self.add(parent, node)?;
        for child in &template.children {
            self.insert_template(id, child)?;
        }
        Ok(id)
    }

    /// Removes `id` from its parent's child list. The node stays in the arena
    /// but is no longer reachable from the root.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(parent.index()) {
            node.children.retain(|child| *child != id);
        }
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.parent = None;
        }
    }

    /// Drops every node except a fresh, childless root.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0].children.clear();
    }

    /// Pre-order walk of the subtree rooted at `start`.
    pub fn traverse(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if self.get(start).is_none() {
            return order;
        }
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            order.push(id);
            for child in self.children(id).iter().rev() {
                stack.push(*child);
            }
        }
        order
    }

    pub fn find_by_tag_name(&self, start: NodeId, tag_name: &str) -> Option<NodeId> {
        self.traverse(start).into_iter().find(|id| {
            self.get(*id)
                .and_then(|node| node.tag_name.as_deref())
                .is_some_and(|name| name == tag_name)
        })
    }

    pub fn find_by_name(&self, start: NodeId, name: &str) -> Option<NodeId> {
        self.traverse(start)
            .into_iter()
            .find(|id| self.get(*id).is_some_and(|node| node.name == name))
    }

    pub fn world_matrix(&self, id: NodeId) -> Matrix4<f64> {
        let mut matrix = Matrix4::identity();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.get(node_id) else {
                break;
            };
            matrix = node.local_matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    pub fn world_position(&self, id: NodeId) -> Vec3 {
        transform_point(&self.world_matrix(id), vec3(0.0, 0.0, 0.0))
    }

    /// True when the node and all its ancestors are visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.get(node_id) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }
}

fn node_from_template(template: &NodeTemplate) -> Result<SceneNode> {
    let kind = match &template.kind {
        TemplateKind::Group => NodeKind::Group,
        TemplateKind::Light { intensity } => NodeKind::Light(LightData {
            intensity: *intensity,
        }),
        TemplateKind::Mesh {
            positions,
            triangles,
        } => {
            if let Some(bad) = triangles.iter().flatten().find(|idx| **idx >= positions.len()) {
                return Err(Error::Parse(format!(
                    "mesh {} references vertex {bad} of {}",
                    template.name,
                    positions.len()
                )));
            }
            NodeKind::Mesh(MeshData {
                positions: positions.iter().map(|p| vec3(p[0], p[1], p[2])).collect(),
                triangles: triangles.clone(),
            })
        }
    };

    let mut node = SceneNode::new(template.name.clone(), kind);
    if let Some(tag) = &template.tag {
        node = node.with_tag(tag.clone());
    }
    let [x, y, z] = template.position;
    node.position = vec3(x, y, z);
    let [qx, qy, qz, qw] = template.rotation;
    node.rotation = Quaternion::new(qw, qx, qy, qz);
    let [sx, sy, sz] = template.scale;
    node.scale = vec3(sx, sy, sz);
    node.visible = template.visible;
    Ok(node)
}
