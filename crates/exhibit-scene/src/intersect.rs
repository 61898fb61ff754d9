use cgmath::InnerSpace;
use exhibit_base::NodeId;

use crate::graph::{NodeKind, SceneGraph};
use crate::math::{Vec3, transform_point};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize(),
        }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Camera axes used to orient sprite quads toward the viewer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteFacing {
    pub right: Vec3,
    pub up: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub distance: f64,
    pub point: Vec3,
}

pub fn ray_intersect_triangle(origin: Vec3, dir: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f64> {
    let eps = 1.0e-9;
    let edge1 = b - a;
    let edge2 = c - a;
    let pvec = dir.cross(edge2);
    let det = edge1.dot(pvec);
    if det.abs() < eps {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = origin - a;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(edge1);
    let v = dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(qvec) * inv_det;
    if t > eps { Some(t) } else { None }
}

/// Intersects `ray` with each object in `objects` and its descendants.
///
/// Hits come back nearest first; equal distances keep traversal order.
/// Hidden nodes are skipped together with everything below them.
pub fn intersect_objects(
    graph: &SceneGraph,
    objects: &[NodeId],
    ray: Ray,
    facing: SpriteFacing,
) -> Vec<Hit> {
    let mut hits = Vec::new();
    for object in objects {
        if !graph.is_visible(*object) {
            continue;
        }
        intersect_subtree(graph, *object, ray, facing, &mut hits);
    }
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

fn intersect_subtree(
    graph: &SceneGraph,
    id: NodeId,
    ray: Ray,
    facing: SpriteFacing,
    hits: &mut Vec<Hit>,
) {
    let Some(node) = graph.get(id) else {
        return;
    };
    if !node.visible {
        return;
    }

    let nearest = match &node.kind {
        NodeKind::Mesh(mesh) => {
            let world = graph.world_matrix(id);
            let positions: Vec<Vec3> = mesh
                .positions
                .iter()
                .map(|p| transform_point(&world, *p))
                .collect();
            mesh.triangles
                .iter()
                .filter_map(|tri| {
                    ray_intersect_triangle(
                        ray.origin,
                        ray.dir,
                        positions[tri[0]],
                        positions[tri[1]],
                        positions[tri[2]],
                    )
                })
                .min_by(f64::total_cmp)
        }
        NodeKind::Sprite(_) => {
            let center = graph.world_position(id);
            let right = facing.right * (node.scale.x * 0.5);
            let up = facing.up * (node.scale.y * 0.5);
            let a = center - right - up;
            let b = center + right - up;
            let c = center + right + up;
            let d = center - right + up;
            ray_intersect_triangle(ray.origin, ray.dir, a, b, c)
                .or_else(|| ray_intersect_triangle(ray.origin, ray.dir, a, c, d))
        }
        NodeKind::Group | NodeKind::Light(_) => None,
    };

    if let Some(t) = nearest {
        hits.push(Hit {
            node: id,
            distance: t,
            point: ray.at(t),
        });
    }

    for child in node.children() {
        intersect_subtree(graph, *child, ray, facing, hits);
    }
}
