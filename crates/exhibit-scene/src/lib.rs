mod graph;
mod intersect;
mod math;
mod provider;
mod tag;

pub use exhibit_base::{Error, NodeId, Result, Viewport};
pub use graph::{LightData, MeshData, NodeKind, SceneGraph, SceneNode, SpriteData};
pub use intersect::{Hit, Ray, SpriteFacing, intersect_objects, ray_intersect_triangle};
pub use math::{Vec3, transform_point, vec3};
pub use provider::{
    AnimationClip, JsonSceneProvider, LoadProgress, LoadedAsset, MemorySceneProvider,
    NodeTemplate, SceneDescription, SceneProvider, TemplateKind,
};
pub use tag::{Tag, TagKind};
