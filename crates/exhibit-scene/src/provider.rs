use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use exhibit_base::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    pub total: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Clip length in seconds.
    pub duration: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemplateKind {
    #[default]
    Group,
    Mesh {
        positions: Vec<[f64; 3]>,
        triangles: Vec<[usize; 3]>,
    },
    Light {
        intensity: f64,
    },
}

/// Serialized node tree as delivered by an asset source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeTemplate {
    pub name: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub position: [f64; 3],
    /// Quaternion as `[x, y, z, w]`.
    #[serde(default = "identity_rotation")]
    pub rotation: [f64; 4],
    #[serde(default = "unit_scale")]
    pub scale: [f64; 3],
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    #[serde(default)]
    pub kind: TemplateKind,
    #[serde(default)]
    pub children: Vec<NodeTemplate>,
}

fn identity_rotation() -> [f64; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn visible_by_default() -> bool {
    true
}

impl NodeTemplate {
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: None,
            position: [0.0; 3],
            rotation: identity_rotation(),
            scale: unit_scale(),
            visible: true,
            kind: TemplateKind::Group,
            children: Vec::new(),
        }
    }

    /// Axis-aligned cube of edge `size` centred on the node origin.
    pub fn cube(name: impl Into<String>, size: f64) -> Self {
        let h = size * 0.5;
        let positions = vec![
            [-h, -h, -h],
            [h, -h, -h],
            [h, h, -h],
            [-h, h, -h],
            [-h, -h, h],
            [h, -h, h],
            [h, h, h],
            [-h, h, h],
        ];
        let triangles = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [3, 7, 6],
            [3, 6, 2],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        Self {
            kind: TemplateKind::Mesh {
                positions,
                triangles,
            },
            ..Self::group(name)
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.position = [x, y, z];
        self
    }

    pub fn with_child(mut self, child: NodeTemplate) -> Self {
        self.children.push(child);
        self
    }
}

/// On-disk layout read by [`JsonSceneProvider`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub root: NodeTemplate,
    #[serde(default)]
    pub animations: Vec<AnimationClip>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadedAsset {
    pub root: NodeTemplate,
    pub clips: Vec<AnimationClip>,
}

impl From<SceneDescription> for LoadedAsset {
    fn from(description: SceneDescription) -> Self {
        Self {
            root: description.root,
            clips: description.animations,
        }
    }
}

pub trait SceneProvider {
    fn load(
        &mut self,
        url: &str,
        on_progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<LoadedAsset>;

    /// Drops any assets kept between loads.
    fn clear_cache(&mut self);
}

/// Reads [`SceneDescription`] JSON files relative to a base directory and
/// keeps parsed results keyed by url.
#[derive(Debug, Default)]
pub struct JsonSceneProvider {
    base_dir: PathBuf,
    cache: HashMap<String, LoadedAsset>,
}

impl JsonSceneProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            cache: HashMap::new(),
        }
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn read(&self, url: &str, on_progress: &mut dyn FnMut(LoadProgress)) -> Result<LoadedAsset> {
        let path = self.base_dir.join(url);
        let bytes = fs::read(&path)?;
        let total = bytes.len() as u64;
        on_progress(LoadProgress { loaded: 0, total });
        let description: SceneDescription = serde_json::from_slice(&bytes)?;
        on_progress(LoadProgress {
            loaded: total,
            total,
        });
        Ok(description.into())
    }
}

impl SceneProvider for JsonSceneProvider {
    fn load(
        &mut self,
        url: &str,
        on_progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<LoadedAsset> {
        if let Some(asset) = self.cache.get(url) {
            debug!(url, "scene served from cache");
            return Ok(asset.clone());
        }
        match self.read(url, on_progress) {
            Ok(asset) => {
                self.cache.insert(url.to_string(), asset.clone());
                Ok(asset)
            }
            Err(err) => {
                error!(url, error = %err, "scene load failed");
                Err(Error::Load {
                    url: url.to_string(),
                    reason: err.to_string(),
                })
            }
        }
    }

    fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

/// Serves prebuilt assets; useful for hosts that decode assets elsewhere.
#[derive(Debug, Default)]
pub struct MemorySceneProvider {
    assets: HashMap<String, LoadedAsset>,
    cache_clears: usize,
}

impl MemorySceneProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, asset: LoadedAsset) {
        self.assets.insert(url.into(), asset);
    }

    pub fn cache_clears(&self) -> usize {
        self.cache_clears
    }
}

impl SceneProvider for MemorySceneProvider {
    fn load(
        &mut self,
        url: &str,
        on_progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<LoadedAsset> {
        let Some(asset) = self.assets.get(url) else {
            error!(url, "scene not registered");
            return Err(Error::Load {
                url: url.to_string(),
                reason: "not registered".to_string(),
            });
        };
        on_progress(LoadProgress {
            loaded: 1,
            total: 1,
        });
        Ok(asset.clone())
    }

    fn clear_cache(&mut self) {
        self.cache_clears += 1;
    }
}
