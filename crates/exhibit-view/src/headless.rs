use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use exhibit_scene::{JsonSceneProvider, SceneGraph, SceneProvider, Viewport};
use exhibit_view::ExhibitConfig;
use exhibit_view::viewer::{HeadlessBackend, SceneRuntime};
use serde::Deserialize;
use tracing::info;

use crate::cli::{InspectArgs, SimulateArgs};

const DEFAULT_FRAME_MS: u64 = 16;

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    viewport: Option<[f64; 2]>,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Step {
    Frames {
        count: u32,
        #[serde(default = "default_frame_ms")]
        interval_ms: u64,
    },
    Wait {
        ms: u64,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerDown {
        x: f64,
        y: f64,
    },
    PointerUp {
        x: f64,
        y: f64,
    },
    Click {
        x: f64,
        y: f64,
    },
    ClickTag {
        tag_name: String,
    },
    HoverTag {
        tag_name: String,
    },
    AdvanceView,
    Resize {
        width: f64,
        height: f64,
    },
    Drag {
        dx: f64,
        dy: f64,
    },
    Zoom {
        steps: f64,
    },
}

fn default_frame_ms() -> u64 {
    DEFAULT_FRAME_MS
}

type Runtime = SceneRuntime<JsonSceneProvider, HeadlessBackend>;

pub fn inspect(args: InspectArgs) -> Result<()> {
    let (base_dir, url) = split_scene_path(&args.scene)?;
    let mut provider = JsonSceneProvider::new(base_dir);
    let asset = provider
        .load(&url, &mut |_| {})
        .with_context(|| format!("failed to load {}", args.scene.display()))?;

    let mut graph = SceneGraph::new();
    let root = graph.root();
    let model = graph.insert_template(root, &asset.root)?;
    println!("nodes: {}", graph.len());
    for id in graph.traverse(model) {
        let Some(node) = graph.get(id) else {
            continue;
        };
        if let Some(tag) = &node.tag {
            let p = graph.world_position(id);
            println!(
                "{id} {:<24} {:<6} {:<12} ({:.1}, {:.1}, {:.1})",
                node.name, tag.kind, tag.target, p.x, p.y, p.z
            );
        }
    }
    for clip in &asset.clips {
        println!("clip {} ({:.2}s)", clip.name, clip.duration);
    }
    Ok(())
}

pub fn simulate(args: SimulateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ExhibitConfig::from_json_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => ExhibitConfig::default(),
    };
    let (base_dir, url) = split_scene_path(&args.scene)?;
    config.scene_url = url;

    let text = fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read script {}", args.script.display()))?;
    let script: Script = serde_json::from_str(&text).context("invalid script")?;
    let viewport = match script.viewport {
        Some([width, height]) => Viewport::new(width, height),
        None => Viewport::default(),
    };

    let mut runtime = Runtime::new(
        config,
        JsonSceneProvider::new(base_dir),
        HeadlessBackend::default(),
        viewport,
    );
    runtime.load().context("scene load failed")?;

    let mut clock = Instant::now();
    runtime.frame(clock);
    for step in script.steps {
        run_step(&mut runtime, &mut clock, step)?;
        for notification in runtime.drain_notifications() {
            println!("{}", serde_json::to_string(&notification)?);
        }
    }

    info!(
        view = %runtime.view_mode(),
        position = ?runtime.camera().position,
        "simulation finished"
    );
    if let Some(backend) = runtime.dispose() {
        info!(draws = backend.draws, "renderer released");
    }
    Ok(())
}

fn run_step(runtime: &mut Runtime, clock: &mut Instant, step: Step) -> Result<()> {
    match step {
        Step::Frames { count, interval_ms } => {
            for _ in 0..count {
                *clock += Duration::from_millis(interval_ms);
                runtime.frame(*clock);
            }
        }
        Step::Wait { ms } => *clock += Duration::from_millis(ms),
        Step::PointerMove { x, y } => {
            runtime.pointer_move(x, y, *clock);
        }
        Step::PointerDown { x, y } => {
            runtime.pointer_down(x, y, *clock);
        }
        Step::PointerUp { x, y } => {
            runtime.pointer_up(x, y, *clock);
        }
        Step::Click { x, y } => click(runtime, *clock, x, y),
        Step::ClickTag { tag_name } => {
            let (x, y) = tag_pixel(runtime, &tag_name)?;
            click(runtime, *clock, x, y);
        }
        Step::HoverTag { tag_name } => {
            let (x, y) = tag_pixel(runtime, &tag_name)?;
            runtime.pointer_move(x, y, *clock);
        }
        Step::AdvanceView => {
            runtime.advance_view();
        }
        Step::Resize { width, height } => {
            runtime.resize(width, height, *clock);
        }
        Step::Drag { dx, dy } => {
            runtime.orbit_drag(dx, dy);
        }
        Step::Zoom { steps } => {
            runtime.orbit_zoom(steps);
        }
    }
    Ok(())
}

fn click(runtime: &mut Runtime, now: Instant, x: f64, y: f64) {
    runtime.pointer_down(x, y, now);
    runtime.pointer_up(x, y, now);
}

fn tag_pixel(runtime: &Runtime, tag_name: &str) -> Result<(f64, f64)> {
    let (Some(scene), Some(model)) = (runtime.scene(), runtime.model()) else {
        bail!("no scene loaded");
    };
    let node = scene
        .find_by_tag_name(model, tag_name)
        .with_context(|| format!("no node tagged {tag_name}"))?;
    runtime
        .camera()
        .project(scene.world_position(node), runtime.viewport())
        .with_context(|| format!("{tag_name} is behind the camera"))
}

fn split_scene_path(path: &Path) -> Result<(PathBuf, String)> {
    let file = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("scene path has no file name: {}", path.display()))?;
    let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok((base, file.to_string()))
}
