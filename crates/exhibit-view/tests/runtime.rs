use std::collections::HashMap;
use std::time::{Duration, Instant};

use cgmath::{InnerSpace, Quaternion};
use exhibit_scene::{
    AnimationClip, Error, LoadedAsset, MemorySceneProvider, NodeTemplate, Result, TemplateKind,
    Vec3, Viewport, vec3,
};
use exhibit_view::ExhibitConfig;
use exhibit_view::viewer::{
    HeadlessBackend, ListenerKind, Notification, PointerPos, PostTransition, SceneRuntime,
    SecondaryPage, ViewChange, ViewMode,
};

type Runtime = SceneRuntime<MemorySceneProvider, HeadlessBackend>;

const FRAME: Duration = Duration::from_millis(16);
const GAP: Duration = Duration::from_millis(150);
const INTERNAL_POSITION: [f64; 3] = [-6.7, 44.0, 497.0];
const SUBJECT: [f64; 3] = [5.79, 26.0, 26.0];

fn hall() -> LoadedAsset {
    let lamp = NodeTemplate {
        kind: TemplateKind::Light { intensity: 1.5 },
        ..NodeTemplate::group("lamp")
    };
    LoadedAsset {
        root: NodeTemplate::group("hall")
            .with_child(NodeTemplate::cube("ceiling", 20.0).at(0.0, 120.0, 0.0))
            .with_child(
                NodeTemplate::cube("marker", 4.0)
                    .with_tag("move-computer")
                    .at(-60.0, 0.0, 200.0),
            )
            .with_child(
                NodeTemplate::cube("monitor", 10.0)
                    .with_tag("click-computer_01")
                    .at(5.79, 26.0, 26.0),
            )
            .with_child(
                NodeTemplate::group("pin")
                    .with_tag("finger-computer-Computer_01")
                    .at(5.79, 40.0, 26.0),
            )
            .with_child(
                NodeTemplate::cube("poster", 10.0)
                    .with_tag("click-poster")
                    .at(100.0, 10.0, -100.0),
            )
            .with_child(
                NodeTemplate::cube("arrow", 10.0)
                    .with_tag("enter-arrow")
                    .at(-200.0, 0.0, 200.0),
            )
            .with_child(
                NodeTemplate::cube("plaque", 10.0)
                    .with_tag("text-computer")
                    .at(200.0, 0.0, 0.0),
            )
            .with_child(lamp),
        clips: vec![AnimationClip {
            name: "walk".to_string(),
            duration: 2.0,
        }],
    }
}

fn config() -> ExhibitConfig {
    ExhibitConfig {
        scene_url: "hall.json".to_string(),
        tween_duration_ms: 1000,
        clip_time_scales: HashMap::from([("walk".to_string(), 0.5)]),
        ..ExhibitConfig::default()
    }
}

fn runtime_with(config: ExhibitConfig) -> Result<Runtime> {
    runtime_over(config, hall())
}

fn runtime_over(config: ExhibitConfig, asset: LoadedAsset) -> Result<Runtime> {
    let mut provider = MemorySceneProvider::new();
    provider.insert("hall.json", asset);
    let mut runtime = SceneRuntime::new(
        config,
        provider,
        HeadlessBackend::default(),
        Viewport::new(1280.0, 720.0),
    );
    runtime.load()?;
    Ok(runtime)
}

/// Frames until no tween is in flight.
fn settle(runtime: &mut Runtime, mut now: Instant) -> Instant {
    for _ in 0..1000 {
        now += FRAME;
        runtime.frame(now);
        if runtime.active_tween().is_none() {
            break;
        }
    }
    now
}

/// Loads the hall and plays the intro through to the initial focus.
fn settled_inside() -> Result<(Runtime, Instant)> {
    play_intro(runtime_with(config())?)
}

fn play_intro(mut runtime: Runtime) -> Result<(Runtime, Instant)> {
    let start = Instant::now();
    runtime.frame(start);
    let now = start + Duration::from_millis(800);
    runtime.frame(now);
    let now = settle(&mut runtime, now);
    runtime.drain_notifications();
    Ok((runtime, now))
}

fn pixel_of(runtime: &Runtime, tag_name: &str) -> (f64, f64) {
    let scene = runtime.scene().expect("live scene");
    let model = runtime.model().expect("model loaded");
    let node = scene
        .find_by_tag_name(model, tag_name)
        .expect("tagged node present");
    runtime
        .camera()
        .project(scene.world_position(node), runtime.viewport())
        .expect("node in front of camera")
}

fn click(runtime: &mut Runtime, now: Instant, (x, y): (f64, f64)) {
    assert!(runtime.pointer_down(x, y, now));
    assert!(runtime.pointer_up(x, y, now));
}

fn is_visible(runtime: &Runtime, tag_name: &str) -> bool {
    let scene = runtime.scene().expect("live scene");
    let model = runtime.model().expect("model loaded");
    scene
        .find_by_tag_name(model, tag_name)
        .and_then(|id| scene.get(id))
        .is_some_and(|node| node.visible)
}

fn ceiling_visible(runtime: &Runtime) -> bool {
    let ceiling = runtime.anchors().ceiling.expect("ceiling found");
    runtime
        .scene()
        .and_then(|scene| scene.get(ceiling))
        .is_some_and(|node| node.visible)
}

fn near(a: Vec3, b: [f64; 3]) -> bool {
    (a - vec3(b[0], b[1], b[2])).magnitude() < 1.0e-6
}

fn page(content_id: &str, is_first_open: bool) -> Notification {
    Notification::SecondaryPageRequested(SecondaryPage {
        visible: true,
        content_id: content_id.to_string(),
        is_first_open,
    })
}

#[test]
fn load_places_intro_camera_and_hides_entry_arrow() -> Result<()> {
    let runtime = runtime_with(config())?;
    assert!(near(runtime.camera().position, [-556.0, 563.0, 227.0]));
    assert!(near(runtime.orbit().target, [0.0, 0.0, -1.0]));
    assert_eq!(runtime.view_mode(), ViewMode::Internal);
    assert!(!is_visible(&runtime, "enter-arrow"));
    assert_eq!(runtime.labels().len(), 1);
    assert!(runtime.anchors().initial_focus.is_some());

    let backend = runtime.renderer().expect("renderer attached");
    assert_eq!(backend.listeners, ListenerKind::ALL.to_vec());
    assert_eq!(backend.draws, 1);
    Ok(())
}

#[test]
fn intro_enters_internal_then_focuses_initial_node() -> Result<()> {
    let mut runtime = runtime_with(config())?;
    let start = Instant::now();
    runtime.frame(start);
    runtime.frame(start + Duration::from_millis(400));
    assert!(runtime.active_tween().is_none());

    let now = start + Duration::from_millis(800);
    runtime.frame(now);
    let (to_position, to_target) = runtime.active_tween().expect("intro tween").destination();
    assert!(near(to_position, INTERNAL_POSITION));
    assert!(near(to_target, SUBJECT));
    assert!(!runtime.orbit().enable_rotate);
    assert!(!runtime.orbit().enable_zoom);

    settle(&mut runtime, now);
    assert_eq!(
        runtime.drain_notifications(),
        vec![Notification::ViewChanged(ViewMode::Internal)]
    );
    assert!(near(runtime.camera().position, [-60.0, 26.0, 200.0]));
    assert!(near(
        runtime.orbit().target,
        [-60.0 + 0.05 * 65.79, 26.0, 200.0 - 0.05 * 174.0]
    ));
    assert!(runtime.orbit().enable_rotate);
    Ok(())
}

#[test]
fn view_cycle_applies_policies_and_emits_each_step() -> Result<()> {
    let (mut runtime, _) = settled_inside()?;

    assert_eq!(runtime.advance_view(), ViewMode::Vertical);
    assert!(runtime.orbit().enable_zoom);
    assert!(!runtime.orbit().enable_rotate);
    assert_eq!(runtime.orbit().min_distance, 500.0);
    assert_eq!(runtime.orbit().max_distance, Some(900.0));
    assert!(!ceiling_visible(&runtime));
    assert!(is_visible(&runtime, "enter-arrow"));
    let scene = runtime.scene().expect("live scene");
    assert_eq!(runtime.labels().visible_targets(scene), vec!["computer"]);

    assert_eq!(runtime.advance_view(), ViewMode::External);
    assert!(runtime.orbit().enable_rotate);
    assert!(ceiling_visible(&runtime));
    assert!(is_visible(&runtime, "enter-arrow"));
    let scene = runtime.scene().expect("live scene");
    assert!(runtime.labels().visible_targets(scene).is_empty());

    assert_eq!(runtime.advance_view(), ViewMode::Internal);
    assert!(!runtime.orbit().enable_zoom);
    assert_eq!(runtime.orbit().max_distance, None);
    assert!(!is_visible(&runtime, "enter-arrow"));

    assert_eq!(
        runtime.drain_notifications(),
        vec![
            Notification::ViewChanged(ViewMode::Vertical),
            Notification::ViewChanged(ViewMode::External),
            Notification::ViewChanged(ViewMode::Internal),
        ]
    );
    Ok(())
}

#[test]
fn newer_tween_replaces_older_and_skips_its_completion() -> Result<()> {
    let mut runtime = runtime_with(config())?;
    let start = Instant::now();
    runtime.frame(start);
    let mut now = start + Duration::from_millis(800);
    runtime.frame(now);
    for _ in 0..10 {
        now += FRAME;
        runtime.frame(now);
    }
    assert!(runtime.active_tween().is_some());

    runtime.advance_view();
    runtime.advance_view();
    settle(&mut runtime, now);

    assert_eq!(
        runtime.drain_notifications(),
        vec![
            Notification::ViewChanged(ViewMode::Vertical),
            Notification::ViewChanged(ViewMode::External),
        ]
    );
    assert!(near(runtime.camera().position, [-315.0, 350.0, 478.0]));
    assert!(near(runtime.orbit().target, [0.0, 0.0, -1.0]));
    assert!(runtime.orbit().enable_rotate);
    Ok(())
}

#[test]
fn click_requests_secondary_page_and_tracks_first_open() -> Result<()> {
    let (mut runtime, now) = settled_inside()?;
    let monitor = pixel_of(&runtime, "click-computer_01");
    let poster = pixel_of(&runtime, "click-poster");

    click(&mut runtime, now + GAP, monitor);
    click(&mut runtime, now + GAP * 2, monitor);
    click(&mut runtime, now + GAP * 3, poster);

    assert_eq!(
        runtime.drain_notifications(),
        vec![
            page("computer", true),
            page("computer", false),
            page("poster", true)
        ]
    );
    assert!(runtime.interaction().was_opened("computer"));
    Ok(())
}

#[test]
fn drag_release_is_not_a_click() -> Result<()> {
    let (mut runtime, now) = settled_inside()?;
    let (x, y) = pixel_of(&runtime, "click-computer_01");

    runtime.pointer_down(x, y, now + GAP);
    runtime.pointer_up(x + 3.0, y, now + GAP);
    assert!(runtime.drain_notifications().is_empty());

    runtime.pointer_up(x + 2.0, y - 2.0, now + GAP * 2);
    assert_eq!(runtime.drain_notifications(), vec![page("computer", true)]);
    Ok(())
}

#[test]
fn empty_space_and_outside_pixels_dispatch_nothing() -> Result<()> {
    let (mut runtime, now) = settled_inside()?;
    assert!(runtime.pick_at(1.0, 1.0).is_empty());
    assert!(runtime.pick_at(-10.0, 50.0).is_empty());

    click(&mut runtime, now + GAP, (1.0, 1.0));
    click(&mut runtime, now + GAP * 2, (-10.0, 50.0));
    assert!(runtime.drain_notifications().is_empty());
    assert_eq!(runtime.view_mode(), ViewMode::Internal);
    assert!(runtime.active_tween().is_none());
    Ok(())
}

#[test]
fn text_tag_is_not_clickable() -> Result<()> {
    let (mut runtime, now) = settled_inside()?;
    let plaque = pixel_of(&runtime, "text-computer");
    click(&mut runtime, now + GAP, plaque);
    assert!(runtime.drain_notifications().is_empty());
    let scene = runtime.scene().expect("live scene");
    assert!(runtime.labels().visible_targets(scene).is_empty());
    Ok(())
}

#[test]
fn move_from_vertical_returns_inside() -> Result<()> {
    let (mut runtime, now) = settled_inside()?;
    runtime.advance_view();
    let now = settle(&mut runtime, now);
    assert!(near(runtime.camera().position, [0.0, 672.0, 0.0]));
    runtime.drain_notifications();

    let marker = pixel_of(&runtime, "move-computer");
    click(&mut runtime, now + GAP, marker);
    assert_eq!(runtime.view_mode(), ViewMode::Internal);
    assert_eq!(
        runtime.drain_notifications(),
        vec![Notification::ViewChanged(ViewMode::Internal)]
    );
    let (to_position, to_target) = runtime.active_tween().expect("move tween").destination();
    assert!(near(to_position, [-60.0, 26.0, 200.0]));
    assert!(near(to_target, SUBJECT));
    assert!(ceiling_visible(&runtime));
    assert!(!is_visible(&runtime, "enter-arrow"));

    runtime.frame(now + GAP + FRAME);
    assert!(!runtime.orbit().enable_rotate);
    settle(&mut runtime, now + GAP + FRAME);
    assert!(runtime.orbit().enable_rotate);
    assert!(near(runtime.camera().position, [-60.0, 26.0, 200.0]));
    Ok(())
}

#[test]
fn entry_arrow_tweens_inside_and_refocuses() -> Result<()> {
    let (mut runtime, now) = settled_inside()?;
    runtime.advance_view();
    let now = settle(&mut runtime, now);
    runtime.drain_notifications();

    let arrow = pixel_of(&runtime, "enter-arrow");
    click(&mut runtime, now + GAP, arrow);
    let (to_position, _) = runtime.active_tween().expect("entry tween").destination();
    assert!(near(to_position, INTERNAL_POSITION));
    assert!(!is_visible(&runtime, "enter-arrow"));

    settle(&mut runtime, now + GAP);
    assert_eq!(
        runtime.drain_notifications(),
        vec![
            Notification::ViewChanged(ViewMode::Internal),
            Notification::ViewChanged(ViewMode::Internal),
        ]
    );
    assert!(near(runtime.camera().position, [-60.0, 26.0, 200.0]));
    Ok(())
}

#[test]
fn hover_shows_only_the_hovered_label() -> Result<()> {
    let (mut runtime, now) = settled_inside()?;
    let (x, y) = pixel_of(&runtime, "click-computer_01");
    assert!(runtime.pointer_move(x, y, now + GAP));
    assert!(!runtime.pointer_move(x, y, now + GAP + FRAME), "throttled");
    assert_eq!(runtime.interaction().hover_target.as_deref(), Some("computer"));
    let scene = runtime.scene().expect("live scene");
    assert_eq!(runtime.labels().visible_targets(scene), vec!["computer"]);

    let (x, y) = pixel_of(&runtime, "text-computer");
    runtime.pointer_move(x, y, now + GAP * 2);
    assert_eq!(runtime.interaction().hover_target.as_deref(), Some("computer"));
    assert!(!runtime.interaction().over_empty);

    runtime.pointer_move(1.0, 1.0, now + GAP * 3);
    assert!(runtime.interaction().over_empty);
    let scene = runtime.scene().expect("live scene");
    assert_eq!(runtime.labels().visible_targets(scene), vec!["computer"]);
    assert!(runtime.drain_notifications().is_empty());
    Ok(())
}

#[test]
fn pointer_coming_to_rest_inside_the_window_is_still_handled() -> Result<()> {
    let (mut runtime, now) = settled_inside()?;
    let monitor = pixel_of(&runtime, "click-computer_01");
    let start = now + GAP;

    assert!(runtime.pointer_move(1.0, 1.0, start));
    assert!(!runtime.pointer_move(monitor.0, monitor.1, start + Duration::from_millis(50)));
    assert!(runtime.interaction().hover_target.is_none());

    let mut at = start;
    for _ in 0..30 {
        at += FRAME;
        runtime.frame(at);
    }
    let interaction = runtime.interaction();
    assert_eq!(interaction.hover_target.as_deref(), Some("computer"));
    assert_eq!(interaction.last_pointer, Some(PointerPos::new(monitor.0, monitor.1)));
    assert!(!interaction.over_empty);
    let scene = runtime.scene().expect("live scene");
    assert_eq!(runtime.labels().visible_targets(scene), vec!["computer"]);
    Ok(())
}

#[test]
fn newer_event_supersedes_held_one() -> Result<()> {
    let (mut runtime, now) = settled_inside()?;
    let monitor = pixel_of(&runtime, "click-computer_01");
    let start = now + GAP;

    assert!(runtime.pointer_move(1.0, 1.0, start));
    assert!(!runtime.pointer_move(monitor.0, monitor.1, start + FRAME));
    assert!(runtime.pointer_move(2.0, 2.0, start + GAP));
    runtime.frame(start + GAP * 2);
    assert!(runtime.interaction().hover_target.is_none());
    assert_eq!(runtime.interaction().last_pointer, Some(PointerPos::new(2.0, 2.0)));
    Ok(())
}

#[test]
fn held_release_still_clicks() -> Result<()> {
    let (mut runtime, now) = settled_inside()?;
    let (x, y) = pixel_of(&runtime, "click-poster");
    let start = now + GAP;

    assert!(runtime.pointer_up(1.0, 1.0, start));
    assert!(runtime.pointer_down(x, y, start + FRAME));
    assert!(!runtime.pointer_up(x, y, start + FRAME));
    assert!(runtime.drain_notifications().is_empty());

    runtime.frame(start + GAP);
    assert_eq!(runtime.drain_notifications(), vec![page("poster", true)]);
    Ok(())
}

#[test]
fn move_looks_at_the_last_matching_click_node() -> Result<()> {
    let mut asset = hall();
    asset.root = asset.root.with_child(
        NodeTemplate::cube("second monitor", 10.0)
            .with_tag("click-computer_02")
            .at(40.0, 30.0, 60.0),
    );
    let (runtime, _) = play_intro(runtime_over(config(), asset)?)?;

    assert!(near(runtime.camera().position, [-60.0, 30.0, 200.0]));
    assert!(near(
        runtime.orbit().target,
        [-60.0 + 0.05 * 100.0, 30.0, 200.0 - 0.05 * 140.0]
    ));
    Ok(())
}

#[test]
fn forced_mode_without_policy_only_reports() -> Result<()> {
    let (mut runtime, _) = settled_inside()?;
    let mode = runtime.change_view(ViewChange::Force {
        mode: ViewMode::Vertical,
        then: PostTransition::Nothing,
    });
    assert_eq!(mode, ViewMode::Vertical);
    assert_eq!(runtime.view_mode(), ViewMode::Vertical);
    assert_eq!(
        runtime.drain_notifications(),
        vec![Notification::ViewChanged(ViewMode::Vertical)]
    );
    assert!(!runtime.orbit().enable_zoom);
    assert!(runtime.orbit().enable_rotate);
    assert!(ceiling_visible(&runtime));
    assert!(!is_visible(&runtime, "enter-arrow"));
    assert!(runtime.active_tween().is_none());
    Ok(())
}

#[test]
fn idle_spin_turns_model_over_empty_space() -> Result<()> {
    let mut runtime = runtime_with(ExhibitConfig {
        idle_spin: Some(0.01),
        ..config()
    })?;
    let start = Instant::now();
    let model = runtime.model().expect("model loaded");
    let rotation = |runtime: &Runtime| {
        runtime
            .scene()
            .and_then(|scene| scene.get(model))
            .map(|node| node.rotation)
    };
    let identity = Some(Quaternion::new(1.0, 0.0, 0.0, 0.0));

    runtime.frame(start);
    assert_eq!(rotation(&runtime), identity);

    runtime.pointer_move(1.0, 1.0, start);
    runtime.frame(start + FRAME);
    assert_ne!(rotation(&runtime), identity);
    Ok(())
}

#[test]
fn clips_play_from_one_second_and_loop() -> Result<()> {
    let mut runtime = runtime_with(config())?;
    let walk = |runtime: &Runtime| {
        runtime
            .animation()
            .and_then(|player| player.action("walk"))
            .map(|action| action.time())
    };
    assert_eq!(walk(&runtime), Some(1.0));

    let start = Instant::now();
    runtime.frame(start);
    runtime.frame(start + Duration::from_secs(1));
    assert_eq!(walk(&runtime), Some(1.5));
    runtime.frame(start + Duration::from_secs(2));
    assert!(walk(&runtime).is_some_and(|time| time.abs() < 1.0e-12));
    Ok(())
}

#[test]
fn resize_burst_settles_on_latest_size() -> Result<()> {
    let mut runtime = runtime_with(config())?;
    let start = Instant::now();
    runtime.frame(start);
    assert!(runtime.resize(800.0, 600.0, start));
    assert!(!runtime.resize(900.0, 600.0, start + FRAME));
    assert!(!runtime.resize(1024.0, 512.0, start + FRAME * 2));
    assert_eq!(runtime.viewport(), Viewport::new(800.0, 600.0));

    runtime.frame(start + FRAME * 3);
    assert_eq!(runtime.viewport(), Viewport::new(800.0, 600.0));
    runtime.frame(start + GAP);
    assert_eq!(runtime.viewport(), Viewport::new(1024.0, 512.0));
    assert_eq!(runtime.camera().aspect, 2.0);
    let backend = runtime.renderer().expect("renderer attached");
    assert_eq!(backend.viewport, Some(Viewport::new(1024.0, 512.0)));
    Ok(())
}

#[test]
fn failed_load_leaves_runtime_empty() {
    let mut runtime = SceneRuntime::new(
        config(),
        MemorySceneProvider::new(),
        HeadlessBackend::default(),
        Viewport::new(1280.0, 720.0),
    );
    let err = runtime.load().expect_err("nothing registered");
    assert!(matches!(err, Error::Load { ref url, .. } if url == "hall.json"));
    assert!(runtime.model().is_none());

    runtime.frame(Instant::now());
    assert!(runtime.dispose().is_some());
}

#[test]
fn teardown_releases_everything_once() -> Result<()> {
    let mut runtime = runtime_with(config())?;
    let backend = runtime.dispose().expect("first teardown releases renderer");
    assert!(backend.listeners.is_empty());
    assert_eq!(backend.disposed_nodes.len(), 7);
    assert!(backend.context_lost);
    assert!(backend.disposed);
    assert_eq!(runtime.provider().cache_clears(), 1);
    assert!(runtime.scene().is_none());
    assert!(!runtime.is_live());

    assert!(runtime.dispose().is_none());
    assert_eq!(runtime.provider().cache_clears(), 1);
    let now = Instant::now();
    runtime.frame(now);
    assert!(!runtime.pointer_up(10.0, 10.0, now));
    assert!(runtime.drain_notifications().is_empty());
    Ok(())
}
