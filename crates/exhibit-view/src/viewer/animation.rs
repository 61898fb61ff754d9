use std::collections::HashMap;

use exhibit_scene::AnimationClip;

#[derive(Clone, Debug, PartialEq)]
pub struct ClipAction {
    pub clip: AnimationClip,
    pub time_scale: f64,
    time: f64,
}

impl ClipAction {
    /// Local playback position, wrapped into the clip length.
    pub fn time(&self) -> f64 {
        self.time
    }
}

/// Plays every clip of a model on repeat.
#[derive(Clone, Debug, Default)]
pub struct AnimationPlayer {
    actions: Vec<ClipAction>,
}

impl AnimationPlayer {
    pub fn new(clips: &[AnimationClip], start: f64, time_scales: &HashMap<String, f64>) -> Self {
        let actions = clips
            .iter()
            .map(|clip| {
                let mut action = ClipAction {
                    clip: clip.clone(),
                    time_scale: time_scales.get(&clip.name).copied().unwrap_or(1.0),
                    time: 0.0,
                };
                action.time = wrap(start, action.clip.duration);
                action
            })
            .collect();
        Self { actions }
    }

    pub fn update(&mut self, dt: f64) {
        for action in &mut self.actions {
            action.time = wrap(action.time + dt * action.time_scale, action.clip.duration);
        }
    }

    pub fn actions(&self) -> &[ClipAction] {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&ClipAction> {
        self.actions.iter().find(|action| action.clip.name == name)
    }
}

fn wrap(time: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        0.0
    } else {
        time.rem_euclid(duration)
    }
}
