//! Speed-driven animation state machine
//!
//! Maps the controller's scalar speed to a named locomotion state and
//! cross-fades between states. The state set is data-driven from the clips
//! registered at load time; the rendering boundary samples poses from the
//! current state, fade partner, and playback times reported here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Speed thresholds for locomotion state selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationThresholds {
    /// Below this the avatar idles
    pub walk: f32,
    /// At or above this the avatar runs
    pub run: f32,
}

impl Default for AnimationThresholds {
    fn default() -> Self {
        Self { walk: 0.1, run: 3.0 }
    }
}

#[derive(Debug, Clone)]
struct Clip {
    duration: f32,
    looping: bool,
}

#[derive(Debug, Clone)]
struct Crossfade {
    from: String,
    elapsed: f32,
}

/// Animation selector with cross-fade between states
#[derive(Debug, Clone)]
pub struct AnimationStateMachine {
    clips: HashMap<String, Clip>,
    thresholds: AnimationThresholds,
    fade_duration: f32,
    current: Option<String>,
    playback_time: f32,
    fade: Option<Crossfade>,
    crossfades_started: u64,
}

impl AnimationStateMachine {
    pub fn new() -> Self {
        Self::with_thresholds(AnimationThresholds::default())
    }

    pub fn with_thresholds(thresholds: AnimationThresholds) -> Self {
        Self {
            clips: HashMap::new(),
            thresholds,
            fade_duration: 0.25,
            current: None,
            playback_time: 0.0,
            fade: None,
            crossfades_started: 0,
        }
    }

    /// Register a clip by name. Clips default to looping; `play` can
    /// override per activation.
    pub fn add_clip(&mut self, name: impl Into<String>, duration: f32) {
        self.clips.insert(name.into(), Clip { duration, looping: true });
    }

    /// Switch to a named state. Re-requesting the active state is a no-op;
    /// unknown names are ignored. The very first activation snaps with no
    /// fade, later switches cross-fade over the fade duration.
    pub fn play(&mut self, name: &str, looping: bool) {
        if self.current.as_deref() == Some(name) {
            return;
        }
        let Some(clip) = self.clips.get_mut(name) else {
            return;
        };
        clip.looping = looping;

        if let Some(previous) = self.current.take() {
            self.fade = Some(Crossfade { from: previous, elapsed: 0.0 });
            self.crossfades_started += 1;
        }
        self.current = Some(name.to_string());
        self.playback_time = 0.0;
    }

    /// Pick the locomotion state for a movement speed
    pub fn update_by_speed(&mut self, speed: f32) {
        if speed < self.thresholds.walk {
            self.play("Idle", true);
        } else if speed < self.thresholds.run {
            self.play("Walk", true);
        } else {
            self.play("Run", true);
        }
    }

    /// Advance playback and any in-flight cross-fade
    pub fn update(&mut self, dt: f32) {
        if let Some(fade) = &mut self.fade {
            fade.elapsed += dt;
            if fade.elapsed >= self.fade_duration {
                self.fade = None;
            }
        }

        let Some(current) = &self.current else {
            return;
        };
        let clip = &self.clips[current];
        self.playback_time += dt;
        if clip.looping {
            if clip.duration > 0.0 {
                self.playback_time %= clip.duration;
            }
        } else {
            // One-shot states clamp on their last frame
            self.playback_time = self.playback_time.min(clip.duration);
        }
    }

    /// Name of the active state, if any state has been activated yet
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Blend weight of the incoming state: 1.0 outside a fade, ramping from
    /// 0.0 during one
    pub fn blend_weight(&self) -> f32 {
        match &self.fade {
            Some(fade) => (fade.elapsed / self.fade_duration).clamp(0.0, 1.0),
            None => 1.0,
        }
    }

    /// State being faded out, while a cross-fade is in flight
    pub fn fading_from(&self) -> Option<&str> {
        self.fade.as_ref().map(|f| f.from.as_str())
    }

    /// Playback time into the active clip
    pub fn playback_time(&self) -> f32 {
        self.playback_time
    }

    /// Total cross-fades started since creation
    pub fn crossfades_started(&self) -> u64 {
        self.crossfades_started
    }
}

impl Default for AnimationStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
