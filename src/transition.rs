//! Per-task fade progress for the list view.
//!
//! Progress lives here, keyed by task id, and never reaches the persisted
//! record. A task that is fading out stays in the collection until [`tick`]
//! reports its exit as finished.
//!
//! [`tick`]: TransitionController::tick

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

pub const DEFAULT_FADE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Fade {
    Settled(f32),
    Entering { started: Instant },
    Exiting { started: Instant, from: f32 },
}

#[derive(Debug)]
pub struct TransitionController {
    duration: Duration,
    fades: HashMap<String, Fade>,
}

impl Default for TransitionController {
    fn default() -> Self {
        Self::new(DEFAULT_FADE)
    }
}

impl TransitionController {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            fades: HashMap::new(),
        }
    }

    /// Collapses every transition; deletions take effect at once.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }

    /// Registers a fully visible item, e.g. one loaded from storage.
    pub fn settle(&mut self, id: &str) {
        self.fades.insert(id.to_string(), Fade::Settled(1.0));
    }

    pub fn enter(&mut self, id: &str, now: Instant) {
        let fade = if self.is_instant() {
            Fade::Settled(1.0)
        } else {
            Fade::Entering { started: now }
        };
        self.fades.insert(id.to_string(), fade);
    }

    /// Starts fading `id` out from wherever it currently is.
    ///
    /// Returns false if it is already on its way out.
    pub fn exit(&mut self, id: &str, now: Instant) -> bool {
        if self.is_exiting(id) {
            return false;
        }
        let from = self.progress(id, now);
        self.fades
            .insert(id.to_string(), Fade::Exiting { started: now, from });
        true
    }

    pub fn is_exiting(&self, id: &str) -> bool {
        matches!(self.fades.get(id), Some(Fade::Exiting { .. }))
    }

    pub fn discard(&mut self, id: &str) {
        self.fades.remove(id);
    }

    /// Unknown ids are fully visible.
    pub fn progress(&self, id: &str, now: Instant) -> f32 {
        match self.fades.get(id) {
            None => 1.0,
            Some(Fade::Settled(value)) => *value,
            Some(Fade::Entering { started }) => ease(self.elapsed(*started, now)),
            Some(Fade::Exiting { started, from }) => {
                from * (1.0 - ease(self.elapsed(*started, now)))
            }
        }
    }

    pub fn is_animating(&self) -> bool {
        self.fades
            .values()
            .any(|fade| !matches!(fade, Fade::Settled(_)))
    }

    /// Settles finished entrances and returns the ids whose exit is done.
    ///
    /// Exited ids keep their (zero) progress until [`discard`](Self::discard).
    pub fn tick(&mut self, now: Instant) -> Vec<String> {
        let mut exited = Vec::new();
        for (id, fade) in self.fades.iter_mut() {
            let current = *fade;
            match current {
                Fade::Entering { started } if now.duration_since(started) >= self.duration => {
                    *fade = Fade::Settled(1.0);
                }
                Fade::Exiting { started, .. } if now.duration_since(started) >= self.duration => {
                    *fade = Fade::Settled(0.0);
                    exited.push(id.clone());
                }
                _ => {}
            }
        }
        exited.sort();
        exited
    }

    fn elapsed(&self, started: Instant, now: Instant) -> f32 {
        if self.is_instant() {
            return 1.0;
        }
        let t = now.saturating_duration_since(started).as_secs_f32() / self.duration.as_secs_f32();
        t.clamp(0.0, 1.0)
    }
}

fn ease(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}
