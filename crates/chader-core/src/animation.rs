//! Fade-in animation for newly created shapes.

use crate::config::FadeConfig;
use crate::shapes::ShapeId;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(not(target_arch = "wasm32"))]
pub use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
pub use web_time::{Duration, Instant};

/// Cancels a running fade. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct FadeHandle(Arc<AtomicBool>);

impl FadeHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of polling a fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeStatus {
    Running,
    Finished,
    Cancelled,
}

/// Repeating task raising a shape's opacity by a fixed step until it reaches 1.
#[derive(Debug)]
pub struct FadeIn {
    shape: ShapeId,
    step: f32,
    interval: Duration,
    last_tick: Instant,
    handle: FadeHandle,
}

impl FadeIn {
    pub fn new(shape: ShapeId, config: &FadeConfig, started: Instant) -> Self {
        Self {
            shape,
            step: config.step.max(f32::EPSILON),
            interval: config.interval(),
            last_tick: started,
            handle: FadeHandle::default(),
        }
    }

    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    pub fn handle(&self) -> FadeHandle {
        self.handle.clone()
    }

    /// Apply every step that has come due by `now` to `opacity`.
    pub fn poll(&mut self, now: Instant, opacity: &mut f32) -> FadeStatus {
        if self.handle.is_cancelled() {
            return FadeStatus::Cancelled;
        }

        let elapsed = now.saturating_duration_since(self.last_tick);
        let due = if self.interval.is_zero() {
            1
        } else {
            (elapsed.as_nanos() / self.interval.as_nanos()) as u64
        };
        if due > 0 {
            let remaining = ((1.0 - *opacity) / self.step).ceil().max(0.0) as u64;
            let steps = due.min(remaining.max(1));
            *opacity = if steps >= remaining {
                1.0
            } else {
                (*opacity + self.step * steps as f32).min(1.0)
            };
            self.last_tick += self.interval * steps as u32;
        }

        if *opacity >= 1.0 {
            FadeStatus::Finished
        } else {
            FadeStatus::Running
        }
    }
}
