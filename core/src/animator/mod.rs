//! Overlay animation state machine.
//!
//! A single overlay animation runs at a time and moves through four phases:
//! - Idle: nothing drawn, waiting for a request
//! - FadeIn: opacity eases 0 -> 1
//! - Hold: fully opaque
//! - FadeOut: opacity eases 1 -> 0, then back to Idle
//!
//! The scale of the foreground image follows one ease-out curve spanning the
//! whole cycle, so it stays continuous across phase boundaries.
//!
//! Requests may come from event callbacks while the render thread polls; the
//! whole session lives behind one mutex so a request and a poll never observe
//! a half-updated session.

mod clock;
pub mod easing;

pub use clock::{Clock, ManualClock, SystemClock};

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use erfx_types::AnimationVariant;

/// Default fade-in length
pub const FADE_IN: Duration = Duration::from_millis(1000);
/// Default fully-opaque hold length
pub const HOLD: Duration = Duration::from_millis(1600);
/// Default fade-out length
pub const FADE_OUT: Duration = Duration::from_millis(2000);

/// Foreground scale at the start of the cycle
pub const SCALE_FROM: f32 = 0.95;
/// Foreground scale at the end of the cycle
pub const SCALE_TO: f32 = 1.05;

/// Phase lengths for one animation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationTimings {
    pub fade_in: Duration,
    pub hold: Duration,
    pub fade_out: Duration,
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self {
            fade_in: FADE_IN,
            hold: HOLD,
            fade_out: FADE_OUT,
        }
    }
}

impl AnimationTimings {
    /// Total length of a cycle
    pub fn cycle(&self) -> Duration {
        self.fade_in + self.hold + self.fade_out
    }

    /// Offset at which the fade-out curve starts
    pub fn fade_out_start(&self) -> Duration {
        self.fade_in + self.hold
    }

    /// Phase for a given time since the request was accepted.
    ///
    /// Boundaries use strict comparisons: the last instant of a phase still
    /// belongs to it.
    pub fn phase_at(&self, elapsed: Duration) -> AnimationPhase {
        if elapsed > self.cycle() {
            AnimationPhase::Idle
        } else if elapsed > self.fade_out_start() {
            AnimationPhase::FadeOut
        } else if elapsed > self.fade_in {
            AnimationPhase::Hold
        } else {
            AnimationPhase::FadeIn
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationPhase {
    #[default]
    Idle,
    FadeIn,
    Hold,
    FadeOut,
}

/// Result of an animation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestResult {
    Accepted,
    /// Another animation is in flight; the request was dropped
    Rejected { active: AnimationVariant },
}

impl RequestResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RequestResult::Accepted)
    }
}

/// What the renderer should draw this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderDescriptor {
    pub variant: AnimationVariant,
    pub phase: AnimationPhase,
    /// Layer opacity, 0.0 - 1.0
    pub opacity: f32,
    /// Foreground scale factor
    pub scale: f32,
}

#[derive(Debug, Clone, Copy)]
struct AnimationSession {
    variant: AnimationVariant,
    started: Instant,
    phase: AnimationPhase,
}

/// Single-instance overlay animation driven by per-frame polling.
pub struct OverlayAnimator {
    clock: Arc<dyn Clock>,
    timings: AnimationTimings,
    session: Mutex<Option<AnimationSession>>,
}

impl OverlayAnimator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_timings(clock, AnimationTimings::default())
    }

    pub fn with_timings(clock: Arc<dyn Clock>, timings: AnimationTimings) -> Self {
        Self {
            clock,
            timings,
            session: Mutex::new(None),
        }
    }

    pub fn timings(&self) -> AnimationTimings {
        self.timings
    }

    fn lock(&self) -> MutexGuard<'_, Option<AnimationSession>> {
        // Session is plain data; a panicked poll leaves it intact.
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start an animation if none is running.
    pub fn request(&self, variant: AnimationVariant) -> RequestResult {
        let mut session = self.lock();
        if let Some(active) = session.as_ref() {
            tracing::debug!(
                requested = ?variant,
                active = ?active.variant,
                "Overlay busy, dropping request"
            );
            return RequestResult::Rejected {
                active: active.variant,
            };
        }

        *session = Some(AnimationSession {
            variant,
            started: self.clock.now(),
            phase: AnimationPhase::FadeIn,
        });
        tracing::debug!(?variant, "Overlay animation started");
        RequestResult::Accepted
    }

    /// Advance the animation and describe the current frame.
    ///
    /// Returns `None` while idle. Call once per rendered frame.
    pub fn poll(&self) -> Option<RenderDescriptor> {
        let now = self.clock.now();
        let mut guard = self.lock();
        let session = guard.as_mut()?;

        let elapsed = now.saturating_duration_since(session.started);
        let phase = self.timings.phase_at(elapsed);
        if phase != session.phase {
            tracing::trace!(from = ?session.phase, to = ?phase, ?elapsed, "Overlay phase change");
            session.phase = phase;
        }

        if phase == AnimationPhase::Idle {
            tracing::debug!(variant = ?session.variant, "Overlay animation finished");
            *guard = None;
            return None;
        }

        Some(RenderDescriptor {
            variant: session.variant,
            phase,
            opacity: self.opacity_at(phase, elapsed),
            scale: self.scale_at(elapsed),
        })
    }

    /// Phase as of the most recent poll (or request).
    pub fn phase(&self) -> AnimationPhase {
        self.lock().as_ref().map(|s| s.phase).unwrap_or_default()
    }

    pub fn is_idle(&self) -> bool {
        self.lock().is_none()
    }

    /// Variant of the running animation, if any
    pub fn active_variant(&self) -> Option<AnimationVariant> {
        self.lock().as_ref().map(|s| s.variant)
    }

    fn opacity_at(&self, phase: AnimationPhase, elapsed: Duration) -> f32 {
        match phase {
            AnimationPhase::Idle => 0.0,
            AnimationPhase::FadeIn => easing::in_out_cubic(progress(elapsed, self.timings.fade_in)),
            AnimationPhase::Hold => 1.0,
            AnimationPhase::FadeOut => {
                let into = elapsed.saturating_sub(self.timings.fade_out_start());
                1.0 - easing::in_out_cubic(progress(into, self.timings.fade_out))
            }
        }
    }

    fn scale_at(&self, elapsed: Duration) -> f32 {
        easing::out_cubic_range(
            progress(elapsed, self.timings.cycle()),
            SCALE_FROM,
            SCALE_TO,
        )
    }
}

/// Fraction of `total` covered by `elapsed`. Zero-length spans count as done.
fn progress(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    elapsed.as_secs_f32() / total.as_secs_f32()
}
