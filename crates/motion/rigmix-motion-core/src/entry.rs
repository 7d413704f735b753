//! Per-motion lifecycle: one queued playback instance and its state machine.
//!
//! Transitions live in a pure table (`transition`) kept separate from entry
//! data; `QueueEntry::dispatch` runs the table and interprets the returned
//! side effect. Timing rules:
//! - `start_time` is recorded when the entry leaves `Init`.
//! - `end_time < 0` means unscheduled; finite motions schedule
//!   `start + duration` on start, and a fade-out request schedules
//!   `now + fade_out` unless an earlier end is already on the books.
//! - The entry is due for `End` once `0 < end_time < total_seconds`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::easing::{ease_sine, fade_factor};
use crate::ids::EntryHandle;
use crate::motion::MotionTimings;

/// Lifecycle states. `FadeIn`, `Playing` and `FadeOut` are "active";
/// `Init` has not started yet and `End` is terminal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum EntryState {
    Init,
    FadeIn,
    Playing,
    FadeOut,
    End,
}

impl EntryState {
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, EntryState::FadeIn | EntryState::Playing | EntryState::FadeOut)
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        self == EntryState::End
    }
}

/// Events that drive an entry through its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EntryEvent {
    /// First update after the entry was queued.
    Started { at: f32 },
    /// The fade-in window has fully elapsed.
    FadeInComplete,
    /// Preemption by a newer entry, or a scheduled end approaching.
    FadeOutRequested { at: f32 },
    /// The scheduled end has passed, or a force-retire.
    Finished,
}

/// Side effect the owning entry must run when a transition fires.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SideEffect {
    /// Record the start time point and run start-time setup.
    RecordStart { at: f32 },
    /// Schedule `end_time = at + fade_out`, keeping an earlier schedule.
    ScheduleFadeOut { at: f32 },
}

/// Pure transition table: `(state, event) -> (next state, side effect)`.
/// Pairs not listed keep the current state and do nothing.
pub fn transition(state: EntryState, event: EntryEvent) -> (EntryState, Option<SideEffect>) {
    use EntryState::*;
    match (state, event) {
        (Init, EntryEvent::Started { at }) => (FadeIn, Some(SideEffect::RecordStart { at })),
        (FadeIn, EntryEvent::FadeInComplete) => (Playing, None),
        (FadeIn | Playing | FadeOut, EntryEvent::FadeOutRequested { at }) => {
            (FadeOut, Some(SideEffect::ScheduleFadeOut { at }))
        }
        (_, EntryEvent::Finished) => (End, None),
        (s, _) => (s, None),
    }
}

/// One active playback instance of a motion, owned by its manager's queue.
#[derive(Debug)]
pub struct QueueEntry<M> {
    handle: EntryHandle,
    motion: Arc<M>,
    state: EntryState,
    start_time: f32,
    /// Negative while unscheduled.
    end_time: f32,
    loop_fade_in: bool,
}

impl<M: MotionTimings> QueueEntry<M> {
    pub(crate) fn new(handle: EntryHandle, motion: Arc<M>) -> Self {
        Self {
            handle,
            motion,
            state: EntryState::Init,
            start_time: 0.0,
            end_time: -1.0,
            loop_fade_in: false,
        }
    }

    #[inline]
    pub fn handle(&self) -> EntryHandle {
        self.handle
    }

    #[inline]
    pub fn motion(&self) -> &M {
        &self.motion
    }

    #[inline]
    pub fn state(&self) -> EntryState {
        self.state
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    #[inline]
    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    #[inline]
    pub fn end_time(&self) -> f32 {
        self.end_time
    }

    /// Whether the fade-in window should restart when the motion loops.
    /// Consulted by drivers of looping motions; the queue itself only stores it.
    #[inline]
    pub fn loop_fade_in(&self) -> bool {
        self.loop_fade_in
    }

    pub fn set_loop_fade_in(&mut self, loop_fade_in: bool) {
        self.loop_fade_in = loop_fade_in;
    }

    /// The scheduled end has passed.
    #[inline]
    pub fn is_past_end(&self, total_seconds: f32) -> bool {
        0.0 < self.end_time && self.end_time < total_seconds
    }

    /// Run the transition table and interpret its side effect.
    pub(crate) fn dispatch(&mut self, event: EntryEvent) {
        let (next, effect) = transition(self.state, event);
        self.state = next;
        match effect {
            Some(SideEffect::RecordStart { at }) => {
                self.start_time = at;
                if let Some(duration) = self.motion.duration_seconds() {
                    self.end_time = at + duration;
                }
            }
            Some(SideEffect::ScheduleFadeOut { at }) => {
                let new_end = at + self.motion.fade_out_seconds().max(0.0);
                // Never shorten an already-correct schedule; re-requests are
                // idempotent.
                if !(0.0 <= self.end_time && self.end_time <= new_end) {
                    self.end_time = new_end;
                }
            }
            None => {}
        }
    }

    /// Fade-in factor alone, used for the expression total weight.
    #[inline]
    pub fn fade_in_weight(&self, t: f32) -> f32 {
        fade_factor(t - self.start_time, self.motion.fade_in_seconds())
    }

    /// Blend strength at time `t`: fade-in factor times fade-out factor.
    ///
    /// A result outside [0,1] means the timing state is corrupt; that is a
    /// fatal invariant violation, never clamped.
    pub fn fade_weight(&self, t: f32) -> f32 {
        let fade_in = self.fade_in_weight(t);
        let fade_out = if self.motion.fade_out_seconds() <= 0.0 || self.end_time < 0.0 {
            1.0
        } else {
            ease_sine((self.end_time - t) / self.motion.fade_out_seconds())
        };
        let weight = fade_in * fade_out;
        assert!(
            (0.0..=1.0).contains(&weight),
            "fade weight {weight} out of [0,1]: corrupted timing state"
        );
        weight
    }
}
