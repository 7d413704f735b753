//! Generic motion queue: ordered entries, crossfade preemption, priorities.
//!
//! One engine drives both motion channels; the per-channel blending policy is
//! a `BlendStrategy`. The queue owns entry lifecycles: a newly started motion
//! always wins, forcing every older entry into fade-out on its first update
//! (immediate crossfade cutover). Entries are advanced in insertion order
//! (oldest first) and terminal entries are removed in a second pass, so
//! removal ordering is explicit and no iteration is invalidated mid-frame.

use std::sync::Arc;

use rigmix_api_core::ParameterModel;

use crate::config::Config;
use crate::entry::{EntryEvent, EntryState, QueueEntry};
use crate::ids::{EntryHandle, HandleAllocator};
use crate::motion::MotionTimings;

/// Per-frame data handed to strategy hooks.
#[derive(Copy, Clone, Debug)]
pub struct FrameContext {
    pub total_seconds: f32,
    pub dt: f32,
    /// Index of the entry within the queue this frame (0 = oldest).
    pub index: usize,
}

/// Per-channel blending policy plugged into `QueueManager`.
pub trait BlendStrategy<M> {
    /// A motion was queued.
    fn on_start(&mut self, _motion: &M) {}

    /// Called for each active entry, oldest first.
    fn on_update_entry(
        &mut self,
        model: &mut dyn ParameterModel,
        entry: &QueueEntry<M>,
        ctx: &FrameContext,
    );

    /// Called after all entries were advanced, before terminal entries are
    /// dropped. May force-retire superseded entries and write final values.
    fn end_frame(
        &mut self,
        _model: &mut dyn ParameterModel,
        _entries: &mut [QueueEntry<M>],
        _total_seconds: f32,
    ) {
    }

    /// The queue was cleared by a hard stop, or drained on its own.
    fn on_stop_all(&mut self) {}
}

/// Owns an ordered sequence of queue entries, advances time, applies
/// priority/preemption rules, and produces parameter writes through its
/// strategy.
#[derive(Debug)]
pub struct QueueManager<M, S> {
    entries: Vec<QueueEntry<M>>,
    strategy: S,
    handles: HandleAllocator,
    total_seconds: f32,
    current_priority: i32,
    reserve_priority: i32,
}

impl<M: MotionTimings, S: BlendStrategy<M> + Default> Default for QueueManager<M, S> {
    fn default() -> Self {
        Self::with_strategy(S::default())
    }
}

impl<M: MotionTimings, S: BlendStrategy<M>> QueueManager<M, S> {
    pub fn new() -> Self
    where
        S: Default,
    {
        Self::with_strategy(S::default())
    }

    pub fn with_strategy(strategy: S) -> Self {
        Self::with_config(strategy, &Config::default())
    }

    pub fn with_config(strategy: S, cfg: &Config) -> Self {
        Self {
            entries: Vec::with_capacity(cfg.queue_capacity),
            strategy,
            handles: HandleAllocator::new(),
            total_seconds: 0.0,
            current_priority: 0,
            reserve_priority: 0,
        }
    }

    /// Append a new entry unconditionally; never blocks, never rejects.
    /// The crossfade cutover happens on the next `update`.
    pub fn start_motion(&mut self, motion: Arc<M>) -> EntryHandle {
        let handle = self.handles.alloc();
        log::debug!("queue entry {} started", handle.0);
        self.strategy.on_start(&motion);
        self.entries.push(QueueEntry::new(handle, motion));
        handle
    }

    /// Start a motion that was (possibly) reserved at `priority`: a matching
    /// reservation is consumed, and the priority becomes current.
    pub fn start_motion_with_priority(&mut self, motion: Arc<M>, priority: i32) -> EntryHandle {
        if priority == self.reserve_priority {
            self.reserve_priority = 0;
        }
        self.current_priority = priority;
        self.start_motion(motion)
    }

    /// Claim the right to start a motion at `priority` later, without racing
    /// a concurrently-starting lower-priority one. Returns false (no-op) when
    /// the claim does not beat both the current and the reserved priority.
    pub fn reserve_motion(&mut self, priority: i32) -> bool {
        if priority <= self.reserve_priority || priority <= self.current_priority() {
            return false;
        }
        self.reserve_priority = priority;
        true
    }

    /// Overwrite the reservation, e.g. to abandon a claim after a failed load.
    pub fn set_reserve_priority(&mut self, priority: i32) {
        self.reserve_priority = priority;
    }

    /// Advance the queue by `dt` seconds and apply contributions to `model`.
    /// Returns whether any entry was present before the cleanup sweep.
    pub fn update(&mut self, model: &mut dyn ParameterModel, dt: f32) -> bool {
        debug_assert!(dt >= 0.0, "update requires a non-negative dt");
        self.total_seconds += dt;
        let total = self.total_seconds;

        // Newest entry wins: a freshly queued motion forces everything older
        // into fade-out. Older entries still in Init are started first so
        // their fade timing has a valid origin.
        if self
            .entries
            .last()
            .is_some_and(|e| e.state() == EntryState::Init)
        {
            let newest = self.entries.len() - 1;
            for entry in &mut self.entries[..newest] {
                if entry.state() == EntryState::Init {
                    entry.dispatch(EntryEvent::Started { at: total });
                }
                if entry.is_active() {
                    log::trace!("queue entry {} preempted", entry.handle().0);
                }
                entry.dispatch(EntryEvent::FadeOutRequested { at: total });
            }
        }

        // Phase 1: advance lifecycles and collect contributions, oldest first.
        for index in 0..self.entries.len() {
            {
                let entry = &mut self.entries[index];
                if entry.state() == EntryState::Init {
                    entry.dispatch(EntryEvent::Started { at: total });
                }
                if entry.state() == EntryState::FadeIn && entry.fade_in_weight(total) >= 1.0 {
                    entry.dispatch(EntryEvent::FadeInComplete);
                }
            }
            if self.entries[index].is_active() {
                let ctx = FrameContext {
                    total_seconds: total,
                    dt,
                    index,
                };
                self.strategy
                    .on_update_entry(model, &self.entries[index], &ctx);
            }
            let entry = &mut self.entries[index];
            if entry.is_active() && entry.is_past_end(total) {
                log::trace!("queue entry {} finished", entry.handle().0);
                entry.dispatch(EntryEvent::Finished);
            }
        }

        self.strategy.end_frame(model, &mut self.entries, total);

        // Phase 2: drop terminal entries.
        let had_entries = !self.entries.is_empty();
        self.entries.retain(|e| !e.state().is_terminal());

        if self.entries.is_empty() {
            // A drained queue releases its playback priority.
            self.current_priority = 0;
        }
        had_entries
    }

    /// Synchronous hard cut: clears the queue with no fade-out. Distinct from
    /// the normal FadeOut -> End retirement.
    pub fn stop_all_motions(&mut self) {
        log::debug!("queue hard stop, dropping {} entries", self.entries.len());
        self.entries.clear();
        self.current_priority = 0;
        self.strategy.on_stop_all();
    }

    /// True when no entry is queued or playing.
    pub fn is_finished(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the given playback instance is no longer in the queue.
    pub fn is_finished_by_handle(&self, handle: EntryHandle) -> bool {
        !self
            .entries
            .iter()
            .any(|e| e.handle() == handle && !e.state().is_terminal())
    }

    pub fn entry(&self, handle: EntryHandle) -> Option<&QueueEntry<M>> {
        self.entries.iter().find(|e| e.handle() == handle)
    }

    /// Set whether the entry restarts its fade-in when its motion loops.
    /// Returns false when the handle is no longer queued.
    pub fn set_loop_fade_in(&mut self, handle: EntryHandle, loop_fade_in: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.handle() == handle) {
            Some(entry) => {
                entry.set_loop_fade_in(loop_fade_in);
                true
            }
            None => false,
        }
    }

    pub fn entries(&self) -> &[QueueEntry<M>] {
        &self.entries
    }

    /// Priority of the playing motion; reads as 0 while the queue is empty.
    pub fn current_priority(&self) -> i32 {
        if self.entries.is_empty() {
            0
        } else {
            self.current_priority
        }
    }

    /// Pending reservation. Unlike `current_priority`, a reservation
    /// survives an idle queue: it claims the channel before the reserved
    /// motion is loaded and started.
    pub fn reserve_priority(&self) -> i32 {
        self.reserve_priority
    }

    pub fn total_seconds(&self) -> f32 {
        self.total_seconds
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }
}
