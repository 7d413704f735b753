//! Motion capability contracts and the plain-motion blend strategy.
//!
//! Motions arrive already parsed: this crate never touches file formats. A
//! manager only needs the fade timings; the plain queue additionally asks the
//! motion to write its own contribution (curve evaluation is the motion's
//! business, e.g. the native rig runtime behind a wrapper).

use rigmix_api_core::ParameterModel;

use crate::entry::QueueEntry;
use crate::queue::{BlendStrategy, FrameContext, QueueManager};

/// Read-only fade timings exposed by anything playable.
///
/// Fade durations at or below zero mean "no fade": full weight immediately.
pub trait MotionTimings {
    fn fade_in_seconds(&self) -> f32;
    fn fade_out_seconds(&self) -> f32;

    /// Scheduled playback length, if the motion has one. `None` keeps the
    /// entry playing until it is preempted or stopped.
    fn duration_seconds(&self) -> Option<f32> {
        None
    }
}

/// A motion on the exclusive channel: evaluates itself and writes parameter
/// contributions into the model.
pub trait Motion: MotionTimings {
    /// Evaluate the motion `time` seconds after its start and write its
    /// contribution into `model` at blend strength `weight`.
    fn apply(&self, model: &mut dyn ParameterModel, time: f32, weight: f32);
}

/// Exclusive-channel blending: each active entry writes its motion's
/// contribution at the entry's own fade weight. Crossfades emerge from the
/// newest entry fading in while the queue forces older ones out.
#[derive(Debug, Default)]
pub struct MotionBlend;

impl<M: Motion> BlendStrategy<M> for MotionBlend {
    fn on_update_entry(
        &mut self,
        model: &mut dyn ParameterModel,
        entry: &QueueEntry<M>,
        ctx: &FrameContext,
    ) {
        let weight = entry.fade_weight(ctx.total_seconds);
        entry
            .motion()
            .apply(model, ctx.total_seconds - entry.start_time(), weight);
    }
}

/// Queue manager over the exclusive motion channel.
pub type MotionQueueManager<M> = QueueManager<M, MotionBlend>;
