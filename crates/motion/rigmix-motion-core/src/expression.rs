//! Expression blending: simultaneous multi-entry weighted accumulation with
//! add/multiply/overwrite semantics.
//!
//! The expression queue reuses the generic engine; only the blending policy
//! differs. Per-parameter accumulators persist across frames on the strategy:
//! the oldest entry in the queue writes them directly (bootstrap, nothing to
//! blend against) and every later entry lerps by its own fade weight. Entries
//! also relax accumulators they do not reference toward neutral, so a retired
//! expression's influence decays instead of sticking forever.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use rigmix_api_core::{lerp_f32, BlendMode, ParamId, ParameterModel};

use crate::config::Config;
use crate::entry::{EntryEvent, QueueEntry};
use crate::motion::MotionTimings;
use crate::queue::{BlendStrategy, FrameContext, QueueManager};

/// One (parameter, mode, value) effect carried by an expression motion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpressionEffect {
    pub param: ParamId,
    pub mode: BlendMode,
    pub value: f32,
}

/// An expression motion: fade timings plus an ordered effect list.
/// Parameter ids are unique within one motion.
pub trait ExpressionSource: MotionTimings {
    fn effects(&self) -> &[ExpressionEffect];
}

/// Plain-old-data expression, the usual product of an external loader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpressionData {
    pub fade_in_seconds: f32,
    pub fade_out_seconds: f32,
    pub effects: Vec<ExpressionEffect>,
}

impl MotionTimings for ExpressionData {
    fn fade_in_seconds(&self) -> f32 {
        self.fade_in_seconds
    }

    fn fade_out_seconds(&self) -> f32 {
        self.fade_out_seconds
    }
}

impl ExpressionSource for ExpressionData {
    fn effects(&self) -> &[ExpressionEffect] {
        &self.effects
    }
}

/// Per-parameter running blend state. Lives as long as its strategy and
/// persists across frames; `overwrite` seeds from the model's value so an
/// additive-only expression still composes over the rig's current pose.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExpressionAccumulator {
    pub additive: f32,
    pub multiply: f32,
    pub overwrite: f32,
}

impl ExpressionAccumulator {
    pub const NEUTRAL_ADDITIVE: f32 = 0.0;
    pub const NEUTRAL_MULTIPLY: f32 = 1.0;

    fn seeded(overwrite: f32) -> Self {
        Self {
            additive: Self::NEUTRAL_ADDITIVE,
            multiply: Self::NEUTRAL_MULTIPLY,
            overwrite,
        }
    }

    /// Final value this accumulator contributes to its parameter.
    #[inline]
    pub fn value(&self) -> f32 {
        (self.overwrite + self.additive) * self.multiply
    }
}

/// Multi-entry accumulation strategy for the expression channel.
#[derive(Debug, Default)]
pub struct ExpressionBlend {
    accumulators: HashMap<ParamId, ExpressionAccumulator>,
}

impl ExpressionBlend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            accumulators: HashMap::with_capacity(capacity),
        }
    }

    /// Strategy sized from a manager config.
    pub fn from_config(cfg: &Config) -> Self {
        Self::with_capacity(cfg.accumulator_capacity)
    }

    /// Current blend state for a parameter, if any entry referenced it.
    pub fn accumulator(&self, param: ParamId) -> Option<&ExpressionAccumulator> {
        self.accumulators.get(&param)
    }
}

impl<M: ExpressionSource> BlendStrategy<M> for ExpressionBlend {
    fn on_update_entry(
        &mut self,
        model: &mut dyn ParameterModel,
        entry: &QueueEntry<M>,
        ctx: &FrameContext,
    ) {
        let w = entry.fade_weight(ctx.total_seconds);
        // Queue index 0 bootstraps the mix: direct writes, no prior
        // contribution to blend against.
        let bootstrap = ctx.index == 0;
        let effects = entry.motion().effects();

        for fx in effects {
            let acc = self
                .accumulators
                .entry(fx.param)
                .or_insert_with(|| ExpressionAccumulator::seeded(model.parameter_value(fx.param)));
            let (additive, multiply, overwrite) = match fx.mode {
                BlendMode::Add => (
                    fx.value,
                    ExpressionAccumulator::NEUTRAL_MULTIPLY,
                    acc.overwrite,
                ),
                BlendMode::Multiply => (
                    ExpressionAccumulator::NEUTRAL_ADDITIVE,
                    fx.value,
                    acc.overwrite,
                ),
                BlendMode::Overwrite => (
                    ExpressionAccumulator::NEUTRAL_ADDITIVE,
                    ExpressionAccumulator::NEUTRAL_MULTIPLY,
                    fx.value,
                ),
            };
            if bootstrap {
                acc.additive = additive;
                acc.multiply = multiply;
                acc.overwrite = overwrite;
            } else {
                acc.additive = lerp_f32(acc.additive, additive, w);
                acc.multiply = lerp_f32(acc.multiply, multiply, w);
                acc.overwrite = lerp_f32(acc.overwrite, overwrite, w);
            }
        }

        // Parameters this entry does not touch relax toward neutral, so a
        // retired expression's influence decays at the entry's own weight.
        for (param, acc) in self.accumulators.iter_mut() {
            if effects.iter().any(|fx| fx.param == *param) {
                continue;
            }
            if bootstrap {
                acc.additive = ExpressionAccumulator::NEUTRAL_ADDITIVE;
                acc.multiply = ExpressionAccumulator::NEUTRAL_MULTIPLY;
            } else {
                acc.additive = lerp_f32(acc.additive, ExpressionAccumulator::NEUTRAL_ADDITIVE, w);
                acc.multiply = lerp_f32(acc.multiply, ExpressionAccumulator::NEUTRAL_MULTIPLY, w);
            }
        }
    }

    fn end_frame(
        &mut self,
        model: &mut dyn ParameterModel,
        entries: &mut [QueueEntry<M>],
        total_seconds: f32,
    ) {
        // Once the newest entry is fully crossfaded in, every strictly older
        // entry is superseded and must stop contributing now, ahead of the
        // cleanup pass.
        if let Some(newest) = entries.len().checked_sub(1) {
            if entries[newest].is_active() && entries[newest].fade_weight(total_seconds) >= 1.0 {
                for entry in &mut entries[..newest] {
                    entry.dispatch(EntryEvent::Finished);
                }
            }
        }

        // Total applied weight uses only the fade-in component, clamped so
        // overlapping expressions never exceed full strength.
        let mut weight = 0.0f32;
        let mut any_active = false;
        for entry in entries.iter() {
            if entry.is_active() {
                any_active = true;
                weight += entry.fade_in_weight(total_seconds);
            }
        }
        if !any_active {
            // Every referencing entry has retired; stale accumulators must
            // not stay read-visible as non-default.
            self.accumulators.clear();
            return;
        }
        let weight = weight.min(1.0);

        for (param, acc) in self.accumulators.iter() {
            model.blend_parameter_value(*param, acc.value(), weight);
        }
    }

    fn on_stop_all(&mut self) {
        self.accumulators.clear();
    }
}

/// Queue manager over the expression channel.
pub type ExpressionQueueManager<M> = QueueManager<M, ExpressionBlend>;
