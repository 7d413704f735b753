//! rigmix-motion-core (engine-agnostic)
//!
//! Motion crossfade and multi-channel blending for parameter-based 2D rigs:
//! per frame, decide which queued motions are active, how strongly each one
//! contributes, and how contributions combine into final parameter values.
//! One generic queue engine drives both channels; the exclusive motion
//! channel and the multi-entry expression channel differ only in their
//! `BlendStrategy`. File parsing, rig deformation and rendering live outside
//! this crate behind the `Motion` and `ParameterModel` contracts.

pub mod config;
pub mod easing;
pub mod entry;
pub mod expression;
pub mod ids;
pub mod motion;
pub mod queue;

// Re-exports for consumers (adapters)
pub use config::Config;
pub use easing::{ease_sine, fade_factor};
pub use entry::{transition, EntryEvent, EntryState, QueueEntry, SideEffect};
pub use expression::{
    ExpressionAccumulator, ExpressionBlend, ExpressionData, ExpressionEffect,
    ExpressionQueueManager, ExpressionSource,
};
pub use ids::{EntryHandle, HandleAllocator};
pub use motion::{Motion, MotionBlend, MotionQueueManager, MotionTimings};
pub use queue::{BlendStrategy, FrameContext, QueueManager};
pub use rigmix_api_core::{BlendMode, MapModel, ParamId, ParameterModel};
