//! rigmix-api-core: parameter & blend contracts shared by rig engines (core, engine-agnostic)

pub mod blend;
pub mod model;
pub mod param;

pub use blend::{lerp_f32, BlendMode, ParseBlendModeError};
pub use model::{MapModel, ParameterModel};
pub use param::ParamId;
