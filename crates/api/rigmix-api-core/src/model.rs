//! Parameter model contract consumed by the motion engines.
//!
//! The real model is the native rig evaluator; engines only need get/set of
//! scalar parameter values plus the weighted-write convention below. A
//! hashbrown-backed `MapModel` is provided for tests and tooling.

use hashbrown::HashMap;

use crate::blend::lerp_f32;
use crate::param::ParamId;

/// Read/write access to named scalar rig parameters.
pub trait ParameterModel {
    /// Current value of a parameter. Unknown parameters read as 0.0.
    fn parameter_value(&self, id: ParamId) -> f32;

    /// Overwrite a parameter outright.
    fn set_parameter_value(&mut self, id: ParamId, value: f32);

    /// Weighted write: `current * (1 - weight) + value * weight`.
    fn blend_parameter_value(&mut self, id: ParamId, value: f32, weight: f32) {
        let current = self.parameter_value(id);
        self.set_parameter_value(id, lerp_f32(current, value, weight));
    }
}

/// Simple in-memory parameter store.
#[derive(Clone, Debug, Default)]
pub struct MapModel {
    values: HashMap<ParamId, f32>,
}

impl MapModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a parameter value, e.g. a rig's default pose.
    pub fn insert(&mut self, id: ParamId, value: f32) {
        self.values.insert(id, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ParameterModel for MapModel {
    fn parameter_value(&self, id: ParamId) -> f32 {
        self.values.get(&id).copied().unwrap_or(0.0)
    }

    fn set_parameter_value(&mut self, id: ParamId, value: f32) {
        self.values.insert(id, value);
    }
}
