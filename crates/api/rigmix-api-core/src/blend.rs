//! Blend modes for parameter contributions.
//!
//! Expression file formats tag each effect with a blend string
//! ("Add" / "Multiply" / "Overwrite"); parsing of the surrounding file is
//! external, but the mode vocabulary and its string forms are fixed here so
//! loaders and engines agree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How one contribution combines with the running value of a parameter.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum BlendMode {
    /// Contribution is added to the running value.
    Add,
    /// Contribution scales the running value.
    Multiply,
    /// Contribution replaces the running value.
    Overwrite,
}

impl BlendMode {
    /// Canonical string form, matching the expression file vocabulary.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            BlendMode::Add => "Add",
            BlendMode::Multiply => "Multiply",
            BlendMode::Overwrite => "Overwrite",
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error produced when a blend string is not part of the vocabulary.
#[derive(Debug, Error)]
#[error("unknown blend mode: {0:?}")]
pub struct ParseBlendModeError(String);

impl FromStr for BlendMode {
    type Err = ParseBlendModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "add" => Ok(BlendMode::Add),
            "multiply" => Ok(BlendMode::Multiply),
            "overwrite" => Ok(BlendMode::Overwrite),
            _ => Err(ParseBlendModeError(s.to_string())),
        }
    }
}

/// Linear interpolation for f32.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
