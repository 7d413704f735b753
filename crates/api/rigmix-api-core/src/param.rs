//! Identifiers for rig parameters.

use serde::{Deserialize, Serialize};

/// Opaque handle to a named rig parameter.
///
/// The registry that maps parameter names ("ParamEyeLOpen", "ParamMouthForm",
/// ...) to dense indices lives outside this crate; engines only pass handles
/// through. Dense indices improve cache locality; IDs are opaque externally.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ParamId(pub u32);

impl From<u32> for ParamId {
    #[inline]
    fn from(raw: u32) -> Self {
        ParamId(raw)
    }
}
