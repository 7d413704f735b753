//! Core configuration for rigmix-motion-core.

use serde::{Deserialize, Serialize};

/// Capacity hints for manager-owned storage.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Initial capacity of a manager's entry queue.
    pub queue_capacity: usize,
    /// Initial capacity of the expression accumulator map.
    pub accumulator_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            queue_capacity: 8,
            accumulator_capacity: 64,
        }
    }
}
