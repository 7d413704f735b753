//! Identifiers and a simple allocator for queue entries.

use serde::{Deserialize, Serialize};

/// Handle returned by `start_motion`; identifies one playback instance for
/// its manager's lifetime.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct EntryHandle(pub u32);

/// Monotonic allocator for EntryHandle.
#[derive(Default, Debug)]
pub struct HandleAllocator {
    next: u32,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> EntryHandle {
        let id = EntryHandle(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
