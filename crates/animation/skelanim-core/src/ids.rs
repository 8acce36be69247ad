//! Identifiers for blend-stack layers.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct LayerId(pub u32);

/// Monotonic allocator for LayerId. IDs are never reused within one stack.
#[derive(Default, Debug, Clone)]
pub struct LayerIdAllocator {
    next: u32,
}

impl LayerIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> LayerId {
        let id = LayerId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
