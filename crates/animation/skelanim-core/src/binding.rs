//! Bone-name binding cache.
//!
//! Clip tracks name their bones; poses address bones by index. The cache maps
//! each name to the pose index once (including misses), so a bone that the pose
//! does not have is reported a single time and skipped silently afterwards.

use hashbrown::HashMap;
use tracing::warn;

use crate::pose::Pose;

/// Resolved pose index for a bone name, `None` for a cached miss.
pub type BoneSlot = Option<usize>;

#[derive(Debug, Default, Clone)]
pub struct BoneBindings {
    slots: HashMap<String, BoneSlot>,
}

impl BoneBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `name` against `pose`, consulting the cache first.
    pub fn resolve<P: Pose + ?Sized>(&mut self, pose: &P, name: &str) -> BoneSlot {
        if let Some(slot) = self.slots.get(name) {
            return *slot;
        }
        let slot = pose.bone_index(name);
        if slot.is_none() {
            warn!(bone = name, "bone not present in pose; its tracks will be skipped");
        }
        self.slots.insert(name.to_owned(), slot);
        slot
    }

    /// Forget every resolution (for example after switching poses).
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of cached misses.
    pub fn misses(&self) -> usize {
        self.slots.values().filter(|s| s.is_none()).count()
    }
}
