//! Per-stack scratch buffers.
//!
//! Reused across `apply` calls so sampling a layer does not allocate once the
//! buffers have grown to the largest clip. A stack and its scratch belong to
//! one owner at a time.

use crate::config::Config;
use crate::sampling::BoneSample;

#[derive(Debug, Default)]
pub struct Scratch {
    /// Samples for the layer currently being applied, in track order.
    pub samples: Vec<BoneSample>,
}

impl Scratch {
    pub fn new(cfg: &Config) -> Self {
        Self {
            samples: Vec::with_capacity(cfg.scratch_bones),
        }
    }

    #[inline]
    pub fn begin_layer(&mut self) {
        self.samples.clear();
    }
}
