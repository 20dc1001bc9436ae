//! Generation tokens for superseding in-flight work.
//!
//! Every regeneration (settings change, new source image) calls
//! [`GenerationTracker::begin`] and carries the returned [`Generation`]
//! through its work. When the result is ready, [`GenerationTracker::commit`]
//! hands it back only if no newer generation has started since.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CardPrepError;

/// Monotonically increasing token identifying one regeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    /// Rebuild a token that crossed a serialization boundary.
    pub const fn from_value(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Hands out generations and decides which results are still wanted.
#[derive(Debug, Default)]
pub struct GenerationTracker {
    latest: AtomicU64,
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding all earlier ones.
    pub fn begin(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// The most recently started generation.
    pub fn latest(&self) -> Generation {
        Generation(self.latest.load(Ordering::Acquire))
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest() == generation
    }

    /// Accept a finished result if its generation is still the latest.
    ///
    /// # Errors
    ///
    /// [`CardPrepError::StaleGeneration`] if a newer generation has begun. The
    /// result is dropped.
    pub fn commit<T>(&self, generation: Generation, result: T) -> Result<T, CardPrepError> {
        let latest = self.latest();
        if latest != generation {
            warn!(
                generation = generation.0,
                latest = latest.0,
                "discarding result of superseded generation"
            );
            return Err(CardPrepError::StaleGeneration {
                generation: generation.0,
                latest: latest.0,
            });
        }
        Ok(result)
    }
}
