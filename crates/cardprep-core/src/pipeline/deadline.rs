//! Per-operation time budgets.
//!
//! The clock is `web_time::Instant`: `std::time::Instant` on native targets,
//! `performance.now()` in the browser.

use std::time::Duration;

use web_time::Instant;

use crate::error::CardPrepError;

/// Budget for decoding one source image.
pub const DECODE_BUDGET: Duration = Duration::from_secs(10);

/// Budget for rendering one card (geometry, color, composite, encode).
pub const CARD_BUDGET: Duration = Duration::from_secs(15);

/// A point in time after which an operation is abandoned.
///
/// Checked at stage boundaries only; a stage that is already running is
/// never interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_at: Option<Instant>,
    budget: Duration,
}

impl Deadline {
    /// A deadline that never expires.
    pub const fn none() -> Self {
        Self {
            expires_at: None,
            budget: Duration::MAX,
        }
    }

    /// A deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            expires_at: Instant::now().checked_add(budget),
            budget,
        }
    }

    /// [`DECODE_BUDGET`] from now.
    pub fn for_decode() -> Self {
        Self::after(DECODE_BUDGET)
    }

    /// [`CARD_BUDGET`] from now.
    pub fn for_card() -> Self {
        Self::after(CARD_BUDGET)
    }

    /// Like [`Deadline::after`], or [`Deadline::none`] when no budget is given.
    pub fn from_budget(budget: Option<Duration>) -> Self {
        budget.map_or_else(Self::none, Self::after)
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// False for [`Deadline::none`].
    pub fn is_bounded(&self) -> bool {
        self.expires_at.is_some()
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| Instant::now() >= expires_at)
    }

    /// Fail with [`CardPrepError::ProcessingTimeout`] if the deadline passed.
    pub fn check(&self, stage: &str) -> Result<(), CardPrepError> {
        if self.is_expired() {
            return Err(CardPrepError::ProcessingTimeout {
                stage: stage.to_string(),
                budget_ms: self.budget.as_millis(),
            });
        }
        Ok(())
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}
