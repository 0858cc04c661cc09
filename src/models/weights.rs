use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Prioritized, Priority};

/// Weight given to a priority value outside the known levels
pub const FALLBACK_WEIGHT: u32 = 1;

/// Largest accepted weight; the expanded draw pool holds `weight` slots per candidate
pub const MAX_WEIGHT: u32 = 1_000;

/// Error types for weight table construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeightError {
    #[error("Weight for {0} must be positive")]
    NotPositive(&'static str),
    #[error("Weight for {0} must not exceed {max}", max = MAX_WEIGHT)]
    TooLarge(&'static str),
}

/// Mapping from priority level to draw weight
///
/// A candidate's chance of being picked is its weight divided by the sum of
/// the weights of every candidate in the draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightTable {
    low: u32,
    medium: u32,
    high: u32,
    urgent: u32,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            low: 1,
            medium: 2,
            high: 5,
            urgent: 10,
        }
    }
}

impl WeightTable {
    /// Creates a weight table, rejecting weights outside `1..=MAX_WEIGHT`
    pub fn new(low: u32, medium: u32, high: u32, urgent: u32) -> Result<Self, WeightError> {
        let levels = [
            ("LOW", low),
            ("MEDIUM", medium),
            ("HIGH", high),
            ("URGENT", urgent),
        ];
        for (name, weight) in levels {
            if weight == 0 {
                return Err(WeightError::NotPositive(name));
            }
            if weight > MAX_WEIGHT {
                return Err(WeightError::TooLarge(name));
            }
        }

        Ok(Self {
            low,
            medium,
            high,
            urgent,
        })
    }

    /// Returns the weight for a priority
    ///
    /// Unrecognized priorities get [`FALLBACK_WEIGHT`] and a warning, so a
    /// typo'd value is visible in the logs without changing the draw.
    pub fn weight_of(&self, priority: &Priority) -> u32 {
        match priority {
            Priority::Low => self.low,
            Priority::Medium => self.medium,
            Priority::High => self.high,
            Priority::Urgent => self.urgent,
            Priority::Unknown(raw) => {
                tracing::warn!(
                    priority = %raw,
                    weight = FALLBACK_WEIGHT,
                    "Unrecognized priority, using fallback weight"
                );
                FALLBACK_WEIGHT
            }
        }
    }

    /// Weight of each candidate, in input order
    ///
    /// Looks every candidate up exactly once, so an unknown priority is
    /// reported once per candidate.
    pub fn weights_of<T: Prioritized>(&self, candidates: &[T]) -> Vec<u32> {
        candidates
            .iter()
            .map(|c| self.weight_of(c.priority()))
            .collect()
    }
}
