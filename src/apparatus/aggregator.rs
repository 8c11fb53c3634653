//! Live aggregates for an apparatus session.
//!
//! Pure arithmetic over the recorded sets plus the manually entered base
//! fields. Empty set lists and zero elapsed time degrade to zero values
//! instead of failing.

use serde::{Deserialize, Serialize};

use super::types::{BaseFields, TrainingSet};

/// Derived statistics of an apparatus session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Number of recorded sets
    pub intensity_sets_count: u32,
    /// Volume over the recorded sets
    pub total_set_volume: f64,
    /// Base volume plus set volume
    pub total_volume: f64,
    /// Mean set intensity, 0 with no sets
    pub average_intensity: f64,
    /// Highest set intensity, 0 with no sets
    pub max_intensity: f64,
    /// Total volume per minute, 0 when no time is recorded
    pub density: f64,
}

/// Compute the session statistics from its base fields and recorded sets.
pub fn compute_stats(base: BaseFields, sets: &[TrainingSet]) -> SessionStats {
    let total_set_volume: f64 = sets.iter().map(|s| s.volume_done).sum();
    let total_volume = base.base_volume + total_set_volume;

    let (average_intensity, max_intensity) = if sets.is_empty() {
        (0.0, 0.0)
    } else {
        let mut sum = 0.0;
        let mut max = 0.0f64;
        for set in sets {
            let intensity = set.intensity();
            sum += intensity;
            max = max.max(intensity);
        }
        (sum / sets.len() as f64, max)
    };

    let density = if base.total_time_min > 0 {
        total_volume / f64::from(base.total_time_min)
    } else {
        0.0
    };

    SessionStats {
        intensity_sets_count: sets.len() as u32,
        total_set_volume,
        total_volume,
        average_intensity,
        max_intensity,
        density,
    }
}
