//! Apparatus session and training set records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregator::SessionStats;
use crate::planning::types::{Apparatus, ExecutionGrade};

/// Manually entered base fields of an apparatus session.
///
/// These are the two values edited through the edit-mode toggle: the volume
/// done outside recorded sets (basic skills work) and the elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BaseFields {
    /// Volume accumulated outside recorded sets
    pub base_volume: f64,
    /// Elapsed session time in minutes
    pub total_time_min: u32,
}

/// Live per-apparatus log within a training session.
///
/// One row per (training session, apparatus). The aggregates are recomputed
/// from the recorded sets on every mutation and persisted with the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApparatusSession {
    /// Unique identifier
    pub id: Uuid,
    /// Owning training session
    pub training_session_id: Uuid,
    /// Apparatus being trained
    pub apparatus: Apparatus,
    /// Manually entered base fields
    pub base: BaseFields,
    /// Derived aggregates over the recorded sets
    pub stats: SessionStats,
    /// When the session was initialized
    pub created_at: DateTime<Utc>,
    /// When the session was last modified
    pub updated_at: DateTime<Utc>,
}

impl ApparatusSession {
    /// Initialize an apparatus session with its base fields.
    pub fn new(training_session_id: Uuid, apparatus: Apparatus, base: BaseFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            training_session_id,
            apparatus,
            base,
            stats: SessionStats::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// One recorded set ("salita") within an apparatus session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSet {
    /// Unique identifier
    pub id: Uuid,
    /// Owning apparatus session
    pub apparatus_session_id: Uuid,
    /// 1-based position, contiguous by convention but not enforced
    pub set_number: u32,
    /// Volume done in the set
    pub volume_done: f64,
    /// Execution grade of the set
    pub execution: ExecutionGrade,
    /// Falls during the set
    pub falls: u32,
    /// Elements completed in the set
    pub elements_done: u32,
    /// When the set was recorded
    pub created_at: DateTime<Utc>,
}

impl TrainingSet {
    /// Record a set for an apparatus session.
    pub fn new(
        apparatus_session_id: Uuid,
        set_number: u32,
        volume_done: f64,
        execution: ExecutionGrade,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            apparatus_session_id,
            set_number,
            volume_done,
            execution,
            falls: 0,
            elements_done: 0,
            created_at: Utc::now(),
        }
    }

    /// Live intensity of the set: volume done adjusted by execution quality.
    ///
    /// Unlike planned routines this is a per-set value, not spread over a
    /// planned set count.
    pub fn intensity(&self) -> f64 {
        self.volume_done * self.execution.coefficient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_intensity() {
        // Grade C: coefficient (10 - 2.5) / 10 = 0.75; 8 x 0.75 = 6.0
        let set = TrainingSet::new(Uuid::new_v4(), 1, 8.0, ExecutionGrade::C);
        assert!((set.intensity() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_intensity_ignores_set_count() {
        let set = TrainingSet::new(Uuid::new_v4(), 7, 10.0, ExecutionGrade::A);
        assert!((set.intensity() - 8.4).abs() < 1e-9);
    }
}
