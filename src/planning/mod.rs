//! Training planning module.
//!
//! Covers the coach-facing planning data:
//! - Weekly volume goals per apparatus
//! - Training sessions and their daily routines
//! - Derived volume/intensity (the routine volume engine)

pub mod manager;
pub mod types;
pub mod volume;

// Re-exports for convenience
pub use manager::{EnrichedSession, PlanError, PlanningManager, WeeklySummary};
pub use types::{
    Apparatus, DailyRoutine, ExecutionGrade, ExerciseType, TrainingSession, WeeklyGoal,
};
pub use volume::SessionLoad;
