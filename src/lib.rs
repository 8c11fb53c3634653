//! GymPlan - Gymnastics Training Planner
//!
//! A self-hosted planning and logging core for artistic gymnastics training.
//! Coaches set weekly volume goals per apparatus, plan daily routines whose
//! volume and intensity derive from those goals, and athletes log live
//! apparatus sessions set by set with volume, intensity and density tracking.

pub mod apparatus;
pub mod calendar;
pub mod planning;
pub mod storage;

// Re-export commonly used types
pub use apparatus::{ApparatusLog, ApparatusSession, Draft, SessionStats, TrainingSet};
pub use planning::{
    Apparatus, DailyRoutine, ExecutionGrade, ExerciseType, PlanningManager, TrainingSession,
    WeeklyGoal,
};
pub use storage::Database;
