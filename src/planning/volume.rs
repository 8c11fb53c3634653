//! Daily routine volume and intensity calculations.
//!
//! Pure functions over in-memory records: a routine plus the matching weekly
//! goal produce a volume and an intensity, and a session's routines fold into
//! a single summary for planners and dashboards. Routines without a matching
//! weekly goal contribute nothing.

use serde::{Deserialize, Serialize};

use super::types::{Apparatus, DailyRoutine, WeeklyGoal};

/// Derived load of a whole training session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionLoad {
    /// Sum of routine volumes, rounded to the nearest unit
    pub total_volume: f64,
    /// Mean routine intensity, rounded to two decimals, 0 when no routine
    /// has planned sets
    pub average_intensity: f64,
}

/// Volume of a single routine against its weekly goal.
///
/// `base volume x type multiplier x quantity`. Vault-specific types have a
/// zero multiplier and contribute no volume regardless of quantity.
pub fn routine_volume(routine: &DailyRoutine, goal: &WeeklyGoal) -> f64 {
    goal.base_volume_for(routine.exercise_type)
        * routine.exercise_type.multiplier()
        * f64::from(routine.quantity)
}

/// Intensity of a single routine against its weekly goal.
///
/// Volume adjusted by the execution coefficient and spread over the planned
/// sets; 0 when no sets are planned.
pub fn routine_intensity(routine: &DailyRoutine, goal: &WeeklyGoal) -> f64 {
    if routine.target_sets == 0 {
        return 0.0;
    }
    routine_volume(routine, goal) * routine.target_execution.coefficient()
        / f64::from(routine.target_sets)
}

/// Fold a session's routines into its derived load.
///
/// Each routine is matched to the goal for its apparatus; unmatched routines
/// are skipped. The intensity average runs over routines with planned sets,
/// which keeps zero-volume vault work in the average as long as sets were
/// planned for it.
pub fn summarize(routines: &[DailyRoutine], goals: &[WeeklyGoal]) -> SessionLoad {
    let mut total_volume = 0.0;
    let mut intensity_sum = 0.0;
    let mut intensity_count = 0u32;

    for routine in routines {
        let goal = match goal_for(goals, routine.apparatus) {
            Some(goal) => goal,
            None => {
                tracing::debug!(
                    apparatus = routine.apparatus.code(),
                    "no weekly goal for routine, skipping"
                );
                continue;
            }
        };

        total_volume += routine_volume(routine, goal);
        if routine.target_sets > 0 {
            intensity_sum += routine_intensity(routine, goal);
            intensity_count += 1;
        }
    }

    let average_intensity = if intensity_count > 0 {
        round2(intensity_sum / f64::from(intensity_count))
    } else {
        0.0
    };

    SessionLoad {
        total_volume: total_volume.round(),
        average_intensity,
    }
}

/// Find the goal covering an apparatus, if any.
pub fn goal_for(goals: &[WeeklyGoal], apparatus: Apparatus) -> Option<&WeeklyGoal> {
    goals.iter().find(|g| g.apparatus == apparatus)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
