//! Planning types: apparatus, exercise and execution enumerations, weekly
//! goals, daily routines and training sessions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The six artistic gymnastics apparatus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Apparatus {
    /// Floor exercise
    FX,
    /// Pommel horse
    PH,
    /// Still rings
    SR,
    /// Vault
    VT,
    /// Parallel bars
    PB,
    /// Horizontal bar
    HB,
}

impl Apparatus {
    /// All apparatus in competition order.
    pub const ALL: [Apparatus; 6] = [
        Apparatus::FX,
        Apparatus::PH,
        Apparatus::SR,
        Apparatus::VT,
        Apparatus::PB,
        Apparatus::HB,
    ];

    /// Two-letter apparatus code.
    pub fn code(self) -> &'static str {
        match self {
            Apparatus::FX => "FX",
            Apparatus::PH => "PH",
            Apparatus::SR => "SR",
            Apparatus::VT => "VT",
            Apparatus::PB => "PB",
            Apparatus::HB => "HB",
        }
    }

    /// Parse a two-letter apparatus code.
    pub fn from_code(code: &str) -> Option<Self> {
        Apparatus::ALL.into_iter().find(|a| a.code() == code)
    }
}

impl std::fmt::Display for Apparatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Category of a trained routine element.
///
/// The first five categories apply to the non-vault apparatus; the remaining
/// ones classify vault attempts and carry no volume multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseType {
    /// Full routine above competition difficulty
    #[serde(rename = "I+")]
    IPlus,
    /// Full routine (integrale)
    I,
    /// Partial routine
    P,
    /// Connection / combination work
    C,
    /// Dismount (uscita)
    U,
    /// Standard vault
    Std,
    /// Group vault drill
    G,
    /// Specific vault preparation
    S,
    /// Board / block drill
    B,
    /// Competition vault
    D,
}

impl ExerciseType {
    /// All exercise types.
    pub const ALL: [ExerciseType; 10] = [
        ExerciseType::IPlus,
        ExerciseType::I,
        ExerciseType::P,
        ExerciseType::C,
        ExerciseType::U,
        ExerciseType::Std,
        ExerciseType::G,
        ExerciseType::S,
        ExerciseType::B,
        ExerciseType::D,
    ];

    /// Volume multiplier applied to the goal's base volume.
    pub fn multiplier(self) -> f64 {
        match self {
            ExerciseType::IPlus => 1.15,
            ExerciseType::I => 1.0,
            ExerciseType::P => 0.5,
            ExerciseType::C => 0.33,
            ExerciseType::U => 1.0,
            ExerciseType::Std
            | ExerciseType::G
            | ExerciseType::S
            | ExerciseType::B
            | ExerciseType::D => 0.0,
        }
    }

    /// Whether this is dismount work, which draws on the dismount volume
    /// of the weekly goal rather than the exercise volume.
    pub fn is_dismount(self) -> bool {
        matches!(self, ExerciseType::U)
    }

    /// Whether this is a vault-specific category (zero volume multiplier).
    pub fn is_vault_type(self) -> bool {
        matches!(
            self,
            ExerciseType::Std
                | ExerciseType::G
                | ExerciseType::S
                | ExerciseType::B
                | ExerciseType::D
        )
    }

    /// Short display code ("I+", "I", ...).
    pub fn code(self) -> &'static str {
        match self {
            ExerciseType::IPlus => "I+",
            ExerciseType::I => "I",
            ExerciseType::P => "P",
            ExerciseType::C => "C",
            ExerciseType::U => "U",
            ExerciseType::Std => "Std",
            ExerciseType::G => "G",
            ExerciseType::S => "S",
            ExerciseType::B => "B",
            ExerciseType::D => "D",
        }
    }

    /// Parse a short display code.
    pub fn from_code(code: &str) -> Option<Self> {
        ExerciseType::ALL.into_iter().find(|t| t.code() == code)
    }
}

impl std::fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Qualitative execution rating, best (A+) to worst (C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "C+")]
    CPlus,
    C,
}

impl ExecutionGrade {
    /// All grades, best to worst.
    pub const ALL: [ExecutionGrade; 6] = [
        ExecutionGrade::APlus,
        ExecutionGrade::A,
        ExecutionGrade::BPlus,
        ExecutionGrade::B,
        ExecutionGrade::CPlus,
        ExecutionGrade::C,
    ];

    /// Numeric deduction associated with the grade.
    pub fn penalty(self) -> f64 {
        match self {
            ExecutionGrade::APlus => 1.4,
            ExecutionGrade::A => 1.6,
            ExecutionGrade::BPlus => 1.8,
            ExecutionGrade::B => 2.0,
            ExecutionGrade::CPlus => 2.2,
            ExecutionGrade::C => 2.5,
        }
    }

    /// Execution coefficient, `(10 - penalty) / 10`.
    pub fn coefficient(self) -> f64 {
        (10.0 - self.penalty()) / 10.0
    }

    /// Short display code ("A+", "A", ...).
    pub fn code(self) -> &'static str {
        match self {
            ExecutionGrade::APlus => "A+",
            ExecutionGrade::A => "A",
            ExecutionGrade::BPlus => "B+",
            ExecutionGrade::B => "B",
            ExecutionGrade::CPlus => "C+",
            ExecutionGrade::C => "C",
        }
    }

    /// Parse a short display code.
    pub fn from_code(code: &str) -> Option<Self> {
        ExecutionGrade::ALL.into_iter().find(|g| g.code() == code)
    }
}

impl std::fmt::Display for ExecutionGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Weekly volume targets set by the coach for one apparatus.
///
/// At most one goal exists per (athlete, year, week, apparatus).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyGoal {
    /// Unique identifier
    pub id: Uuid,
    /// Athlete the goal belongs to
    pub athlete_id: Uuid,
    /// Calendar year of the target week
    pub year: i32,
    /// Week number within the year (Monday-start)
    pub week: u32,
    /// Apparatus the volumes apply to
    pub apparatus: Apparatus,
    /// Target volume for exercise work
    pub exercise_volume: f64,
    /// Target volume for dismount work
    pub dismount_volume: f64,
    /// Base volume used instead of dismount volume on vault
    pub base_volume: Option<f64>,
    /// Target execution penalty for the week
    pub target_penalty: f64,
    /// When the goal was created
    pub created_at: DateTime<Utc>,
    /// When the goal was last updated
    pub updated_at: DateTime<Utc>,
}

impl WeeklyGoal {
    /// Create a goal with zero volumes for the given bucket.
    pub fn new(athlete_id: Uuid, year: i32, week: u32, apparatus: Apparatus) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            athlete_id,
            year,
            week,
            apparatus,
            exercise_volume: 0.0,
            dismount_volume: 0.0,
            base_volume: None,
            target_penalty: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Base volume a routine of `exercise_type` draws on.
    ///
    /// Dismounts use the dismount volume, except on vault where the goal's
    /// base volume takes its place. Everything else uses the exercise volume.
    pub fn base_volume_for(&self, exercise_type: ExerciseType) -> f64 {
        if exercise_type.is_dismount() {
            if self.apparatus == Apparatus::VT {
                self.base_volume.unwrap_or(self.dismount_volume)
            } else {
                self.dismount_volume
            }
        } else {
            self.exercise_volume
        }
    }
}

/// One planned routine entry within a training session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRoutine {
    /// Unique identifier
    pub id: Uuid,
    /// Owning training session
    pub session_id: Uuid,
    /// Apparatus trained
    pub apparatus: Apparatus,
    /// Category of the element
    pub exercise_type: ExerciseType,
    /// Number of repetitions planned
    pub quantity: u32,
    /// Planned number of sets
    pub target_sets: u32,
    /// Execution grade the work is planned at
    pub target_execution: ExecutionGrade,
}

impl DailyRoutine {
    /// Create a routine entry for a session.
    pub fn new(
        session_id: Uuid,
        apparatus: Apparatus,
        exercise_type: ExerciseType,
        quantity: u32,
        target_sets: u32,
        target_execution: ExecutionGrade,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            apparatus,
            exercise_type,
            quantity,
            target_sets,
            target_execution,
        }
    }
}

/// A training session on a given date.
///
/// Sessions are ordered by `session_number` within the date. Volume and
/// intensity are derived at read time, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSession {
    /// Unique identifier
    pub id: Uuid,
    /// Athlete the session belongs to
    pub athlete_id: Uuid,
    /// Calendar date of the session
    pub date: NaiveDate,
    /// Ordering within the date (first, second session of the day)
    pub session_number: u32,
    /// When the session was created
    pub created_at: DateTime<Utc>,
}

impl TrainingSession {
    /// Create a session for an athlete on a date.
    pub fn new(athlete_id: Uuid, date: NaiveDate, session_number: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            athlete_id,
            date,
            session_number,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_multipliers() {
        assert_eq!(ExerciseType::IPlus.multiplier(), 1.15);
        assert_eq!(ExerciseType::I.multiplier(), 1.0);
        assert_eq!(ExerciseType::P.multiplier(), 0.5);
        assert_eq!(ExerciseType::C.multiplier(), 0.33);
        assert_eq!(ExerciseType::U.multiplier(), 1.0);

        for vault_type in [
            ExerciseType::Std,
            ExerciseType::G,
            ExerciseType::S,
            ExerciseType::B,
            ExerciseType::D,
        ] {
            assert_eq!(vault_type.multiplier(), 0.0);
            assert!(vault_type.is_vault_type());
        }
    }

    #[test]
    fn test_execution_penalties() {
        assert_eq!(ExecutionGrade::APlus.penalty(), 1.4);
        assert_eq!(ExecutionGrade::A.penalty(), 1.6);
        assert_eq!(ExecutionGrade::BPlus.penalty(), 1.8);
        assert_eq!(ExecutionGrade::B.penalty(), 2.0);
        assert_eq!(ExecutionGrade::CPlus.penalty(), 2.2);
        assert_eq!(ExecutionGrade::C.penalty(), 2.5);

        // coefficient = (10 - penalty) / 10
        assert!((ExecutionGrade::APlus.coefficient() - 0.86).abs() < 1e-9);
        assert!((ExecutionGrade::A.coefficient() - 0.84).abs() < 1e-9);
        assert!((ExecutionGrade::C.coefficient() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_dismount_base_volume_selection() {
        let mut goal = WeeklyGoal::new(Uuid::new_v4(), 2024, 10, Apparatus::HB);
        goal.exercise_volume = 30.0;
        goal.dismount_volume = 12.0;

        assert_eq!(goal.base_volume_for(ExerciseType::U), 12.0);
        assert_eq!(goal.base_volume_for(ExerciseType::I), 30.0);
        assert_eq!(goal.base_volume_for(ExerciseType::P), 30.0);

        // On vault the base volume replaces the dismount volume
        let mut vault_goal = WeeklyGoal::new(Uuid::new_v4(), 2024, 10, Apparatus::VT);
        vault_goal.exercise_volume = 30.0;
        vault_goal.dismount_volume = 12.0;
        vault_goal.base_volume = Some(18.0);
        assert_eq!(vault_goal.base_volume_for(ExerciseType::U), 18.0);
    }

    #[test]
    fn test_code_round_trips() {
        for apparatus in Apparatus::ALL {
            assert_eq!(Apparatus::from_code(apparatus.code()), Some(apparatus));
        }
        for exercise_type in ExerciseType::ALL {
            assert_eq!(
                ExerciseType::from_code(exercise_type.code()),
                Some(exercise_type)
            );
        }
        for grade in ExecutionGrade::ALL {
            assert_eq!(ExecutionGrade::from_code(grade.code()), Some(grade));
        }
    }

    #[test]
    fn test_serde_uses_display_codes() {
        assert_eq!(
            serde_json::to_string(&ExerciseType::IPlus).unwrap(),
            "\"I+\""
        );
        assert_eq!(
            serde_json::to_string(&ExecutionGrade::BPlus).unwrap(),
            "\"B+\""
        );
        assert_eq!(serde_json::to_string(&Apparatus::FX).unwrap(), "\"FX\"");
    }
}
