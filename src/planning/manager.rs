//! Planning CRUD and read-time enrichment.
//!
//! Weekly goals are upserted per (athlete, year, week, apparatus); training
//! sessions own their daily routines and are enriched on read with the week
//! number and the derived volume/intensity from the matching goals.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::types::{Apparatus, DailyRoutine, ExecutionGrade, ExerciseType, TrainingSession, WeeklyGoal};
use super::volume::{self, SessionLoad};
use crate::calendar;

/// A training session with its derived read-time fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedSession {
    /// The stored session record
    pub session: TrainingSession,
    /// Week bucket of the session date
    pub week_number: u32,
    /// Routines planned for the session
    pub routines: Vec<DailyRoutine>,
    /// Derived volume and intensity
    pub load: SessionLoad,
}

/// Aggregated view of one (athlete, year, week) bucket for dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub year: i32,
    pub week: u32,
    /// First displayed day of the week
    pub start: NaiveDate,
    /// Last displayed day of the week
    pub end: NaiveDate,
    pub session_count: u32,
    pub routine_count: u32,
    /// Load over all routines of the week against the week's goals
    pub load: SessionLoad,
}

/// Errors from planning operations.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Manager for weekly goals, training sessions and daily routines.
pub struct PlanningManager<'a> {
    conn: &'a Connection,
}

impl<'a> PlanningManager<'a> {
    /// Create a planning manager with a database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // --- Weekly goals ---

    /// Insert or update the goal for its (athlete, year, week, apparatus)
    /// bucket. At most one row per bucket ever exists.
    pub fn upsert_goal(&self, goal: &WeeklyGoal) -> Result<(), PlanError> {
        let weeks = calendar::weeks_in_year(goal.year);
        if goal.week < 1 || goal.week > weeks {
            return Err(PlanError::Validation(format!(
                "week {} out of range for {} (1-{})",
                goal.week, goal.year, weeks
            )));
        }

        self.conn.execute(
            "INSERT INTO weekly_goals
             (id, athlete_id, year, week, apparatus, exercise_volume,
              dismount_volume, base_volume, target_penalty, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(athlete_id, year, week, apparatus) DO UPDATE SET
               exercise_volume = excluded.exercise_volume,
               dismount_volume = excluded.dismount_volume,
               base_volume = excluded.base_volume,
               target_penalty = excluded.target_penalty,
               updated_at = excluded.updated_at",
            params![
                goal.id.to_string(),
                goal.athlete_id.to_string(),
                goal.year,
                goal.week,
                goal.apparatus.code(),
                goal.exercise_volume,
                goal.dismount_volume,
                goal.base_volume,
                goal.target_penalty,
                goal.created_at.to_rfc3339(),
                goal.updated_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!(
            athlete = %goal.athlete_id,
            year = goal.year,
            week = goal.week,
            apparatus = goal.apparatus.code(),
            "weekly goal upserted"
        );
        Ok(())
    }

    /// Get the goal for one apparatus in a week, if set.
    pub fn get_goal(
        &self,
        athlete_id: Uuid,
        year: i32,
        week: u32,
        apparatus: Apparatus,
    ) -> Result<Option<WeeklyGoal>, PlanError> {
        self.conn
            .query_row(
                "SELECT id, athlete_id, year, week, apparatus, exercise_volume,
                        dismount_volume, base_volume, target_penalty, created_at, updated_at
                 FROM weekly_goals
                 WHERE athlete_id = ?1 AND year = ?2 AND week = ?3 AND apparatus = ?4",
                params![athlete_id.to_string(), year, week, apparatus.code()],
                parse_goal_row,
            )
            .optional()
            .map_err(PlanError::from)
    }

    /// Get all goals an athlete has for a week.
    pub fn goals_for_week(
        &self,
        athlete_id: Uuid,
        year: i32,
        week: u32,
    ) -> Result<Vec<WeeklyGoal>, PlanError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, athlete_id, year, week, apparatus, exercise_volume,
                    dismount_volume, base_volume, target_penalty, created_at, updated_at
             FROM weekly_goals
             WHERE athlete_id = ?1 AND year = ?2 AND week = ?3",
        )?;

        let rows = stmt.query_map(params![athlete_id.to_string(), year, week], parse_goal_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(PlanError::from)
    }

    /// Delete the goal for one apparatus in a week.
    pub fn delete_goal(
        &self,
        athlete_id: Uuid,
        year: i32,
        week: u32,
        apparatus: Apparatus,
    ) -> Result<bool, PlanError> {
        let deleted = self.conn.execute(
            "DELETE FROM weekly_goals
             WHERE athlete_id = ?1 AND year = ?2 AND week = ?3 AND apparatus = ?4",
            params![athlete_id.to_string(), year, week, apparatus.code()],
        )?;
        Ok(deleted > 0)
    }

    // --- Training sessions ---

    /// Create a training session.
    pub fn create_session(&self, session: &TrainingSession) -> Result<(), PlanError> {
        self.conn.execute(
            "INSERT INTO training_sessions
             (id, athlete_id, session_date, session_number, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session.id.to_string(),
                session.athlete_id.to_string(),
                session.date.to_string(),
                session.session_number,
                session.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a session by ID.
    pub fn get_session(&self, id: Uuid) -> Result<Option<TrainingSession>, PlanError> {
        self.conn
            .query_row(
                "SELECT id, athlete_id, session_date, session_number, created_at
                 FROM training_sessions WHERE id = ?1",
                params![id.to_string()],
                parse_session_row,
            )
            .optional()
            .map_err(PlanError::from)
    }

    /// Get an athlete's sessions on a date, ordered by session number.
    pub fn sessions_for_date(
        &self,
        athlete_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TrainingSession>, PlanError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, athlete_id, session_date, session_number, created_at
             FROM training_sessions
             WHERE athlete_id = ?1 AND session_date = ?2
             ORDER BY session_number ASC",
        )?;

        let rows = stmt.query_map(
            params![athlete_id.to_string(), date.to_string()],
            parse_session_row,
        )?;

        rows.collect::<Result<Vec<_>, _>>().map_err(PlanError::from)
    }

    /// Get an athlete's sessions in a date range, inclusive.
    pub fn sessions_between(
        &self,
        athlete_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TrainingSession>, PlanError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, athlete_id, session_date, session_number, created_at
             FROM training_sessions
             WHERE athlete_id = ?1 AND session_date >= ?2 AND session_date <= ?3
             ORDER BY session_date ASC, session_number ASC",
        )?;

        let rows = stmt.query_map(
            params![athlete_id.to_string(), start.to_string(), end.to_string()],
            parse_session_row,
        )?;

        rows.collect::<Result<Vec<_>, _>>().map_err(PlanError::from)
    }

    /// Delete a session together with its routines.
    pub fn delete_session(&self, id: Uuid) -> Result<bool, PlanError> {
        self.conn.execute(
            "DELETE FROM daily_routines WHERE session_id = ?1",
            params![id.to_string()],
        )?;
        let deleted = self.conn.execute(
            "DELETE FROM training_sessions WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(deleted > 0)
    }

    // --- Daily routines ---

    /// Add a routine to a session.
    pub fn add_routine(&self, routine: &DailyRoutine) -> Result<(), PlanError> {
        self.conn.execute(
            "INSERT INTO daily_routines
             (id, session_id, apparatus, exercise_type, quantity, target_sets, target_execution)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                routine.id.to_string(),
                routine.session_id.to_string(),
                routine.apparatus.code(),
                routine.exercise_type.code(),
                routine.quantity,
                routine.target_sets,
                routine.target_execution.code(),
            ],
        )?;
        Ok(())
    }

    /// Update a routine.
    pub fn update_routine(&self, routine: &DailyRoutine) -> Result<(), PlanError> {
        self.conn.execute(
            "UPDATE daily_routines SET
             apparatus = ?1, exercise_type = ?2, quantity = ?3,
             target_sets = ?4, target_execution = ?5
             WHERE id = ?6",
            params![
                routine.apparatus.code(),
                routine.exercise_type.code(),
                routine.quantity,
                routine.target_sets,
                routine.target_execution.code(),
                routine.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Delete a routine.
    pub fn delete_routine(&self, id: Uuid) -> Result<bool, PlanError> {
        let deleted = self.conn.execute(
            "DELETE FROM daily_routines WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(deleted > 0)
    }

    /// Get the routines of a session.
    pub fn routines_for_session(&self, session_id: Uuid) -> Result<Vec<DailyRoutine>, PlanError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, apparatus, exercise_type, quantity, target_sets, target_execution
             FROM daily_routines
             WHERE session_id = ?1",
        )?;

        let rows = stmt.query_map(params![session_id.to_string()], parse_routine_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(PlanError::from)
    }

    // --- Derived views ---

    /// Load a session with its week number, routines and derived load.
    ///
    /// The week bucket follows the calendar ownership rule, so a late
    /// December session can draw on week 1 goals of the next year.
    pub fn enriched_session(&self, id: Uuid) -> Result<Option<EnrichedSession>, PlanError> {
        let session = match self.get_session(id)? {
            Some(session) => session,
            None => return Ok(None),
        };

        let (year, week) = calendar::year_week(session.date);
        let goals = self.goals_for_week(session.athlete_id, year, week)?;
        let routines = self.routines_for_session(session.id)?;
        let load = volume::summarize(&routines, &goals);

        Ok(Some(EnrichedSession {
            session,
            week_number: week,
            routines,
            load,
        }))
    }

    /// Aggregate an athlete's week for the dashboard.
    pub fn weekly_summary(
        &self,
        athlete_id: Uuid,
        year: i32,
        week: u32,
    ) -> Result<WeeklySummary, PlanError> {
        let (start, end) = calendar::week_date_range(year, week);
        let sessions = self.sessions_between(athlete_id, start, end)?;
        let goals = self.goals_for_week(athlete_id, year, week)?;

        let mut routines = Vec::new();
        for session in &sessions {
            routines.extend(self.routines_for_session(session.id)?);
        }
        let load = volume::summarize(&routines, &goals);

        Ok(WeeklySummary {
            year,
            week,
            start,
            end,
            session_count: sessions.len() as u32,
            routine_count: routines.len() as u32,
            load,
        })
    }
}

fn parse_goal_row(row: &rusqlite::Row) -> rusqlite::Result<WeeklyGoal> {
    let id_str: String = row.get(0)?;
    let athlete_id_str: String = row.get(1)?;
    let apparatus_str: String = row.get(4)?;
    let created_at_str: String = row.get(9)?;
    let updated_at_str: String = row.get(10)?;

    Ok(WeeklyGoal {
        id: Uuid::parse_str(&id_str).unwrap_or_default(),
        athlete_id: Uuid::parse_str(&athlete_id_str).unwrap_or_default(),
        year: row.get(2)?,
        week: row.get(3)?,
        apparatus: Apparatus::from_code(&apparatus_str).unwrap_or(Apparatus::FX),
        exercise_volume: row.get(5)?,
        dismount_volume: row.get(6)?,
        base_volume: row.get(7)?,
        target_penalty: row.get(8)?,
        created_at: parse_timestamp(&created_at_str),
        updated_at: parse_timestamp(&updated_at_str),
    })
}

fn parse_session_row(row: &rusqlite::Row) -> rusqlite::Result<TrainingSession> {
    let id_str: String = row.get(0)?;
    let athlete_id_str: String = row.get(1)?;
    let date_str: String = row.get(2)?;
    let created_at_str: String = row.get(4)?;

    Ok(TrainingSession {
        id: Uuid::parse_str(&id_str).unwrap_or_default(),
        athlete_id: Uuid::parse_str(&athlete_id_str).unwrap_or_default(),
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or_default(),
        session_number: row.get(3)?,
        created_at: parse_timestamp(&created_at_str),
    })
}

fn parse_routine_row(row: &rusqlite::Row) -> rusqlite::Result<DailyRoutine> {
    let id_str: String = row.get(0)?;
    let session_id_str: String = row.get(1)?;
    let apparatus_str: String = row.get(2)?;
    let type_str: String = row.get(3)?;
    let execution_str: String = row.get(6)?;

    Ok(DailyRoutine {
        id: Uuid::parse_str(&id_str).unwrap_or_default(),
        session_id: Uuid::parse_str(&session_id_str).unwrap_or_default(),
        apparatus: Apparatus::from_code(&apparatus_str).unwrap_or(Apparatus::FX),
        exercise_type: ExerciseType::from_code(&type_str).unwrap_or(ExerciseType::I),
        quantity: row.get(4)?,
        target_sets: row.get(5)?,
        target_execution: ExecutionGrade::from_code(&execution_str).unwrap_or(ExecutionGrade::B),
    })
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    fn fx_goal(athlete_id: Uuid, year: i32, week: u32, exercise_volume: f64) -> WeeklyGoal {
        let mut goal = WeeklyGoal::new(athlete_id, year, week, Apparatus::FX);
        goal.exercise_volume = exercise_volume;
        goal.dismount_volume = exercise_volume / 2.0;
        goal
    }

    #[test]
    fn test_goal_upsert_keeps_one_row_per_bucket() {
        let db = Database::open_in_memory().unwrap();
        let manager = PlanningManager::new(db.connection());
        let athlete = Uuid::new_v4();

        manager.upsert_goal(&fx_goal(athlete, 2024, 10, 20.0)).unwrap();
        manager.upsert_goal(&fx_goal(athlete, 2024, 10, 25.0)).unwrap();

        let goals = manager.goals_for_week(athlete, 2024, 10).unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].exercise_volume, 25.0);
    }

    #[test]
    fn test_goal_week_validation() {
        let db = Database::open_in_memory().unwrap();
        let manager = PlanningManager::new(db.connection());

        let goal = fx_goal(Uuid::new_v4(), 2024, 60, 20.0);
        assert!(matches!(
            manager.upsert_goal(&goal),
            Err(PlanError::Validation(_))
        ));
    }

    #[test]
    fn test_goal_delete() {
        let db = Database::open_in_memory().unwrap();
        let manager = PlanningManager::new(db.connection());
        let athlete = Uuid::new_v4();

        manager.upsert_goal(&fx_goal(athlete, 2024, 10, 20.0)).unwrap();
        assert!(manager.delete_goal(athlete, 2024, 10, Apparatus::FX).unwrap());
        assert!(!manager.delete_goal(athlete, 2024, 10, Apparatus::FX).unwrap());
        assert!(manager.get_goal(athlete, 2024, 10, Apparatus::FX).unwrap().is_none());
    }

    #[test]
    fn test_session_ordering_within_date() {
        let db = Database::open_in_memory().unwrap();
        let manager = PlanningManager::new(db.connection());
        let athlete = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        let second = TrainingSession::new(athlete, date, 2);
        let first = TrainingSession::new(athlete, date, 1);
        manager.create_session(&second).unwrap();
        manager.create_session(&first).unwrap();

        let sessions = manager.sessions_for_date(athlete, date).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].session_number, 1);
        assert_eq!(sessions[1].session_number, 2);
    }

    #[test]
    fn test_delete_session_removes_routines() {
        let db = Database::open_in_memory().unwrap();
        let manager = PlanningManager::new(db.connection());
        let athlete = Uuid::new_v4();

        let session =
            TrainingSession::new(athlete, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), 1);
        manager.create_session(&session).unwrap();
        let routine = DailyRoutine::new(
            session.id,
            Apparatus::FX,
            ExerciseType::I,
            1,
            2,
            ExecutionGrade::A,
        );
        manager.add_routine(&routine).unwrap();

        assert!(manager.delete_session(session.id).unwrap());
        assert!(manager.routines_for_session(session.id).unwrap().is_empty());
        assert!(manager.get_session(session.id).unwrap().is_none());
    }

    #[test]
    fn test_enriched_session() {
        let db = Database::open_in_memory().unwrap();
        let manager = PlanningManager::new(db.connection());
        let athlete = Uuid::new_v4();

        // 2024-03-05 is a Tuesday in week 10
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let session = TrainingSession::new(athlete, date, 1);
        manager.create_session(&session).unwrap();

        manager.upsert_goal(&fx_goal(athlete, 2024, 10, 20.0)).unwrap();
        manager
            .add_routine(&DailyRoutine::new(
                session.id,
                Apparatus::FX,
                ExerciseType::IPlus,
                2,
                4,
                ExecutionGrade::APlus,
            ))
            .unwrap();

        let enriched = manager.enriched_session(session.id).unwrap().unwrap();
        assert_eq!(enriched.week_number, 10);
        assert_eq!(enriched.load.total_volume, 46.0);
        assert_eq!(enriched.load.average_intensity, 9.89);
    }

    #[test]
    fn test_enriched_session_december_rolls_into_next_year() {
        let db = Database::open_in_memory().unwrap();
        let manager = PlanningManager::new(db.connection());
        let athlete = Uuid::new_v4();

        // Dec 30 2024 belongs to week 1 of 2025
        let date = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        let session = TrainingSession::new(athlete, date, 1);
        manager.create_session(&session).unwrap();

        manager.upsert_goal(&fx_goal(athlete, 2025, 1, 10.0)).unwrap();
        manager
            .add_routine(&DailyRoutine::new(
                session.id,
                Apparatus::FX,
                ExerciseType::I,
                1,
                1,
                ExecutionGrade::A,
            ))
            .unwrap();

        let enriched = manager.enriched_session(session.id).unwrap().unwrap();
        assert_eq!(enriched.week_number, 1);
        assert_eq!(enriched.load.total_volume, 10.0);
    }

    #[test]
    fn test_weekly_summary_buckets_by_date_range() {
        let db = Database::open_in_memory().unwrap();
        let manager = PlanningManager::new(db.connection());
        let athlete = Uuid::new_v4();

        manager.upsert_goal(&fx_goal(athlete, 2024, 10, 20.0)).unwrap();

        // Week 10 of 2024 spans Mar 4 - Mar 10
        let in_week = TrainingSession::new(athlete, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), 1);
        let out_of_week =
            TrainingSession::new(athlete, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(), 1);
        manager.create_session(&in_week).unwrap();
        manager.create_session(&out_of_week).unwrap();

        for session in [&in_week, &out_of_week] {
            manager
                .add_routine(&DailyRoutine::new(
                    session.id,
                    Apparatus::FX,
                    ExerciseType::I,
                    1,
                    2,
                    ExecutionGrade::A,
                ))
                .unwrap();
        }

        let summary = manager.weekly_summary(athlete, 2024, 10).unwrap();
        assert_eq!(summary.start, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(summary.end, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(summary.session_count, 1);
        assert_eq!(summary.routine_count, 1);
        assert_eq!(summary.load.total_volume, 20.0);
    }
}
