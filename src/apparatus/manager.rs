//! Apparatus session log: initialization, set recording, recompute-on-write.
//!
//! Every mutation (base-field edit, set added or removed) recomputes the
//! session aggregates from the just-updated set list and persists them with
//! the row, so readers always see statistics consistent with the sets.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use uuid::Uuid;

use super::aggregator::{compute_stats, SessionStats};
use super::types::{ApparatusSession, BaseFields, TrainingSet};
use crate::planning::types::{Apparatus, ExecutionGrade};

/// Errors from apparatus session operations.
#[derive(Debug, Error)]
pub enum ApparatusError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Apparatus session already initialized for {apparatus}")]
    AlreadyInitialized { apparatus: Apparatus },

    #[error("Apparatus session not found: {0}")]
    NotFound(Uuid),
}

/// Manager for apparatus sessions and their recorded sets.
pub struct ApparatusLog<'a> {
    conn: &'a Connection,
}

impl<'a> ApparatusLog<'a> {
    /// Create an apparatus log with a database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Initialize an apparatus session.
    ///
    /// At most one session exists per (training session, apparatus);
    /// initializing the same pair twice is an error.
    pub fn initialize(&self, session: &ApparatusSession) -> Result<(), ApparatusError> {
        let result = self.conn.execute(
            "INSERT INTO apparatus_sessions
             (id, training_session_id, apparatus, base_volume, total_time_min,
              intensity_sets_count, total_set_volume, total_volume,
              average_intensity, max_intensity, density, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                session.id.to_string(),
                session.training_session_id.to_string(),
                session.apparatus.code(),
                session.base.base_volume,
                session.base.total_time_min,
                session.stats.intensity_sets_count,
                session.stats.total_set_volume,
                session.stats.total_volume,
                session.stats.average_intensity,
                session.stats.max_intensity,
                session.stats.density,
                session.created_at.to_rfc3339(),
                session.updated_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => {
                tracing::debug!(
                    apparatus = session.apparatus.code(),
                    session = %session.training_session_id,
                    "apparatus session initialized"
                );
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(ApparatusError::AlreadyInitialized {
                    apparatus: session.apparatus,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get the session for one apparatus within a training session.
    pub fn get(
        &self,
        training_session_id: Uuid,
        apparatus: Apparatus,
    ) -> Result<Option<ApparatusSession>, ApparatusError> {
        self.conn
            .query_row(
                "SELECT id, training_session_id, apparatus, base_volume, total_time_min,
                        intensity_sets_count, total_set_volume, total_volume,
                        average_intensity, max_intensity, density, created_at, updated_at
                 FROM apparatus_sessions
                 WHERE training_session_id = ?1 AND apparatus = ?2",
                params![training_session_id.to_string(), apparatus.code()],
                parse_session_row,
            )
            .optional()
            .map_err(ApparatusError::from)
    }

    /// Get an apparatus session by ID.
    pub fn get_by_id(&self, id: Uuid) -> Result<Option<ApparatusSession>, ApparatusError> {
        self.conn
            .query_row(
                "SELECT id, training_session_id, apparatus, base_volume, total_time_min,
                        intensity_sets_count, total_set_volume, total_volume,
                        average_intensity, max_intensity, density, created_at, updated_at
                 FROM apparatus_sessions WHERE id = ?1",
                params![id.to_string()],
                parse_session_row,
            )
            .optional()
            .map_err(ApparatusError::from)
    }

    /// Update the manually entered base fields and recompute the aggregates.
    pub fn update_base_fields(
        &self,
        id: Uuid,
        base: BaseFields,
    ) -> Result<SessionStats, ApparatusError> {
        let updated = self.conn.execute(
            "UPDATE apparatus_sessions
             SET base_volume = ?1, total_time_min = ?2, updated_at = ?3
             WHERE id = ?4",
            params![
                base.base_volume,
                base.total_time_min,
                Utc::now().to_rfc3339(),
                id.to_string(),
            ],
        )?;
        if updated == 0 {
            return Err(ApparatusError::NotFound(id));
        }

        self.recompute(id)
    }

    /// Record a set and recompute the parent session's aggregates.
    pub fn add_set(&self, set: &TrainingSet) -> Result<SessionStats, ApparatusError> {
        self.conn.execute(
            "INSERT INTO training_sets
             (id, apparatus_session_id, set_number, volume_done, execution,
              falls, elements_done, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                set.id.to_string(),
                set.apparatus_session_id.to_string(),
                set.set_number,
                set.volume_done,
                set.execution.code(),
                set.falls,
                set.elements_done,
                set.created_at.to_rfc3339(),
            ],
        )?;

        self.recompute(set.apparatus_session_id)
    }

    /// Delete a set and recompute the parent session's aggregates.
    ///
    /// Returns the recomputed stats, or `None` if no such set existed.
    /// Remaining sets keep their numbers; contiguity is by convention only.
    pub fn delete_set(&self, set_id: Uuid) -> Result<Option<SessionStats>, ApparatusError> {
        let parent: Option<String> = self
            .conn
            .query_row(
                "SELECT apparatus_session_id FROM training_sets WHERE id = ?1",
                params![set_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        let parent_id = match parent {
            Some(parent) => Uuid::parse_str(&parent).unwrap_or_default(),
            None => return Ok(None),
        };

        self.conn.execute(
            "DELETE FROM training_sets WHERE id = ?1",
            params![set_id.to_string()],
        )?;

        self.recompute(parent_id).map(Some)
    }

    /// Get the recorded sets of a session, ordered by set number.
    pub fn sets(&self, apparatus_session_id: Uuid) -> Result<Vec<TrainingSet>, ApparatusError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, apparatus_session_id, set_number, volume_done, execution,
                    falls, elements_done, created_at
             FROM training_sets
             WHERE apparatus_session_id = ?1
             ORDER BY set_number ASC",
        )?;

        let rows = stmt.query_map(params![apparatus_session_id.to_string()], parse_set_row)?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(ApparatusError::from)
    }

    /// Next set number by the contiguous convention: recorded count + 1.
    pub fn next_set_number(&self, apparatus_session_id: Uuid) -> Result<u32, ApparatusError> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM training_sets WHERE apparatus_session_id = ?1",
            params![apparatus_session_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count + 1)
    }

    /// Recompute the aggregates from the stored base fields and sets,
    /// persist them, and return them.
    fn recompute(&self, apparatus_session_id: Uuid) -> Result<SessionStats, ApparatusError> {
        let session = self
            .get_by_id(apparatus_session_id)?
            .ok_or(ApparatusError::NotFound(apparatus_session_id))?;
        let sets = self.sets(apparatus_session_id)?;
        let stats = compute_stats(session.base, &sets);

        self.conn.execute(
            "UPDATE apparatus_sessions SET
             intensity_sets_count = ?1, total_set_volume = ?2, total_volume = ?3,
             average_intensity = ?4, max_intensity = ?5, density = ?6, updated_at = ?7
             WHERE id = ?8",
            params![
                stats.intensity_sets_count,
                stats.total_set_volume,
                stats.total_volume,
                stats.average_intensity,
                stats.max_intensity,
                stats.density,
                Utc::now().to_rfc3339(),
                apparatus_session_id.to_string(),
            ],
        )?;

        Ok(stats)
    }
}

fn parse_session_row(row: &rusqlite::Row) -> rusqlite::Result<ApparatusSession> {
    let id_str: String = row.get(0)?;
    let training_session_id_str: String = row.get(1)?;
    let apparatus_str: String = row.get(2)?;
    let created_at_str: String = row.get(11)?;
    let updated_at_str: String = row.get(12)?;

    Ok(ApparatusSession {
        id: Uuid::parse_str(&id_str).unwrap_or_default(),
        training_session_id: Uuid::parse_str(&training_session_id_str).unwrap_or_default(),
        apparatus: Apparatus::from_code(&apparatus_str).unwrap_or(Apparatus::FX),
        base: BaseFields {
            base_volume: row.get(3)?,
            total_time_min: row.get(4)?,
        },
        stats: SessionStats {
            intensity_sets_count: row.get(5)?,
            total_set_volume: row.get(6)?,
            total_volume: row.get(7)?,
            average_intensity: row.get(8)?,
            max_intensity: row.get(9)?,
            density: row.get(10)?,
        },
        created_at: parse_timestamp(&created_at_str),
        updated_at: parse_timestamp(&updated_at_str),
    })
}

fn parse_set_row(row: &rusqlite::Row) -> rusqlite::Result<TrainingSet> {
    let id_str: String = row.get(0)?;
    let apparatus_session_id_str: String = row.get(1)?;
    let execution_str: String = row.get(4)?;
    let created_at_str: String = row.get(7)?;

    Ok(TrainingSet {
        id: Uuid::parse_str(&id_str).unwrap_or_default(),
        apparatus_session_id: Uuid::parse_str(&apparatus_session_id_str).unwrap_or_default(),
        set_number: row.get(2)?,
        volume_done: row.get(3)?,
        execution: ExecutionGrade::from_code(&execution_str).unwrap_or(ExecutionGrade::B),
        falls: row.get(5)?,
        elements_done: row.get(6)?,
        created_at: parse_timestamp(&created_at_str),
    })
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
