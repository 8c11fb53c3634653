//! Database schema definitions for gymplan.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Weekly volume goals, one row per (athlete, year, week, apparatus)
CREATE TABLE IF NOT EXISTS weekly_goals (
    id TEXT PRIMARY KEY,
    athlete_id TEXT NOT NULL,
    year INTEGER NOT NULL,
    week INTEGER NOT NULL,
    apparatus TEXT NOT NULL,
    exercise_volume REAL NOT NULL DEFAULT 0,
    dismount_volume REAL NOT NULL DEFAULT 0,
    base_volume REAL,
    target_penalty REAL NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(athlete_id, year, week, apparatus)
);

CREATE INDEX IF NOT EXISTS idx_weekly_goals_bucket
    ON weekly_goals(athlete_id, year, week);

-- Training sessions, ordered by session_number within a date
CREATE TABLE IF NOT EXISTS training_sessions (
    id TEXT PRIMARY KEY,
    athlete_id TEXT NOT NULL,
    session_date TEXT NOT NULL,
    session_number INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE(athlete_id, session_date, session_number)
);

CREATE INDEX IF NOT EXISTS idx_training_sessions_athlete_date
    ON training_sessions(athlete_id, session_date);

-- Planned routine entries of a training session
CREATE TABLE IF NOT EXISTS daily_routines (
    id TEXT PRIMARY KEY,
    session_id TEXT NOT NULL REFERENCES training_sessions(id),
    apparatus TEXT NOT NULL,
    exercise_type TEXT NOT NULL,
    quantity INTEGER NOT NULL DEFAULT 0,
    target_sets INTEGER NOT NULL DEFAULT 0,
    target_execution TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_daily_routines_session
    ON daily_routines(session_id);

-- Live per-apparatus session logs with persisted aggregates
CREATE TABLE IF NOT EXISTS apparatus_sessions (
    id TEXT PRIMARY KEY,
    training_session_id TEXT NOT NULL REFERENCES training_sessions(id),
    apparatus TEXT NOT NULL,
    base_volume REAL NOT NULL DEFAULT 0,
    total_time_min INTEGER NOT NULL DEFAULT 0,
    intensity_sets_count INTEGER NOT NULL DEFAULT 0,
    total_set_volume REAL NOT NULL DEFAULT 0,
    total_volume REAL NOT NULL DEFAULT 0,
    average_intensity REAL NOT NULL DEFAULT 0,
    max_intensity REAL NOT NULL DEFAULT 0,
    density REAL NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(training_session_id, apparatus)
);

-- Recorded sets of an apparatus session
CREATE TABLE IF NOT EXISTS training_sets (
    id TEXT PRIMARY KEY,
    apparatus_session_id TEXT NOT NULL REFERENCES apparatus_sessions(id),
    set_number INTEGER NOT NULL,
    volume_done REAL NOT NULL DEFAULT 0,
    execution TEXT NOT NULL,
    falls INTEGER NOT NULL DEFAULT 0,
    elements_done INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_training_sets_session
    ON training_sets(apparatus_session_id);
"#;

/// SQL for the schema version tracking table.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version
pub const CURRENT_VERSION: i32 = 1;
