//! Live apparatus session logging.
//!
//! Within a training day the athlete initializes one session per apparatus,
//! records sets ("salite") as they happen, and edits the base volume/time
//! through a draft that commits on save. Aggregates (volume, intensity,
//! density) are recomputed on every mutation.

pub mod aggregator;
pub mod draft;
pub mod manager;
pub mod types;

// Re-exports for convenience
pub use aggregator::{compute_stats, SessionStats};
pub use draft::Draft;
pub use manager::{ApparatusError, ApparatusLog};
pub use types::{ApparatusSession, BaseFields, TrainingSet};
