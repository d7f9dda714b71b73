//! The persistence seam.
//!
//! RULE: The engine never talks to storage directly: every read and
//! write goes through [`PostcardRepository`]. Production wires in the
//! SQLite-backed [`crate::store::PostcardStore`]; tests inject
//! in-memory fakes to exercise the failure paths.

use crate::{error::SimResult, types::PostcardId};
use serde::{Deserialize, Serialize};

/// One stored postcard row, as the repository returns it.
///
/// Coordinates stay in their stored string form here: parsing them is
/// the cycle's job, so one corrupt row can be skipped with a warning
/// instead of aborting the batch.
#[derive(Debug, Clone)]
pub struct PostcardRecord {
    pub postcard_id: PostcardId,
    pub current_lat: Option<String>,
    pub current_lon: Option<String>,
}

/// One entry in a postcard's travel history. Append-only and
/// time-ascending; written by the collection/teleport flow, never by
/// the drift cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathPoint {
    pub label:       String,
    pub lat:         f64,
    pub lon:         f64,
    pub recorded_at: String,
}

pub trait PostcardRepository {
    /// Every postcard currently eligible for drift: status `traveling`
    /// with a stored position. Non-traveling rows are excluded by the
    /// query itself, so a cycle can never advance a collected postcard.
    fn traveling_postcards(&self) -> SimResult<Vec<PostcardRecord>>;

    /// Persist a new position and update timestamp for one postcard.
    ///
    /// Unconditional read-then-write: there is no optimistic
    /// concurrency control, so a concurrent external status change
    /// between a cycle's read and this write can be lost. Accepted and
    /// documented risk, not resolved here.
    fn update_position(
        &self,
        postcard_id: &str,
        lat: f64,
        lon: f64,
        updated_at: &str,
    ) -> SimResult<()>;
}
