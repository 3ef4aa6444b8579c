//! Store trait definitions

use punchclock_api::AttendanceRecord;

use crate::StoreResult;

/// Main store trait
///
/// The record sequence is stored and replaced as a whole; there is no
/// per-record update path.
pub trait Store: Send + Sync {
    /// Load the persisted record sequence.
    ///
    /// Returns `Ok(None)` when nothing has been persisted yet, and a
    /// serialization error when stored data cannot be decoded.
    fn load_records(&self) -> StoreResult<Option<Vec<AttendanceRecord>>>;

    /// Replace the persisted record sequence
    fn save_records(&self, records: &[AttendanceRecord]) -> StoreResult<()>;

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}
