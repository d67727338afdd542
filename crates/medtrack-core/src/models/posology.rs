//! Posology (dosing schedule) models.

use serde::{Deserialize, Serialize};

/// One scheduled daily dosing time for a medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Posology {
    pub id: i64,
    pub medication_id: i64,
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
}

/// Unvalidated posology fields as received from a client.
///
/// Wide integers so out-of-range input is rejected instead of failing to
/// deserialize.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPosology {
    pub hour: i64,
    pub minute: i64,
}
