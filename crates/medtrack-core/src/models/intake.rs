//! Intake models.

use serde::{Deserialize, Serialize};

/// A recorded dose actually taken.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Intake {
    pub id: i64,
    pub medication_id: i64,
    /// Naive timestamp (`YYYY-MM-DDTHH:MM`)
    pub date: String,
}

/// Unvalidated intake fields as received from a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewIntake {
    pub date: String,
}
