//! Medtrack Core Library
//!
//! Patient medication tracking: prescriptions, daily dosing schedules
//! (posologies) and recorded doses (intakes).
//!
//! # Ownership
//!
//! ```text
//! Patient
//!   └── Medication
//!         ├── Posology   (hour:minute, daily)
//!         └── Intake     (YYYY-MM-DDTHH:MM)
//! ```
//!
//! Children are always addressed through their full ownership path, so a
//! medication, posology or intake is invisible through any other patient.
//! Deleting a row removes everything below it.
//!
//! # Modules
//!
//! - [`db`]: SQLite store, sessions and path-scoped lookups
//! - [`models`]: Domain types (Patient, Medication, Posology, Intake, ...)
//! - [`aggregate`]: Intakes grouped by medication
//! - [`validation`]: Date and time-of-day checks for client input

pub mod aggregate;
pub mod db;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use aggregate::IntakeAggregator;
pub use db::{Database, DbError, DbResult, Store};
pub use models::{
    Intake, Medication, MedicationIntake, NewIntake, NewMedication, NewPatient, NewPosology,
    Patient, PatientLookup, PatientQuery, Posology,
};
pub use validation::{DateRange, ValidationError};
