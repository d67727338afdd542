//! Medication models.

use serde::{Deserialize, Serialize};

use super::{Intake, Posology};

/// A medication prescribed to one patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    pub id: i64,
    /// Owning patient
    pub patient_id: i64,
    pub name: String,
    /// Amount per dose
    pub dosage: f64,
    /// First day of treatment (`YYYY-MM-DD`)
    pub start_date: String,
    /// Treatment length in days, -1 for indefinite
    pub treatment_duration: i64,
}

/// Fields supplied when creating or updating a medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMedication {
    pub name: String,
    #[serde(default = "default_dosage")]
    pub dosage: f64,
    pub start_date: String,
    #[serde(default = "default_treatment_duration")]
    pub treatment_duration: i64,
}

fn default_dosage() -> f64 {
    1.0
}

fn default_treatment_duration() -> i64 {
    1
}

impl NewMedication {
    pub fn new(name: impl Into<String>, start_date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dosage: default_dosage(),
            start_date: start_date.into(),
            treatment_duration: default_treatment_duration(),
        }
    }

    pub fn with_dosage(mut self, dosage: f64) -> Self {
        self.dosage = dosage;
        self
    }

    pub fn with_duration(mut self, days: i64) -> Self {
        self.treatment_duration = days;
        self
    }
}

/// Read-only view of a medication with its schedule and recorded intakes.
///
/// Built on read by the aggregation layer, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationIntake {
    pub id: i64,
    pub patient_id: i64,
    pub name: String,
    pub dosage: f64,
    pub start_date: String,
    pub treatment_duration: i64,
    /// Every posology of the medication
    pub posologies_by_medication: Vec<Posology>,
    /// Intakes of the medication inside the requested range
    pub intakes_by_medication: Vec<Intake>,
}

impl MedicationIntake {
    /// Start an empty bucket for a medication.
    pub fn new(medication: Medication, posologies: Vec<Posology>) -> Self {
        Self {
            id: medication.id,
            patient_id: medication.patient_id,
            name: medication.name,
            dosage: medication.dosage,
            start_date: medication.start_date,
            treatment_duration: medication.treatment_duration,
            posologies_by_medication: posologies,
            intakes_by_medication: Vec::new(),
        }
    }
}
