//! Per-medication intake view for a patient.

use std::collections::HashMap;

use rusqlite::params;

use crate::db::{Database, DbResult};
use crate::models::{Intake, Medication, MedicationIntake};
use crate::validation::DateRange;

/// Groups a patient's intakes by medication.
pub struct IntakeAggregator<'a> {
    db: &'a Database,
}

impl<'a> IntakeAggregator<'a> {
    /// Create a new aggregator over a session.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Build one [`MedicationIntake`] per medication of the patient that has
    /// at least one intake inside `range`.
    ///
    /// Medications without matching intakes are left out entirely. Groups
    /// come out in medication ID order, intakes inside a group in date order.
    pub fn by_patient(&self, patient_id: i64, range: &DateRange) -> DbResult<Vec<MedicationIntake>> {
        let (start, end) = range.bounds();
        let mut stmt = self.db.conn().prepare(
            r#"
            SELECT m.id, m.patient_id, m.name, m.dosage, m.start_date, m.treatment_duration,
                   i.id, i.medication_id, i.date
            FROM medications m
            JOIN intakes i ON i.medication_id = m.id
            WHERE m.patient_id = ?1
              AND (?2 IS NULL OR i.date >= ?2)
              AND (?3 IS NULL OR i.date <= ?3)
            ORDER BY m.id, i.date, i.id
            "#,
        )?;

        let rows = stmt.query_map(params![patient_id, start, end], |row| {
            let medication = Medication {
                id: row.get(0)?,
                patient_id: row.get(1)?,
                name: row.get(2)?,
                dosage: row.get(3)?,
                start_date: row.get(4)?,
                treatment_duration: row.get(5)?,
            };
            let intake = Intake {
                id: row.get(6)?,
                medication_id: row.get(7)?,
                date: row.get(8)?,
            };
            Ok((medication, intake))
        })?;

        let mut groups: Vec<MedicationIntake> = Vec::new();
        let mut index: HashMap<i64, usize> = HashMap::new();

        for row in rows {
            let (medication, intake) = row?;
            let slot = match index.get(&medication.id) {
                Some(&slot) => slot,
                None => {
                    let posologies = self.db.find_posologies(patient_id, medication.id)?;
                    index.insert(medication.id, groups.len());
                    groups.push(MedicationIntake::new(medication, posologies));
                    groups.len() - 1
                }
            };
            groups[slot].intakes_by_medication.push(intake);
        }

        Ok(groups)
    }
}

impl Database {
    /// Shorthand for [`IntakeAggregator::by_patient`].
    pub fn find_intakes_by_patient(
        &self,
        patient_id: i64,
        range: &DateRange,
    ) -> DbResult<Vec<MedicationIntake>> {
        IntakeAggregator::new(self).by_patient(patient_id, range)
    }
}
