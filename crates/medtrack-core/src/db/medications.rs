//! Medication database operations.
//!
//! Every single-row operation is keyed by `(patient_id, medication_id)`, so a
//! medication is unreachable through any patient other than its owner.

use rusqlite::{params, OptionalExtension, Row};

use super::{is_constraint_violation, Database, DbResult};
use crate::models::{Medication, NewMedication};

fn medication_from_row(row: &Row<'_>) -> rusqlite::Result<Medication> {
    Ok(Medication {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        name: row.get(2)?,
        dosage: row.get(3)?,
        start_date: row.get(4)?,
        treatment_duration: row.get(5)?,
    })
}

impl Database {
    /// Insert a medication for a patient.
    ///
    /// Returns `None` when the patient does not exist (foreign key violation).
    pub fn insert_medication(
        &self,
        patient_id: i64,
        medication: &NewMedication,
    ) -> DbResult<Option<Medication>> {
        let result = self.conn.execute(
            r#"
            INSERT INTO medications (
                patient_id, name, dosage, start_date, treatment_duration
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                patient_id,
                medication.name,
                medication.dosage,
                medication.start_date,
                medication.treatment_duration,
            ],
        );
        match result {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let id = self.conn.last_insert_rowid();
        tracing::debug!(patient_id, medication_id = id, "medication inserted");
        Ok(Some(Medication {
            id,
            patient_id,
            name: medication.name.clone(),
            dosage: medication.dosage,
            start_date: medication.start_date.clone(),
            treatment_duration: medication.treatment_duration,
        }))
    }

    /// Get a medication only if it belongs to the given patient.
    pub fn find_medication(
        &self,
        patient_id: i64,
        medication_id: i64,
    ) -> DbResult<Option<Medication>> {
        self.conn
            .query_row(
                r#"
                SELECT id, patient_id, name, dosage, start_date, treatment_duration
                FROM medications
                WHERE id = ?1 AND patient_id = ?2
                "#,
                params![medication_id, patient_id],
                medication_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all medications of a patient in ID order.
    pub fn find_medications(&self, patient_id: i64) -> DbResult<Vec<Medication>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, name, dosage, start_date, treatment_duration
            FROM medications
            WHERE patient_id = ?
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map([patient_id], medication_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Replace all fields of a medication. Returns `false` if the key path
    /// does not resolve.
    pub fn update_medication(
        &self,
        patient_id: i64,
        medication_id: i64,
        medication: &NewMedication,
    ) -> DbResult<bool> {
        if self.find_medication(patient_id, medication_id)?.is_none() {
            return Ok(false);
        }

        let rows_affected = self.conn.execute(
            r#"
            UPDATE medications SET
                name = ?3,
                dosage = ?4,
                start_date = ?5,
                treatment_duration = ?6
            WHERE id = ?1 AND patient_id = ?2
            "#,
            params![
                medication_id,
                patient_id,
                medication.name,
                medication.dosage,
                medication.start_date,
                medication.treatment_duration,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a medication with its posologies and intakes.
    pub fn delete_medication(&self, patient_id: i64, medication_id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM medications WHERE id = ?1 AND patient_id = ?2",
            params![medication_id, patient_id],
        )?;
        if rows_affected > 0 {
            tracing::debug!(patient_id, medication_id, "medication deleted");
        }
        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPatient;

    fn setup_db() -> (Database, i64, i64) {
        let db = Database::open_in_memory().unwrap();
        let first = db.insert_patient(&NewPatient::new("u1")).unwrap().unwrap();
        let second = db.insert_patient(&NewPatient::new("u2")).unwrap().unwrap();
        (db, first.id, second.id)
    }

    fn med1() -> NewMedication {
        NewMedication::new("Med1", "2024-09-05").with_duration(10)
    }

    #[test]
    fn test_insert_and_find() {
        let (db, p1, _) = setup_db();

        let inserted = db.insert_medication(p1, &med1()).unwrap().unwrap();
        assert_eq!(inserted.patient_id, p1);

        let found = db.find_medication(p1, inserted.id).unwrap().unwrap();
        assert_eq!(found, inserted);
        assert_eq!(found.dosage, 1.0);
        assert_eq!(found.treatment_duration, 10);
    }

    #[test]
    fn test_insert_for_missing_patient() {
        let (db, _, _) = setup_db();
        assert!(db.insert_medication(999, &med1()).unwrap().is_none());
    }

    #[test]
    fn test_wrong_patient_cannot_see_medication() {
        let (db, p1, p2) = setup_db();
        let med = db.insert_medication(p1, &med1()).unwrap().unwrap();

        assert!(db.find_medication(p2, med.id).unwrap().is_none());
        assert!(db.find_medication(999, med.id).unwrap().is_none());
        assert!(!db.update_medication(p2, med.id, &med1()).unwrap());
        assert!(!db.delete_medication(p2, med.id).unwrap());
        assert!(db.find_medication(p1, med.id).unwrap().is_some());
    }

    #[test]
    fn test_find_medications_scoped_to_patient() {
        let (db, p1, p2) = setup_db();
        db.insert_medication(p1, &med1()).unwrap();
        db.insert_medication(p1, &NewMedication::new("Med2", "2024-09-15").with_duration(-1))
            .unwrap();
        db.insert_medication(p2, &NewMedication::new("Med3", "2024-09-01"))
            .unwrap();

        let meds = db.find_medications(p1).unwrap();
        let names: Vec<_> = meds.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Med1", "Med2"]);
        assert_eq!(meds[1].treatment_duration, -1);

        assert_eq!(db.find_medications(p2).unwrap().len(), 1);
        assert!(db.find_medications(999).unwrap().is_empty());
    }

    #[test]
    fn test_update_then_read() {
        let (db, p1, _) = setup_db();
        let med = db.insert_medication(p1, &med1()).unwrap().unwrap();

        let changed = NewMedication::new("Med1", "2024-09-05")
            .with_dosage(2.0)
            .with_duration(5);
        assert!(db.update_medication(p1, med.id, &changed).unwrap());

        let found = db.find_medication(p1, med.id).unwrap().unwrap();
        assert_eq!(found.dosage, 2.0);
        assert_eq!(found.treatment_duration, 5);
    }

    #[test]
    fn test_delete_then_read() {
        let (db, p1, _) = setup_db();
        let med = db.insert_medication(p1, &med1()).unwrap().unwrap();

        assert!(db.delete_medication(p1, med.id).unwrap());
        assert!(db.find_medication(p1, med.id).unwrap().is_none());
        assert!(db.find_medications(p1).unwrap().is_empty());
    }
}
