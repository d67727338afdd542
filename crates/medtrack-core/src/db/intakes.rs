//! Intake database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{is_constraint_violation, Database, DbResult};
use crate::models::Intake;
use crate::validation::DateRange;

fn intake_from_row(row: &Row<'_>) -> rusqlite::Result<Intake> {
    Ok(Intake {
        id: row.get(0)?,
        medication_id: row.get(1)?,
        date: row.get(2)?,
    })
}

impl Database {
    /// Record an intake. `date` must already be in canonical form.
    ///
    /// Returns `None` when the medication does not exist.
    pub fn insert_intake(&self, medication_id: i64, date: &str) -> DbResult<Option<Intake>> {
        let result = self.conn.execute(
            "INSERT INTO intakes (medication_id, date) VALUES (?1, ?2)",
            params![medication_id, date],
        );
        match result {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let id = self.conn.last_insert_rowid();
        tracing::debug!(medication_id, intake_id = id, "intake inserted");
        Ok(Some(Intake {
            id,
            medication_id,
            date: date.to_string(),
        }))
    }

    /// Get an intake through its full ownership path.
    pub fn find_intake(
        &self,
        patient_id: i64,
        medication_id: i64,
        intake_id: i64,
    ) -> DbResult<Option<Intake>> {
        self.conn
            .query_row(
                r#"
                SELECT i.id, i.medication_id, i.date
                FROM intakes i
                JOIN medications m ON m.id = i.medication_id
                WHERE i.id = ?1 AND m.id = ?2 AND m.patient_id = ?3
                "#,
                params![intake_id, medication_id, patient_id],
                intake_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List intakes of a medication inside an inclusive date range,
    /// chronologically.
    ///
    /// The caller is expected to have resolved the medication through its
    /// patient already.
    pub fn find_intakes(&self, medication_id: i64, range: &DateRange) -> DbResult<Vec<Intake>> {
        let (start, end) = range.bounds();
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, medication_id, date
            FROM intakes
            WHERE medication_id = ?1
              AND (?2 IS NULL OR date >= ?2)
              AND (?3 IS NULL OR date <= ?3)
            ORDER BY date, id
            "#,
        )?;

        let rows = stmt.query_map(params![medication_id, start, end], intake_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete an intake through its full ownership path.
    pub fn delete_intake(
        &self,
        patient_id: i64,
        medication_id: i64,
        intake_id: i64,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            DELETE FROM intakes
            WHERE id = ?1
              AND medication_id = ?2
              AND EXISTS (SELECT 1 FROM medications WHERE id = ?2 AND patient_id = ?3)
            "#,
            params![intake_id, medication_id, patient_id],
        )?;
        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewMedication, NewPatient};

    fn setup() -> (Database, i64, i64) {
        let db = Database::open_in_memory().unwrap();
        let patient = db.insert_patient(&NewPatient::new("u6")).unwrap().unwrap();
        let med = db
            .insert_medication(patient.id, &NewMedication::new("Med1", "2024-09-05"))
            .unwrap()
            .unwrap();
        for date in ["2024-09-06T10:30", "2024-09-06T14:30", "2024-09-06T20:30"] {
            db.insert_intake(med.id, date).unwrap().unwrap();
        }
        (db, patient.id, med.id)
    }

    fn range(start: Option<&str>, end: Option<&str>) -> DateRange {
        DateRange::parse(start, end).unwrap()
    }

    #[test]
    fn test_unfiltered() {
        let (db, _, med) = setup();
        assert_eq!(db.find_intakes(med, &DateRange::unbounded()).unwrap().len(), 3);
    }

    #[test]
    fn test_both_bounds() {
        let (db, _, med) = setup();
        let found = db
            .find_intakes(med, &range(Some("2024-09-06T09:30"), Some("2024-09-06T16:30")))
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_one_sided_bounds() {
        let (db, _, med) = setup();
        assert_eq!(
            db.find_intakes(med, &range(Some("2024-09-06T13:30"), None))
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            db.find_intakes(med, &range(None, Some("2024-09-06T13:30")))
                .unwrap()
                .len(),
            1
        );
        assert!(db
            .find_intakes(med, &range(Some("2024-12-12T10:00"), None))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_bounds_inclusive() {
        let (db, _, med) = setup();
        let found = db
            .find_intakes(med, &range(Some("2024-09-06T10:30"), Some("2024-09-06T20:30")))
            .unwrap();
        assert_eq!(found.len(), 3);

        let exact = db
            .find_intakes(med, &range(Some("2024-09-06T14:30"), Some("2024-09-06T14:30")))
            .unwrap();
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].date, "2024-09-06T14:30");
    }

    #[test]
    fn test_chronological_order() {
        let (db, _, med) = setup();
        db.insert_intake(med, "2024-09-05T07:00").unwrap();
        let found = db.find_intakes(med, &DateRange::unbounded()).unwrap();
        assert_eq!(found[0].date, "2024-09-05T07:00");
    }

    #[test]
    fn test_insert_for_missing_medication() {
        let (db, _, _) = setup();
        assert!(db.insert_intake(999, "2024-09-06T10:30").unwrap().is_none());
    }

    #[test]
    fn test_find_and_delete_intake() {
        let (db, patient, med) = setup();
        let intake = db.find_intakes(med, &DateRange::unbounded()).unwrap()[0].clone();

        assert!(db.find_intake(patient, med, intake.id).unwrap().is_some());
        assert!(db.find_intake(patient + 100, med, intake.id).unwrap().is_none());
        assert!(db.find_intake(patient, med + 100, intake.id).unwrap().is_none());

        assert!(!db.delete_intake(patient + 100, med, intake.id).unwrap());
        assert!(db.delete_intake(patient, med, intake.id).unwrap());
        assert!(db.find_intake(patient, med, intake.id).unwrap().is_none());
        assert_eq!(db.find_intakes(med, &DateRange::unbounded()).unwrap().len(), 2);
    }
}
