//! Posology database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{is_constraint_violation, Database, DbResult};
use crate::models::Posology;

fn posology_from_row(row: &Row<'_>) -> rusqlite::Result<Posology> {
    Ok(Posology {
        id: row.get(0)?,
        medication_id: row.get(1)?,
        hour: row.get(2)?,
        minute: row.get(3)?,
    })
}

impl Database {
    /// Insert a dosing time for a medication.
    ///
    /// Callers validate the ancestor chain and the time of day first. Returns
    /// `None` when the medication does not exist.
    pub fn insert_posology(
        &self,
        medication_id: i64,
        hour: u8,
        minute: u8,
    ) -> DbResult<Option<Posology>> {
        let result = self.conn.execute(
            "INSERT INTO posologies (medication_id, hour, minute) VALUES (?1, ?2, ?3)",
            params![medication_id, hour, minute],
        );
        match result {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let id = self.conn.last_insert_rowid();
        tracing::debug!(medication_id, posology_id = id, "posology inserted");
        Ok(Some(Posology {
            id,
            medication_id,
            hour,
            minute,
        }))
    }

    /// Get a posology through its full ownership path.
    pub fn find_posology(
        &self,
        patient_id: i64,
        medication_id: i64,
        posology_id: i64,
    ) -> DbResult<Option<Posology>> {
        self.conn
            .query_row(
                r#"
                SELECT p.id, p.medication_id, p.hour, p.minute
                FROM posologies p
                JOIN medications m ON m.id = p.medication_id
                WHERE p.id = ?1 AND m.id = ?2 AND m.patient_id = ?3
                "#,
                params![posology_id, medication_id, patient_id],
                posology_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List the posologies of a patient's medication in ID order.
    pub fn find_posologies(&self, patient_id: i64, medication_id: i64) -> DbResult<Vec<Posology>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT p.id, p.medication_id, p.hour, p.minute
            FROM posologies p
            JOIN medications m ON m.id = p.medication_id
            WHERE m.id = ?1 AND m.patient_id = ?2
            ORDER BY p.id
            "#,
        )?;

        let rows = stmt.query_map(params![medication_id, patient_id], posology_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Replace the time of a posology. Returns `false` if the key path does
    /// not resolve.
    pub fn update_posology(
        &self,
        patient_id: i64,
        medication_id: i64,
        posology_id: i64,
        hour: u8,
        minute: u8,
    ) -> DbResult<bool> {
        if self
            .find_posology(patient_id, medication_id, posology_id)?
            .is_none()
        {
            return Ok(false);
        }

        let rows_affected = self.conn.execute(
            "UPDATE posologies SET hour = ?3, minute = ?4 WHERE id = ?1 AND medication_id = ?2",
            params![posology_id, medication_id, hour, minute],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a posology through its full ownership path.
    pub fn delete_posology(
        &self,
        patient_id: i64,
        medication_id: i64,
        posology_id: i64,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            DELETE FROM posologies
            WHERE id = ?1
              AND medication_id = ?2
              AND EXISTS (SELECT 1 FROM medications WHERE id = ?2 AND patient_id = ?3)
            "#,
            params![posology_id, medication_id, patient_id],
        )?;
        Ok(rows_affected > 0)
    }
}
