//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{classify, is_constraint_violation, Database, DbResult};
use crate::models::{NewPatient, Patient, PatientLookup, PatientQuery};

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        username: row.get(1)?,
        name: row.get(2)?,
        surname: row.get(3)?,
    })
}

impl Database {
    /// Register a new patient.
    ///
    /// Returns `None` when the username is already taken, including when a
    /// concurrent insert wins the race on the unique constraint.
    pub fn insert_patient(&self, patient: &NewPatient) -> DbResult<Option<Patient>> {
        if self.get_patient_by_username(&patient.username)?.is_some() {
            return Ok(None);
        }

        let result = self.conn.execute(
            "INSERT INTO patients (username, name, surname) VALUES (?1, ?2, ?3)",
            params![patient.username, patient.name, patient.surname],
        );
        match result {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let id = self.conn.last_insert_rowid();
        tracing::debug!(patient_id = id, username = %patient.username, "patient inserted");
        Ok(Some(Patient {
            id,
            username: patient.username.clone(),
            name: patient.name.clone(),
            surname: patient.surname.clone(),
        }))
    }

    /// Resolve patients by id, username or page.
    pub fn find_patient(&self, query: &PatientQuery) -> DbResult<PatientLookup> {
        match query {
            PatientQuery::ById(id) => self.get_patient(*id).map(PatientLookup::Single),
            PatientQuery::ByUsername(username) => self
                .get_patient_by_username(username)
                .map(PatientLookup::Single),
            PatientQuery::Page { start_index, count } => self
                .list_patients(*start_index, *count)
                .map(PatientLookup::Page),
        }
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                "SELECT id, username, name, surname FROM patients WHERE id = ?",
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a patient by username.
    pub fn get_patient_by_username(&self, username: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                "SELECT id, username, name, surname FROM patients WHERE username = ?",
                [username],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List patients in primary key order, optionally paged.
    pub fn list_patients(
        &self,
        start_index: Option<u32>,
        count: Option<u32>,
    ) -> DbResult<Vec<Patient>> {
        // SQLite treats a negative LIMIT as "no limit".
        let limit = count.map_or(-1, i64::from);
        let offset = start_index.map_or(0, i64::from);

        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, username, name, surname
            FROM patients
            ORDER BY id
            LIMIT ?1 OFFSET ?2
            "#,
        )?;

        let rows = stmt.query_map(params![limit, offset], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Replace all fields of an existing patient.
    ///
    /// Returns `false` if the patient does not exist. Taking a username that
    /// belongs to someone else is a `DbError::Constraint`.
    pub fn update_patient(&self, id: i64, patient: &NewPatient) -> DbResult<bool> {
        if self.get_patient(id)?.is_none() {
            return Ok(false);
        }

        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE patients SET
                    username = ?2,
                    name = ?3,
                    surname = ?4
                WHERE id = ?1
                "#,
                params![id, patient.username, patient.name, patient.surname],
            )
            .map_err(classify)?;
        Ok(rows_affected > 0)
    }

    /// Delete a patient and, through the schema, everything it owns.
    pub fn delete_patient(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?", [id])?;
        if rows_affected > 0 {
            tracing::debug!(patient_id = id, "patient deleted");
        }
        Ok(rows_affected > 0)
    }
}
