//! Patient endpoints.
//!
//! - `POST /patients`: register, 409 when the username is taken
//! - `GET /patients`: lookup by `username` (alias `code`) or paged listing
//! - `GET|PATCH|DELETE /patients/:patient_id`

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use medtrack_core::{NewPatient, Patient, PatientLookup, PatientQuery};

use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::types::ApiContext;

#[derive(Debug, Default, Deserialize)]
pub struct PatientSearchQuery {
    pub username: Option<String>,
    /// Older clients send the username as `code`
    pub code: Option<String>,
    pub start_index: Option<u32>,
    pub count: Option<u32>,
}

impl PatientSearchQuery {
    /// `username` takes precedence over `code`; without either, page.
    pub fn into_query(self) -> PatientQuery {
        match self.username.or(self.code) {
            Some(username) => PatientQuery::ByUsername(username),
            None => PatientQuery::Page {
                start_index: self.start_index,
                count: self.count,
            },
        }
    }
}

pub(crate) fn patient_not_found(patient_id: i64) -> ApiError {
    ApiError::NotFound(format!("Patient {patient_id} not found"))
}

/// `POST /patients`
pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(payload): ApiJson<NewPatient>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let db = ctx.session()?;
    match db.insert_patient(&payload)? {
        Some(patient) => {
            tracing::info!(patient_id = patient.id, "patient registered");
            Ok((StatusCode::CREATED, Json(patient)))
        }
        None => {
            tracing::warn!(username = %payload.username, "username already registered");
            Err(ApiError::Conflict(format!(
                "Username '{}' is already registered",
                payload.username
            )))
        }
    }
}

/// `GET /patients`
pub async fn search(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<PatientSearchQuery>,
) -> Result<Response, ApiError> {
    let db = ctx.session()?;
    match db.find_patient(&query.into_query())? {
        PatientLookup::Single(Some(patient)) => Ok(Json(patient).into_response()),
        PatientLookup::Single(None) => Err(ApiError::NotFound("Patient not found".into())),
        PatientLookup::Page(patients) => Ok(Json(patients).into_response()),
    }
}

/// `GET /patients/:patient_id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    ApiPath(patient_id): ApiPath<i64>,
) -> Result<Json<Patient>, ApiError> {
    let db = ctx.session()?;
    db.find_patient(&PatientQuery::ById(patient_id))?
        .into_single()
        .map(Json)
        .ok_or_else(|| patient_not_found(patient_id))
}

/// `PATCH /patients/:patient_id`: replaces every field.
pub async fn update(
    State(ctx): State<ApiContext>,
    ApiPath(patient_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<NewPatient>,
) -> Result<StatusCode, ApiError> {
    let db = ctx.session()?;
    if !db.update_patient(patient_id, &payload)? {
        return Err(patient_not_found(patient_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /patients/:patient_id`: also removes medications, posologies and intakes.
pub async fn remove(
    State(ctx): State<ApiContext>,
    ApiPath(patient_id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    let db = ctx.session()?;
    if !db.delete_patient(patient_id)? {
        return Err(patient_not_found(patient_id));
    }
    tracing::info!(patient_id, "patient deleted");
    Ok(StatusCode::NO_CONTENT)
}
