//! Medication endpoints.
//!
//! - `POST /patients/:patient_id/medications`: 422 on bad `start_date`, non-positive `dosage` or unknown patient
//! - `GET /patients/:patient_id/medications`
//! - `GET|PATCH|DELETE /patients/:patient_id/medications/:medication_id`

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use medtrack_core::validation::{canonical_start_date, validate_dosage};
use medtrack_core::{Medication, NewMedication};

use crate::api::endpoints::patients::patient_not_found;
use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::types::ApiContext;

pub(crate) fn medication_not_found(patient_id: i64, medication_id: i64) -> ApiError {
    ApiError::NotFound(format!(
        "Medication {medication_id} not found for patient {patient_id}"
    ))
}

/// Validate fields and normalize the start date.
fn validated(mut payload: NewMedication) -> Result<NewMedication, ApiError> {
    payload.start_date = canonical_start_date(&payload.start_date)?;
    payload.dosage = validate_dosage(payload.dosage)?;
    Ok(payload)
}

/// `POST /patients/:patient_id/medications`
pub async fn create(
    State(ctx): State<ApiContext>,
    ApiPath(patient_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<NewMedication>,
) -> Result<(StatusCode, Json<Medication>), ApiError> {
    let payload = validated(payload).map_err(|e| {
        tracing::warn!(patient_id, error = %e, "medication rejected");
        e
    })?;

    let db = ctx.session()?;
    if db.get_patient(patient_id)?.is_none() {
        return Err(ApiError::Unprocessable(format!(
            "Patient {patient_id} does not exist"
        )));
    }

    let medication = db.insert_medication(patient_id, &payload)?.ok_or_else(|| {
        ApiError::Unprocessable(format!("Patient {patient_id} does not exist"))
    })?;
    tracing::info!(patient_id, medication_id = medication.id, "medication created");
    Ok((StatusCode::CREATED, Json(medication)))
}

/// `GET /patients/:patient_id/medications`
pub async fn list(
    State(ctx): State<ApiContext>,
    ApiPath(patient_id): ApiPath<i64>,
) -> Result<Json<Vec<Medication>>, ApiError> {
    let db = ctx.session()?;
    if db.get_patient(patient_id)?.is_none() {
        return Err(patient_not_found(patient_id));
    }
    Ok(Json(db.find_medications(patient_id)?))
}

/// `GET /patients/:patient_id/medications/:medication_id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    ApiPath((patient_id, medication_id)): ApiPath<(i64, i64)>,
) -> Result<Json<Medication>, ApiError> {
    let db = ctx.session()?;
    db.find_medication(patient_id, medication_id)?
        .map(Json)
        .ok_or_else(|| medication_not_found(patient_id, medication_id))
}

/// `PATCH /patients/:patient_id/medications/:medication_id`: replaces every field.
pub async fn update(
    State(ctx): State<ApiContext>,
    ApiPath((patient_id, medication_id)): ApiPath<(i64, i64)>,
    ApiJson(payload): ApiJson<NewMedication>,
) -> Result<StatusCode, ApiError> {
    let payload = validated(payload)?;

    let db = ctx.session()?;
    if !db.update_medication(patient_id, medication_id, &payload)? {
        return Err(medication_not_found(patient_id, medication_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /patients/:patient_id/medications/:medication_id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    ApiPath((patient_id, medication_id)): ApiPath<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let db = ctx.session()?;
    if !db.delete_medication(patient_id, medication_id)? {
        return Err(medication_not_found(patient_id, medication_id));
    }
    tracing::info!(patient_id, medication_id, "medication deleted");
    Ok(StatusCode::NO_CONTENT)
}
