//! Posology endpoints.
//!
//! Creation answers 422 both for an out-of-range time and for an unknown
//! medication. Updates answer 422 for a bad time and 404 for an unknown path.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use medtrack_core::validation::validate_time_of_day;
use medtrack_core::{NewPosology, Posology};

use crate::api::endpoints::medications::medication_not_found;
use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::types::ApiContext;

fn posology_not_found(posology_id: i64) -> ApiError {
    ApiError::NotFound(format!("Posology {posology_id} not found"))
}

/// `POST /patients/:patient_id/medications/:medication_id/posologies`
pub async fn create(
    State(ctx): State<ApiContext>,
    ApiPath((patient_id, medication_id)): ApiPath<(i64, i64)>,
    ApiJson(payload): ApiJson<NewPosology>,
) -> Result<(StatusCode, Json<Posology>), ApiError> {
    let (hour, minute) = validate_time_of_day(payload.hour, payload.minute).map_err(|e| {
        tracing::warn!(medication_id, error = %e, "posology rejected");
        ApiError::from(e)
    })?;

    let missing = || {
        ApiError::Unprocessable(format!(
            "Medication {medication_id} does not exist for patient {patient_id}"
        ))
    };

    let db = ctx.session()?;
    if db.find_medication(patient_id, medication_id)?.is_none() {
        return Err(missing());
    }
    let posology = db
        .insert_posology(medication_id, hour, minute)?
        .ok_or_else(missing)?;
    tracing::info!(medication_id, posology_id = posology.id, "posology created");
    Ok((StatusCode::CREATED, Json(posology)))
}

/// `GET /patients/:patient_id/medications/:medication_id/posologies`
pub async fn list(
    State(ctx): State<ApiContext>,
    ApiPath((patient_id, medication_id)): ApiPath<(i64, i64)>,
) -> Result<Json<Vec<Posology>>, ApiError> {
    let db = ctx.session()?;
    if db.find_medication(patient_id, medication_id)?.is_none() {
        return Err(medication_not_found(patient_id, medication_id));
    }
    Ok(Json(db.find_posologies(patient_id, medication_id)?))
}

/// `GET /patients/:patient_id/medications/:medication_id/posologies/:posology_id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    ApiPath((patient_id, medication_id, posology_id)): ApiPath<(i64, i64, i64)>,
) -> Result<Json<Posology>, ApiError> {
    let db = ctx.session()?;
    db.find_posology(patient_id, medication_id, posology_id)?
        .map(Json)
        .ok_or_else(|| posology_not_found(posology_id))
}

/// `PATCH /patients/:patient_id/medications/:medication_id/posologies/:posology_id`
pub async fn update(
    State(ctx): State<ApiContext>,
    ApiPath((patient_id, medication_id, posology_id)): ApiPath<(i64, i64, i64)>,
    ApiJson(payload): ApiJson<NewPosology>,
) -> Result<StatusCode, ApiError> {
    let (hour, minute) = validate_time_of_day(payload.hour, payload.minute)?;

    let db = ctx.session()?;
    if !db.update_posology(patient_id, medication_id, posology_id, hour, minute)? {
        return Err(posology_not_found(posology_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /patients/:patient_id/medications/:medication_id/posologies/:posology_id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    ApiPath((patient_id, medication_id, posology_id)): ApiPath<(i64, i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let db = ctx.session()?;
    if !db.delete_posology(patient_id, medication_id, posology_id)? {
        return Err(posology_not_found(posology_id));
    }
    Ok(StatusCode::NO_CONTENT)
}
