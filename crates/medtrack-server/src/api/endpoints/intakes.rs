//! Intake endpoints.
//!
//! - `POST|GET /patients/:patient_id/medications/:medication_id/intakes`
//! - `GET|DELETE .../intakes/:intake_id`
//! - `GET /patients/:patient_id/intakes`: intakes grouped by medication
//!
//! Range filters (`start_date`, `end_date`) are inclusive and use
//! `YYYY-MM-DDTHH:MM`; a malformed bound is a 422.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use medtrack_core::validation::canonical_intake_date;
use medtrack_core::{DateRange, Intake, IntakeAggregator, MedicationIntake, NewIntake};

use crate::api::endpoints::medications::medication_not_found;
use crate::api::endpoints::patients::patient_not_found;
use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::types::ApiContext;

#[derive(Debug, Default, Deserialize)]
pub struct IntakeRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl IntakeRangeQuery {
    fn to_range(&self) -> Result<DateRange, ApiError> {
        DateRange::parse(self.start_date.as_deref(), self.end_date.as_deref())
            .map_err(ApiError::from)
    }
}

/// `POST /patients/:patient_id/medications/:medication_id/intakes`
pub async fn create(
    State(ctx): State<ApiContext>,
    ApiPath((patient_id, medication_id)): ApiPath<(i64, i64)>,
    ApiJson(payload): ApiJson<NewIntake>,
) -> Result<(StatusCode, Json<Intake>), ApiError> {
    let date = canonical_intake_date(&payload.date).map_err(|e| {
        tracing::warn!(medication_id, error = %e, "intake rejected");
        ApiError::from(e)
    })?;

    let db = ctx.session()?;
    if db.find_medication(patient_id, medication_id)?.is_none() {
        return Err(medication_not_found(patient_id, medication_id));
    }
    let intake = db
        .insert_intake(medication_id, &date)?
        .ok_or_else(|| medication_not_found(patient_id, medication_id))?;
    tracing::info!(medication_id, intake_id = intake.id, "intake recorded");
    Ok((StatusCode::CREATED, Json(intake)))
}

/// `GET /patients/:patient_id/medications/:medication_id/intakes`
pub async fn list(
    State(ctx): State<ApiContext>,
    ApiPath((patient_id, medication_id)): ApiPath<(i64, i64)>,
    ApiQuery(query): ApiQuery<IntakeRangeQuery>,
) -> Result<Json<Vec<Intake>>, ApiError> {
    let range = query.to_range()?;

    let db = ctx.session()?;
    if db.find_medication(patient_id, medication_id)?.is_none() {
        return Err(medication_not_found(patient_id, medication_id));
    }
    Ok(Json(db.find_intakes(medication_id, &range)?))
}

/// `GET /patients/:patient_id/medications/:medication_id/intakes/:intake_id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    ApiPath((patient_id, medication_id, intake_id)): ApiPath<(i64, i64, i64)>,
) -> Result<Json<Intake>, ApiError> {
    let db = ctx.session()?;
    db.find_intake(patient_id, medication_id, intake_id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Intake {intake_id} not found")))
}

/// `DELETE /patients/:patient_id/medications/:medication_id/intakes/:intake_id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    ApiPath((patient_id, medication_id, intake_id)): ApiPath<(i64, i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let db = ctx.session()?;
    if !db.delete_intake(patient_id, medication_id, intake_id)? {
        return Err(ApiError::NotFound(format!("Intake {intake_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /patients/:patient_id/intakes`
pub async fn by_patient(
    State(ctx): State<ApiContext>,
    ApiPath(patient_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<IntakeRangeQuery>,
) -> Result<Json<Vec<MedicationIntake>>, ApiError> {
    let range = query.to_range()?;

    let db = ctx.session()?;
    if db.get_patient(patient_id)?.is_none() {
        return Err(patient_not_found(patient_id));
    }
    let groups = IntakeAggregator::new(&db).by_patient(patient_id, &range)?;
    Ok(Json(groups))
}
