//! API router.
//!
//! Returns a composable `Router`; CORS is layered on by the server so tests
//! can drive the bare routes.

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use medtrack_core::Store;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the API router over a store.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(store: Store) -> Router {
    let ctx = ApiContext::new(store);

    let patients = Router::new()
        .route(
            "/patients",
            get(endpoints::patients::search).post(endpoints::patients::create),
        )
        .route(
            "/patients/:patient_id",
            get(endpoints::patients::detail)
                .patch(endpoints::patients::update)
                .delete(endpoints::patients::remove),
        )
        .route(
            "/patients/:patient_id/intakes",
            get(endpoints::intakes::by_patient),
        );

    let medications = Router::new()
        .route(
            "/patients/:patient_id/medications",
            get(endpoints::medications::list).post(endpoints::medications::create),
        )
        .route(
            "/patients/:patient_id/medications/:medication_id",
            get(endpoints::medications::detail)
                .patch(endpoints::medications::update)
                .delete(endpoints::medications::remove),
        );

    let posologies = Router::new()
        .route(
            "/patients/:patient_id/medications/:medication_id/posologies",
            get(endpoints::posologies::list).post(endpoints::posologies::create),
        )
        .route(
            "/patients/:patient_id/medications/:medication_id/posologies/:posology_id",
            get(endpoints::posologies::detail)
                .patch(endpoints::posologies::update)
                .delete(endpoints::posologies::remove),
        );

    let intakes = Router::new()
        .route(
            "/patients/:patient_id/medications/:medication_id/intakes",
            get(endpoints::intakes::list).post(endpoints::intakes::create),
        )
        .route(
            "/patients/:patient_id/medications/:medication_id/intakes/:intake_id",
            get(endpoints::intakes::detail).delete(endpoints::intakes::remove),
        );

    Router::new()
        .route("/health", get(endpoints::health::check))
        .merge(patients)
        .merge(medications)
        .merge(posologies)
        .merge(intakes)
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
}
