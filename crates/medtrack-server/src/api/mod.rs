//! REST API.
//!
//! Resources nest along the ownership hierarchy:
//! `/patients/:patient_id/medications/:medication_id/{posologies,intakes}`.
//! Each handler validates its fields, resolves the ancestor chain, then
//! reads or writes the target.

pub mod endpoints;
pub mod error;
pub mod extract;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::serve;
pub use types::ApiContext;
