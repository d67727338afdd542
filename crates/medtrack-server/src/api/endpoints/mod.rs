//! Route handlers, one module per resource.

pub mod health;
pub mod intakes;
pub mod medications;
pub mod patients;
pub mod posologies;
