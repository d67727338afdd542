//! Read-side views assembled from several tables.

mod intakes;

pub use intakes::*;
