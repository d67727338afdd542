//! Shared handler state.

use medtrack_core::{Database, Store};

use crate::api::error::ApiError;

/// State injected into every handler.
///
/// Holds the store handle only; connections are opened per request.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Store,
}

impl ApiContext {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Open a session scoped to the calling handler.
    pub fn session(&self) -> Result<Database, ApiError> {
        self.store.session().map_err(ApiError::from)
    }
}
