//! Shared application state

use churn_core::model::ChurnModel;

/// Process-wide immutable state: the model loaded at startup.
///
/// Shared read-only across all request handlers behind an `Arc`; replaced
/// only by restarting the process, so no locking is involved.
pub struct AppState {
    pub model: ChurnModel,
}

impl AppState {
    pub fn new(model: ChurnModel) -> Self {
        Self { model }
    }
}
