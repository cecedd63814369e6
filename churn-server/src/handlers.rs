//! HTTP request handlers

use crate::error::Result;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Probability above which a customer is flagged as at risk. Strictly
/// greater-than: exactly 0.6 still reads as stable.
pub const CHURN_RISK_THRESHOLD: f64 = 0.6;

pub const RECOMMEND_RETENTION_OFFER: &str = "Oferecer desconto/benefícios";
pub const RECOMMEND_STABLE: &str = "Cliente estável";

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub probabilidade_churn: f64,
    pub recomendacao: &'static str,
}

/// Static service descriptor
pub async fn root() -> Json<Value> {
    Json(serde_json::json!({
        "message": "Churn Prediction API está funcionando!",
        "endpoints": ["/ (GET)", "/health (GET)", "/predict (POST)"],
    }))
}

pub async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Score one customer record.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(record): Json<serde_json::Map<String, Value>>,
) -> Result<Json<PredictResponse>> {
    let probability = state.model.predict_record(&record)?;
    info!(probability, "scored prediction request");

    Ok(Json(PredictResponse {
        probabilidade_churn: probability,
        recomendacao: recommendation_for(probability),
    }))
}

pub(crate) fn recommendation_for(probability: f64) -> &'static str {
    if probability > CHURN_RISK_THRESHOLD {
        RECOMMEND_RETENTION_OFFER
    } else {
        RECOMMEND_STABLE
    }
}
