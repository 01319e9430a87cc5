use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use schema::msg::{self, PredictResponse};
use serde_json::{Value, json};

use crate::{
    context::ServiceContext,
    error::{Result, ServeErr},
};

/// `POST /predict`
pub async fn predict(
    State(ctx): State<Arc<ServiceContext>>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictResponse>> {
    let Json(body) = body.map_err(|e| ServeErr::MalformedJson(e.body_text()))?;
    let record = msg::parse_request(&body)?;
    let response = ctx.predict(&record)?;
    Ok(Json(response))
}

/// `GET /health`
pub async fn health(State(ctx): State<Arc<ServiceContext>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": ctx.tag().to_string(),
    }))
}
