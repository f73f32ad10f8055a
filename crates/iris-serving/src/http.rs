//! HTTP routing for the prediction service.
//!
//! | Method | Path        | Response                                     |
//! |--------|-------------|----------------------------------------------|
//! | GET    | `/`         | `{"message": "Welcome to the ML Model API"}` |
//! | POST   | `/predict/` | `{"prediction": <label>}` or 422             |
//! | POST   | `/predict`  | 307 to `/predict/`                           |

use crate::error::ServingResult;
use crate::schema::{PredictResponse, WelcomeResponse};
use crate::service::PredictorService;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Path of the predict endpoint.
pub const PREDICT_PATH: &str = "/predict/";

/// Build the router over `service`.
pub fn router(service: PredictorService) -> Router {
    Router::new()
        .route("/", get(welcome).fallback(method_not_allowed))
        .route(PREDICT_PATH, post(predict).fallback(method_not_allowed))
        .route("/predict", post(redirect_to_predict).fallback(method_not_allowed))
        .fallback(not_found)
        .with_state(service)
}

async fn welcome(State(service): State<PredictorService>) -> Json<WelcomeResponse> {
    debug!("Welcome request");
    Json(service.welcome())
}

async fn predict(
    State(service): State<PredictorService>,
    body: Bytes,
) -> ServingResult<Json<PredictResponse>> {
    match service.predict_body(&body) {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            warn!(error = %e, "Predict request rejected");
            Err(e)
        }
    }
}

async fn redirect_to_predict() -> Redirect {
    Redirect::temporary(PREDICT_PATH)
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}

async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "detail": "Method Not Allowed" })),
    )
}
