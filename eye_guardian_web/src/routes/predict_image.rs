use crate::{
    classify::{classify, PredictError},
    html::error_message,
    server::SharedState,
};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use eye_guardian_inference::Diagnosis;
use serde::Serialize;
use tracing::instrument;

const ROUTE: &str = "/api/predict";

#[derive(Serialize)]
pub struct PredictionResponse {
    score: f32,
    diagnosis: Diagnosis,
    healthy: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = match &self {
            PredictError::EmptyUpload => StatusCode::BAD_REQUEST,
            PredictError::Body(rejection) => rejection.status(),
            PredictError::Inference(e) if e.is_bad_input() => StatusCode::UNPROCESSABLE_ENTITY,
            PredictError::Inference(_) | PredictError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorResponse {
            error: error_message(&self),
        };
        (status, Json(body)).into_response()
    }
}

#[instrument(skip(state, image_data))]
pub async fn predict_image(
    State(state): State<SharedState>,
    image_data: Result<Bytes, BytesRejection>,
) -> Result<Json<PredictionResponse>, PredictError> {
    state.metrics.record_request(ROUTE);

    let image_data = image_data.inspect_err(|e| {
        tracing::warn!("Rejected request body: {}", e);
        state.metrics.record_error(ROUTE);
    })?;

    let classified = classify(&state, image_data, ROUTE).await?;
    let prediction = classified.prediction;

    Ok(Json(PredictionResponse {
        score: prediction.score,
        diagnosis: prediction.diagnosis,
        healthy: prediction.diagnosis.is_healthy(),
        message: prediction.diagnosis.message(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eye_guardian_inference::InferenceError;

    #[test]
    fn test_preview_encoding_failure_is_a_server_error() {
        let err = PredictError::Inference(InferenceError::Encode("png writer failed".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_decode_failure_is_unprocessable() {
        let err = PredictError::Inference(InferenceError::Decode(image_error()));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    fn image_error() -> image::ImageError {
        image::ImageError::IoError(std::io::Error::other("truncated"))
    }
}
