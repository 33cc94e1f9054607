use crate::server::SharedState;
use axum::{body::Bytes, extract::rejection::BytesRejection};
use eye_guardian_inference::{preprocess::encode_png, InferenceError, Prediction};
use std::time::Instant;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("no image was uploaded")]
    EmptyUpload,
    #[error("failed to read request body: {0}")]
    Body(#[from] BytesRejection),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error("inference task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub struct Classified {
    pub prediction: Prediction,
    pub preview_png: Vec<u8>,
}

/// Runs the pipeline on the blocking pool and records metrics for `route`.
pub async fn classify(
    state: &SharedState,
    image_data: Bytes,
    route: &'static str,
) -> Result<Classified, PredictError> {
    if image_data.is_empty() {
        state.metrics.record_error(route);
        return Err(PredictError::EmptyUpload);
    }

    let pipeline = state.pipeline.clone();
    let start = Instant::now();

    let result = tokio::task::spawn_blocking(move || {
        let output = pipeline.run(&image_data)?;
        let preview_png = encode_png(&output.preview)?;
        Ok::<_, InferenceError>(Classified {
            prediction: output.prediction,
            preview_png,
        })
    })
    .await
    .map_err(PredictError::from)
    .and_then(|inner| inner.map_err(PredictError::from));

    match &result {
        Ok(classified) => {
            state
                .metrics
                .record_prediction_duration(start.elapsed().as_millis() as u64, route);
            state.metrics.record_diagnosis(classified.prediction.diagnosis);
            tracing::info!(
                "Classified upload: score={:.4}, diagnosis={}",
                classified.prediction.score,
                classified.prediction.diagnosis.as_str()
            );
        }
        Err(e) => {
            state.metrics.record_error(route);
            tracing::warn!("Failed to classify upload: {}", e);
        }
    }

    result
}
