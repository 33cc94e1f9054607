use crate::{
    model_service::ModelService,
    preprocess::{decode_image, fit_image, to_input_tensor},
    InferenceError, Prediction,
};
use image::RgbImage;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub prediction: Prediction,
    /// The fitted image that was fed to the model.
    pub preview: RgbImage,
}

#[derive(Clone)]
pub struct InferencePipeline {
    model_service: Arc<dyn ModelService>,
}

impl InferencePipeline {
    pub fn new(model_service: Arc<dyn ModelService>) -> Self {
        Self { model_service }
    }

    #[instrument(skip(self, image_data), fields(bytes = image_data.len()))]
    pub fn run(&self, image_data: &[u8]) -> Result<PipelineOutput, InferenceError> {
        let original = decode_image(image_data)?;
        tracing::debug!(
            "Decoded {}x{} image",
            original.width(),
            original.height()
        );

        let preview = fit_image(&original);
        let input = to_input_tensor(&preview);

        let scores = self.model_service.predict(&input)?;
        let score = scores
            .get([0, 0])
            .copied()
            .ok_or_else(|| {
                InferenceError::InvalidOutput(format!(
                    "no score at [0][0] in output of shape {:?}",
                    scores.shape()
                ))
            })?;

        let prediction = Prediction::from_score(score);
        tracing::debug!(
            "score={:.4}, diagnosis={}",
            prediction.score,
            prediction.diagnosis.as_str()
        );

        Ok(PipelineOutput {
            prediction,
            preview,
        })
    }
}
