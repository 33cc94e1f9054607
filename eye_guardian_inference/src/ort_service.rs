use crate::{
    config::{ModelConfig, Validatable},
    model_cache::LazyModel,
    model_service::ModelService,
    InferenceError,
};
use ndarray::{Array2, Array4, Ix2};
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::TensorRef,
};
use parking_lot::Mutex;
use std::sync::Arc;

static MODEL: LazyModel<OrtModelService> = LazyModel::new();

/// Returns the process-wide classifier, reading the model file on the first call only.
pub fn load_model(model_config: &ModelConfig) -> Result<Arc<OrtModelService>, InferenceError> {
    MODEL.get_or_load(|| OrtModelService::new(model_config))
}

pub struct OrtModelService {
    session: Mutex<Session>,
}

impl OrtModelService {
    pub fn new(model_config: &ModelConfig) -> Result<Self, InferenceError> {
        model_config
            .validate()
            .map_err(InferenceError::ModelLoad)?;

        let path = model_config.get_path();
        let session = Session::builder()
            .and_then(|builder| builder.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|builder| builder.with_intra_threads(model_config.intra_threads))
            .and_then(|builder| builder.commit_from_file(&path))
            .map_err(|e| InferenceError::ModelLoad(format!("{:?}: {}", path, e)))?;

        tracing::info!("Loaded ONNX model from {:?}", path);

        Ok(Self {
            session: Mutex::new(session),
        })
    }

    fn run_inference(&self, input: &Array4<f32>) -> Result<ndarray::ArrayD<f32>, InferenceError> {
        let owned_buffer;
        let input_view = if input.view().is_standard_layout() {
            input.view()
        } else {
            owned_buffer = input.as_standard_layout().into_owned();
            owned_buffer.view()
        };

        let tensor_ref = TensorRef::from_array_view(input_view)
            .map_err(|e| InferenceError::Inference(format!("failed to build tensor: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![tensor_ref])?;

        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::InvalidOutput(format!("failed to extract tensor: {}", e)))?;

        let ix = shape.to_ixdyn();
        let array = ndarray::ArrayD::from_shape_vec(ix, data.to_vec())
            .map_err(|e| InferenceError::InvalidOutput(format!("invalid tensor shape: {}", e)))?;

        Ok(array)
    }
}

impl ModelService for OrtModelService {
    fn predict(&self, batch: &Array4<f32>) -> Result<Array2<f32>, InferenceError> {
        let output = self.run_inference(batch)?;
        tracing::debug!("Model output shape {:?}", output.shape());

        output
            .into_dimensionality::<Ix2>()
            .map_err(|e| InferenceError::InvalidOutput(format!("expected a 2-D output: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_model_is_a_load_error() {
        let config = ModelConfig {
            onnx_file: "missing.onnx".to_string(),
            model_dir: PathBuf::from("./no_such_model_dir"),
            intra_threads: 1,
        };

        let result = OrtModelService::new(&config);
        assert!(matches!(result, Err(InferenceError::ModelLoad(_))));
    }

    #[test]
    fn test_load_model_does_not_cache_failures() {
        let config = ModelConfig {
            onnx_file: "missing.onnx".to_string(),
            model_dir: PathBuf::from("./no_such_model_dir"),
            intra_threads: 1,
        };

        assert!(load_model(&config).is_err());
        assert!(!MODEL.is_loaded());
    }
}
