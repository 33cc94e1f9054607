mod error;
mod model_cache;
mod model_service;
mod ort_service;
mod pipeline;
mod prediction;

pub mod config;
pub mod preprocess;

pub use error::InferenceError;
pub use model_cache::LazyModel;
pub use model_service::ModelService;
pub use ort_service::{load_model, OrtModelService};
pub use pipeline::{InferencePipeline, PipelineOutput};
pub use prediction::{Diagnosis, Prediction, HEALTHY_THRESHOLD};
