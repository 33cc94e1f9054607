use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("failed to load model: {0}")]
    ModelLoad(String),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("unexpected model output: {0}")]
    InvalidOutput(String),
    #[error("failed to encode preview: {0}")]
    Encode(String),
}

impl From<ort::Error> for InferenceError {
    fn from(err: ort::Error) -> Self {
        InferenceError::Inference(err.to_string())
    }
}

impl InferenceError {
    /// Whether the failure came from the uploaded bytes rather than the model.
    pub fn is_bad_input(&self) -> bool {
        matches!(self, InferenceError::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_decode_failures_are_bad_input() {
        let decode = InferenceError::Decode(image::ImageError::IoError(std::io::Error::other(
            "truncated",
        )));
        assert!(decode.is_bad_input());
        assert!(!InferenceError::Encode("png writer failed".to_string()).is_bad_input());
        assert!(!InferenceError::Inference("session".to_string()).is_bad_input());
    }
}
