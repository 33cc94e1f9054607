use serde::Deserialize;
use std::path::PathBuf;

pub trait Validatable {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    pub onnx_file: String,
    pub model_dir: PathBuf,
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
}

fn default_intra_threads() -> usize {
    1
}

impl ModelConfig {
    pub fn get_path(&self) -> PathBuf {
        self.model_dir.join(&self.onnx_file)
    }
}

impl Validatable for ModelConfig {
    fn validate(&self) -> Result<(), String> {
        let path = self.get_path();
        if !path.is_file() {
            return Err(format!("Model file not found: {:?}", path));
        }
        if self.intra_threads == 0 {
            return Err("model.intra_threads must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_config(dir: PathBuf, file: &str) -> ModelConfig {
        ModelConfig {
            onnx_file: file.to_string(),
            model_dir: dir,
            intra_threads: 1,
        }
    }

    #[test]
    fn test_get_path_joins_dir_and_file() {
        let config = model_config(PathBuf::from("models"), "my_model2.onnx");
        assert_eq!(config.get_path(), PathBuf::from("models/my_model2.onnx"));
    }

    #[test]
    fn test_validate_rejects_missing_model() {
        let config = model_config(PathBuf::from("./does_not_exist"), "missing.onnx");
        let err = config.validate().unwrap_err();
        assert!(err.contains("Model file not found"));
    }

    #[test]
    fn test_validate_accepts_existing_file() {
        let dir = std::env::temp_dir().join("eye_guardian_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("model.onnx"), b"stub").unwrap();

        let config = model_config(dir, "model.onnx");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_threads() {
        let dir = std::env::temp_dir().join("eye_guardian_config_threads_test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("model.onnx"), b"stub").unwrap();

        let mut config = model_config(dir, "model.onnx");
        config.intra_threads = 0;
        assert!(config.validate().is_err());
    }
}
