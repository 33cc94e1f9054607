use eye_guardian_inference::config::{ModelConfig, Validatable};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    pub model: ModelConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.try_into().map_err(serde::de::Error::custom)
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn get_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            other => Err(format!(
                "{} is not a supported minimum log level. Use either `debug` or `info`.",
                other
            )),
        }
    }
}

/// Reads `configuration/base.yaml`, the file named after `APP_ENVIRONMENT`,
/// then `EG_`-prefixed environment variables.
pub fn get_configuration() -> Result<Config, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("no current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let config = load_configuration(&configuration_directory, environment, true)?;

    if let Err(e) = config.model.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        return Err(config::ConfigError::Message(e));
    }

    Ok(config)
}

fn load_configuration(
    configuration_directory: &Path,
    environment: Environment,
    with_env_overrides: bool,
) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(format!("{}.yaml", environment.as_str())),
        ));

    if with_env_overrides {
        builder = builder.add_source(
            config::Environment::with_prefix("EG")
                .prefix_separator("_")
                .separator("__"),
        );
    }

    builder.build()?.try_deserialize::<Config>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_configuration(name: &str, base: &str, environment: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("eye_guardian_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("base.yaml"), base).unwrap();
        std::fs::write(dir.join("local.yaml"), environment).unwrap();
        dir
    }

    const BASE: &str = r#"
log_level: info
server:
  host: 0.0.0.0
  port: 8501
model:
  model_dir: models
  onnx_file: my_model2.onnx
"#;

    #[test]
    fn test_environment_file_overrides_base() {
        let dir = write_configuration(
            "layering",
            BASE,
            "log_level: debug\nserver:\n  host: 127.0.0.1\n",
        );

        let config = load_configuration(&dir, Environment::Local, false).unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.server.get_address(), "127.0.0.1:8501");
        assert_eq!(config.model.get_path(), PathBuf::from("models/my_model2.onnx"));
    }

    #[test]
    fn test_defaults_are_applied() {
        let dir = write_configuration("defaults", BASE, "{}\n");

        let config = load_configuration(&dir, Environment::Local, false).unwrap();

        assert_eq!(config.upload.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.model.intra_threads, 1);
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let dir = write_configuration("bad_level", BASE, "log_level: trace\n");

        let err = load_configuration(&dir, Environment::Local, false).unwrap_err();
        assert!(err.to_string().contains("not a supported minimum log level"));
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::try_from("PRODUCTION".to_string()),
            Ok(Environment::Production)
        );
        assert!(Environment::try_from("staging".to_string()).is_err());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::try_from("Info".to_string()), Ok(LogLevel::Info));
        assert_eq!(LogLevel::Debug.as_str(), "debug");
    }
}
