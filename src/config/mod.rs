use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::ffi::OsString;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub mod error;
pub use error::ConfigError;

/// Environment variable consulted when no model path is configured.
pub const MODEL_PATH_ENV: &str = "NEREUS_MODEL_PATH";

pub const MAX_CONFIDENCE_JITTER: f64 = 0.5;
pub const DEFAULT_JITTER_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    model_path: Option<PathBuf>,
    model_version: Option<String>,
    confidence_jitter: f64,
    jitter_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: None,
            model_version: None,
            confidence_jitter: 0.0,
            jitter_seed: DEFAULT_JITTER_SEED,
        }
    }
}

fn validate_jitter(value: f64) -> Result<f64, ConfigError> {
    if (0.0..=MAX_CONFIDENCE_JITTER).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Jitter {
            value,
            max: MAX_CONFIDENCE_JITTER,
        })
    }
}

// Every key is optional. Empty strings count as unset and the jitter amplitude is range checked.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct ConfigHelper {
            #[serde(default)]
            model_path: Option<String>,
            #[serde(default)]
            model_version: Option<String>,
            #[serde(default)]
            confidence_jitter: Option<f64>,
            #[serde(default)]
            jitter_seed: Option<u64>,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let confidence_jitter = validate_jitter(helper.confidence_jitter.unwrap_or(0.0))
            .map_err(D::Error::custom)?;

        Ok(Config {
            model_path: helper
                .model_path
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            model_version: helper.model_version.filter(|v| !v.trim().is_empty()),
            confidence_jitter,
            jitter_seed: helper.jitter_seed.unwrap_or(DEFAULT_JITTER_SEED),
        })
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn with_model_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        let path = path.into();
        self.model_path = (!path.as_os_str().is_empty()).then_some(path);
        self
    }

    pub fn with_confidence_jitter(
        mut self,
        amplitude: f64,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        self.confidence_jitter = validate_jitter(amplitude)?;
        self.jitter_seed = seed;
        Ok(self)
    }

    /// Fills the model path from `NEREUS_MODEL_PATH` when none is configured.
    pub fn with_env_overrides(self) -> Self {
        self.with_model_path_fallback(std::env::var_os(MODEL_PATH_ENV))
    }

    fn with_model_path_fallback(self, value: Option<OsString>) -> Self {
        match value {
            Some(path) if self.model_path.is_none() => self.with_model_path(path),
            _ => self,
        }
    }

    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    /// Version reported for a trained backend, overriding the one stored in the artifact.
    pub fn model_version(&self) -> Option<&str> {
        self.model_version.as_deref()
    }

    pub fn confidence_jitter(&self) -> f64 {
        self.confidence_jitter
    }

    pub fn jitter_seed(&self) -> u64 {
        self.jitter_seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.json");
        let mut file = File::create(&file_path).unwrap();

        let json_content = r#"
        {
            "model_path": "models/linear",
            "model_version": "bohai-2024",
            "confidence_jitter": 0.05,
            "jitter_seed": 7
        }
        "#;

        file.write_all(json_content.as_bytes()).unwrap();

        let config = Config::from_file(&file_path).unwrap();

        assert_eq!(config.model_path(), Some(Path::new("models/linear")));
        assert_eq!(config.model_version(), Some("bohai-2024"));
        assert_eq!(config.confidence_jitter(), 0.05);
        assert_eq!(config.jitter_seed(), 7);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.model_path(), None);
        assert_eq!(config.confidence_jitter(), 0.0);
    }

    #[test]
    fn test_blank_strings_are_unset() {
        let config: Config =
            serde_json::from_str(r#"{"model_path": " ", "model_version": ""}"#).unwrap();
        assert_eq!(config.model_path(), None);
        assert_eq!(config.model_version(), None);
    }

    #[test]
    fn test_jitter_out_of_range() {
        for bad in ["-0.1", "0.6"] {
            let json = format!(r#"{{"confidence_jitter": {}}}"#, bad);
            let err = serde_json::from_str::<Config>(&json).unwrap_err();
            assert!(err.to_string().contains("confidence_jitter"), "{}", err);
        }

        assert!(Config::default().with_confidence_jitter(0.7, 1).is_err());
        assert!(Config::default().with_confidence_jitter(0.5, 1).is_ok());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.json");
        std::fs::write(&file_path, r#"{"model_pth": "typo"}"#).unwrap();

        assert!(matches!(
            Config::from_file(&file_path),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_file("/nonexistent/config.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_env_fallback_only_fills_missing_path() {
        let config = Config::default().with_model_path_fallback(Some("env/model".into()));
        assert_eq!(config.model_path(), Some(Path::new("env/model")));

        let config = Config::default()
            .with_model_path("cli/model")
            .with_model_path_fallback(Some("env/model".into()));
        assert_eq!(config.model_path(), Some(Path::new("cli/model")));

        let config = Config::default().with_model_path_fallback(Some("".into()));
        assert_eq!(config.model_path(), None);

        let config = Config::default().with_model_path_fallback(None);
        assert_eq!(config.model_path(), None);
    }
}
