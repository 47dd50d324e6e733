use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub node: NodeConfig,
    pub store: StoreConfig,
    /// Enables dangerous operations like purge. Must never be true in production.
    pub test_mode: bool,
    /// Maximum upload size in bytes
    pub max_upload_size: u64,
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_address: String,
    /// Directory holding the orphan journal
    pub data_dir: String,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    /// Path of the document-creation endpoint
    pub documents_path: String,
    /// Bearer token sent with every backend request, if set
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Bucket name, used only to build canonical URLs
    pub bucket: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            documents_path: "/documents".to_string(),
            token: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        let defaults = BackendConfig::default();
        let base_url = std::env::var("BACKEND_URL").unwrap_or(defaults.base_url);
        let documents_path = std::env::var("DOCUMENTS_PATH").unwrap_or(defaults.documents_path);
        let token = std::env::var("BACKEND_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let bucket = std::env::var("AWS_S3_BUCKET_NAME").unwrap_or_default();

        let test_mode = std::env::var("TEST_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(50 * 1024 * 1024); // 50MB

        let config = Config {
            backend: BackendConfig {
                base_url,
                documents_path,
                token,
            },
            node: NodeConfig {
                bind_address,
                data_dir,
            },
            store: StoreConfig { bucket },
            test_mode,
            max_upload_size,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.bucket.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "AWS_S3_BUCKET_NAME is required".to_string(),
            ));
        }

        if reqwest::Url::parse(&self.backend.base_url).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "BACKEND_URL '{}' is not a valid URL",
                self.backend.base_url
            )));
        }

        if !self.backend.documents_path.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "DOCUMENTS_PATH must start with '/'".to_string(),
            ));
        }

        if self.backend.token.is_none() {
            tracing::warn!("BACKEND_TOKEN is not set; backend requests are unauthenticated");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            backend: BackendConfig::default(),
            node: NodeConfig {
                bind_address: "127.0.0.1:0".to_string(),
                data_dir: "./data".to_string(),
            },
            store: StoreConfig {
                bucket: "team-docs".to_string(),
            },
            test_mode: false,
            max_upload_size: 1024,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_bucket_is_required() {
        let mut config = valid();
        config.store.bucket = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_url_must_parse() {
        let mut config = valid();
        config.backend.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_documents_path_must_be_absolute() {
        let mut config = valid();
        config.backend.documents_path = "documents".to_string();
        assert!(config.validate().is_err());
    }
}
