use std::env;
use std::path::PathBuf;

/// Backend address used when `BACKEND_API_URL` is not set
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Default upload budget: 10 MB
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Runtime configuration for the relay
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Inference backend base address, without a trailing slash
    pub backend_url: String,

    /// Private scratch directory for staged uploads (created on demand)
    pub staging_dir: PathBuf,

    /// Maximum accepted upload size in bytes (default: 10 MB)
    pub max_upload_size: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            staging_dir: default_staging_dir(),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
        }
    }
}

impl RelayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        Self {
            backend_url: lookup("BACKEND_API_URL")
                .map(|v| normalize_backend_url(&v))
                .filter(|v| !v.is_empty())
                .unwrap_or(default.backend_url),

            staging_dir: lookup("STAGING_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(default.staging_dir),

            max_upload_size: lookup("MAX_UPLOAD_SIZE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default.max_upload_size),
        }
    }

    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.backend_url)
    }
}

/// Strips surrounding whitespace and any trailing slashes.
pub fn normalize_backend_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn default_staging_dir() -> PathBuf {
    env::temp_dir().join("image-relay-staging")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = RelayConfig::from_lookup(|_| None);
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.max_upload_size, 10 * 1024 * 1024);
        assert!(config.staging_dir.ends_with("image-relay-staging"));
        assert_eq!(config.predict_url(), "http://localhost:8000/predict");
    }

    #[test]
    fn test_backend_url_trailing_slash_stripped() {
        let config = RelayConfig::from_lookup(lookup_from(&[(
            "BACKEND_API_URL",
            "https://inference.internal:9000/",
        )]));
        assert_eq!(config.backend_url, "https://inference.internal:9000");
        assert_eq!(
            config.predict_url(),
            "https://inference.internal:9000/predict"
        );
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = RelayConfig::from_lookup(lookup_from(&[
            ("BACKEND_API_URL", "  "),
            ("STAGING_DIR", ""),
            ("MAX_UPLOAD_SIZE", "lots"),
        ]));
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert!(config.staging_dir.ends_with("image-relay-staging"));
        assert_eq!(config.max_upload_size, DEFAULT_MAX_UPLOAD_SIZE);
    }

    #[test]
    fn test_overrides() {
        let config = RelayConfig::from_lookup(lookup_from(&[
            ("STAGING_DIR", "/var/lib/image-relay"),
            ("MAX_UPLOAD_SIZE", "2048"),
        ]));
        assert_eq!(config.staging_dir, PathBuf::from("/var/lib/image-relay"));
        assert_eq!(config.max_upload_size, 2048);
    }
}
