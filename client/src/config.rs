use std::env;
use std::time::Duration;

use crate::error::ConfigError;
use crate::media::resolve_image_src;

pub const DEFAULT_COLLECTION: &str = "photos";

/// Where the collection API lives and how to reach it
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub collection: String,
    /// Base for relative storage paths; `None` leaves them as-is
    pub storage_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            collection: DEFAULT_COLLECTION.to_string(),
            storage_url: None,
            timeout: None,
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_storage_url(mut self, storage_url: impl Into<String>) -> Self {
        self.storage_url = Some(storage_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` but reads from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = non_empty("SHOWCASE_API_URL").ok_or(ConfigError::Missing("SHOWCASE_API_URL"))?;
        let mut config = Self::new(api_url);

        if let Some(collection) = non_empty("SHOWCASE_COLLECTION") {
            config.collection = collection;
        }
        config.storage_url = non_empty("SHOWCASE_STORAGE_URL");

        if let Some(raw) = non_empty("SHOWCASE_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                name: "SHOWCASE_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// `{api_url}/api/{collection}`
    pub fn collection_url(&self) -> String {
        format!(
            "{}/api/{}",
            self.api_url.trim_end_matches('/'),
            self.collection.trim_matches('/')
        )
    }

    /// Where to fetch a resource's image from, resolved against `storage_url`
    pub fn image_src(&self, url: &str) -> String {
        resolve_image_src(url, self.storage_url.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn api_url_is_required() {
        let err = config(&[("SHOWCASE_COLLECTION", "food")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SHOWCASE_API_URL")));
    }

    #[test]
    fn defaults_to_the_photos_collection() {
        let config = config(&[("SHOWCASE_API_URL", "http://localhost:3000")]).unwrap();
        assert_eq!(config.collection, DEFAULT_COLLECTION);
        assert_eq!(config.storage_url, None);
        assert_eq!(config.timeout, None);
        assert_eq!(config.collection_url(), "http://localhost:3000/api/photos");
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("SHOWCASE_API_URL", "https://api.example/"),
            ("SHOWCASE_COLLECTION", "food"),
            ("SHOWCASE_STORAGE_URL", "https://cdn.example/bucket"),
            ("SHOWCASE_TIMEOUT_SECS", "15"),
        ])
        .unwrap();
        assert_eq!(config.collection_url(), "https://api.example/api/food");
        assert_eq!(config.storage_url.as_deref(), Some("https://cdn.example/bucket"));
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn rejects_a_bad_timeout() {
        let err = config(&[
            ("SHOWCASE_API_URL", "http://localhost:3000"),
            ("SHOWCASE_TIMEOUT_SECS", "soon"),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid SHOWCASE_TIMEOUT_SECS: soon");
    }

    #[test]
    fn image_src_uses_the_storage_url() {
        let config = ClientConfig::new("https://api.example").with_storage_url("https://cdn.example/bucket/");
        assert_eq!(
            config.image_src("drive/1_a.jpg"),
            "https://cdn.example/bucket/drive/1_a.jpg"
        );
        assert_eq!(
            config.image_src("https://elsewhere.example/b.jpg"),
            "https://elsewhere.example/b.jpg"
        );

        let bare = ClientConfig::new("https://api.example");
        assert_eq!(bare.image_src("drive/1_a.jpg"), "drive/1_a.jpg");
    }
}
