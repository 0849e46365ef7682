//! Configuration for the Textract client

use serde::Deserialize;
use std::env;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_VERSION: &str = "latest";

#[derive(Debug, Clone, Deserialize)]
pub struct TextractConfig {
    pub region: String,
    /// API version; the Rust SDK only understands `latest`
    pub version: String,
    pub credentials: Option<CredentialsConfig>,
    /// Endpoint override (LocalStack and other emulators)
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsConfig {
    pub key: String,
    pub secret: String,
}

impl Default for TextractConfig {
    fn default() -> Self {
        TextractConfig {
            region: DEFAULT_REGION.to_string(),
            version: DEFAULT_VERSION.to_string(),
            credentials: None,
            endpoint: None,
        }
    }
}

impl TextractConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Empty values count as unset. Credentials are only used when both the
    /// key and the secret are present; otherwise the SDK's default provider
    /// chain applies.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let credentials = match (var("AWS_ACCESS_KEY_ID"), var("AWS_SECRET_ACCESS_KEY")) {
            (Some(key), Some(secret)) => Some(CredentialsConfig { key, secret }),
            _ => None,
        };

        TextractConfig {
            region: var("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            version: var("AWS_TEXTRACT_VERSION").unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            credentials,
            endpoint: var("AWS_TEXTRACT_ENDPOINT"),
        }
    }
}
