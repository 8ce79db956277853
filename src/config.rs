/// Configuration management for the data space connector
use crate::error::{ConnectorError, ConnectorResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// FQDN the connector is reachable under
    pub hostname: String,
    /// Base path the DID document is served from ("/" for the web root)
    pub did_document_path: String,
    /// The connector's own DID; cross-checked against the DID derived from
    /// hostname + document path at startup
    pub did: String,
    /// Secret store key the connector's key pair is persisted under
    pub key_pair_id: String,
    /// Organization descriptor served by the self-description endpoint
    pub organization: OrganizationConfig,
    /// Base URL of the connector's protocol callback endpoint
    pub dsp_callback_address: String,
    /// Resolve did:web documents over https (false only for local setups)
    pub did_web_use_https: bool,
    /// Line-oriented file holding the subscribed data space DIDs
    pub membership_file: PathBuf,
    /// JSON file backing the secret store
    pub secret_store_file: PathBuf,
    /// Port the management/DID API listens on
    pub port: u16,
    /// Timeout for outbound DID resolution and info endpoint calls
    pub http_timeout_secs: u64,
}

/// Organization info published under /organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationConfig {
    pub name: String,
    pub description: String,
    pub website: String,
}

impl ConnectorConfig {
    /// Load configuration from environment variables (and .env if present)
    pub fn from_env() -> ConnectorResult<Self> {
        dotenv::dotenv().ok();

        let hostname = require_env("CONNECTOR_HOSTNAME")?;
        let did_document_path =
            env::var("DID_DOCUMENT_PATH").unwrap_or_else(|_| "/".to_string());
        let did = require_env("CONNECTOR_DID")?;
        let key_pair_id = require_env("KEY_PAIR_ID")?;

        let organization = OrganizationConfig {
            name: require_env("ORGANIZATION_NAME")?,
            description: require_env("ORGANIZATION_DESCRIPTION")?,
            website: require_env("ORGANIZATION_WEBSITE")?,
        };

        let dsp_callback_address = require_env("DSP_CALLBACK_ADDRESS")?;

        let did_web_use_https = env::var("DID_WEB_USE_HTTPS")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .map_err(|_| {
                ConnectorError::Config("DID_WEB_USE_HTTPS must be true or false".to_string())
            })?;

        let membership_file: PathBuf = env::var("MEMBERSHIP_FILE")
            .unwrap_or_else(|_| "./data/space-memberships.txt".to_string())
            .into();
        let secret_store_file: PathBuf = env::var("SECRET_STORE_FILE")
            .unwrap_or_else(|_| "./data/secrets.json".to_string())
            .into();

        let port = env::var("CONNECTOR_PORT")
            .unwrap_or_else(|_| "8585".to_string())
            .parse()
            .map_err(|_| ConnectorError::Config("Invalid port number".to_string()))?;

        let http_timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConnectorError::Config("Invalid HTTP timeout".to_string()))?;

        let config = Self {
            hostname,
            did_document_path,
            did,
            key_pair_id,
            organization,
            dsp_callback_address,
            did_web_use_https,
            membership_file,
            secret_store_file,
            port,
            http_timeout_secs,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration invariants that must hold before serving traffic
    pub fn validate(&self) -> ConnectorResult<()> {
        if self.hostname.is_empty() {
            return Err(ConnectorError::Config("hostname must not be empty".to_string()));
        }
        if !self.did.starts_with("did:web:") {
            return Err(ConnectorError::Config(format!(
                "connector DID must use the web method, got {}",
                self.did
            )));
        }
        if !self.did_document_path.starts_with('/') {
            return Err(ConnectorError::Config(
                "DID document path must start with '/'".to_string(),
            ));
        }
        if self.http_timeout_secs == 0 {
            return Err(ConnectorError::Config(
                "HTTP timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

fn require_env(name: &str) -> ConnectorResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConnectorError::Config(format!(
            "{} needs to be defined as a config variable",
            name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ConnectorConfig {
        ConnectorConfig {
            hostname: "connector.example".to_string(),
            did_document_path: "/".to_string(),
            did: "did:web:connector.example".to_string(),
            key_pair_id: "connector-keypair".to_string(),
            organization: OrganizationConfig {
                name: "Example Org".to_string(),
                description: "An example connector operator".to_string(),
                website: "https://example.org".to_string(),
            },
            dsp_callback_address: "https://connector.example/dsp".to_string(),
            did_web_use_https: true,
            membership_file: "./data/space-memberships.txt".into(),
            secret_store_file: "./data/secrets.json".into(),
            port: 8585,
            http_timeout_secs: 10,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_non_web_did_rejected() {
        let mut config = test_config();
        config.did = "did:key:z6Mk".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = test_config();
        config.http_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
