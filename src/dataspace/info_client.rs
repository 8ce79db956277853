/// Authenticated client for data space and hub info endpoints
///
/// Every call mints a fresh bearer token for the specific audience the
/// endpoint belongs to; tokens are never reused across audiences.
use crate::{
    error::{ConnectorError, ConnectorResult},
    identity::IdentityService,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Info a data space publishes about itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSpaceInfo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "participantCount", default)]
    pub participant_count: u32,
    #[serde(rename = "isRestricted", default)]
    pub is_restricted: bool,
    #[serde(rename = "participantDIDs", default)]
    pub participant_dids: Vec<String>,
}

/// Wire shape of a hub's connector list
#[derive(Debug, Deserialize)]
struct HubConnectorsResponse {
    #[serde(rename = "data")]
    connectors: Vec<String>,
}

pub struct HubInfoClient {
    http_client: reqwest::Client,
    identity: Arc<IdentityService>,
}

impl HubInfoClient {
    pub fn new(identity: Arc<IdentityService>, timeout: Duration) -> ConnectorResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ConnectorError::Internal(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            identity,
        })
    }

    /// Fetch a data space's declared info from its DataSpaceInfo service
    pub async fn get_data_space_info(
        &self,
        endpoint: &str,
        audience: &str,
    ) -> ConnectorResult<DataSpaceInfo> {
        let body = self.authenticated_get(endpoint, audience).await?;

        serde_json::from_str(&body).map_err(|e| {
            ConnectorError::InfoEndpoint(format!(
                "DataSpaceInfo service returned unexpected response: {}",
                e
            ))
        })
    }

    /// Fetch the connector DIDs a hub vouches for
    pub async fn get_hub_connectors(
        &self,
        endpoint: &str,
        audience: &str,
    ) -> ConnectorResult<Vec<String>> {
        let body = self.authenticated_get(endpoint, audience).await?;

        let response: HubConnectorsResponse = serde_json::from_str(&body).map_err(|e| {
            ConnectorError::InfoEndpoint(format!(
                "Connectors service returned unexpected response: {}",
                e
            ))
        })?;

        Ok(response.connectors)
    }

    async fn authenticated_get(&self, endpoint: &str, audience: &str) -> ConnectorResult<String> {
        let token = self.identity.mint_token(audience)?;

        let response = self
            .http_client
            .get(endpoint)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                ConnectorError::InfoEndpoint(format!("Error calling {}: {}", endpoint, e))
            })?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(ConnectorError::InfoEndpoint(format!(
                "{} returned status code {}",
                endpoint,
                response.status()
            )));
        }

        response.text().await.map_err(|e| {
            ConnectorError::InfoEndpoint(format!("Error reading response from {}: {}", endpoint, e))
        })
    }
}
