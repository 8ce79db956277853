/// Verified-membership attributes for authenticated callers
///
/// Invoked once per authenticated request. For every data space this
/// connector has itself joined, the caller's membership is resolved and
/// the verified subset is published as a single `;`-joined attribute for
/// policy evaluation. Fail-closed: any repository failure produces an
/// empty attribute set.
use crate::{dataspace::DataSpaceService, identity::ClaimToken};
use std::collections::HashMap;
use std::sync::Arc;

/// Attribute key the verified memberships are published under
pub const SPACE_MEMBERSHIPS_ATTRIBUTE: &str = "spaceMemberships";

/// Delimiter joining the verified data space DIDs
pub const MEMBERSHIP_DELIMITER: &str = ";";

pub struct MembershipAttributeProvider {
    dataspace_service: Arc<DataSpaceService>,
}

impl MembershipAttributeProvider {
    pub fn new(dataspace_service: Arc<DataSpaceService>) -> Self {
        Self { dataspace_service }
    }

    /// Compute the attribute set for an already-verified caller
    pub async fn attributes_for(&self, claim_token: &ClaimToken) -> HashMap<String, String> {
        let mut attributes = HashMap::new();

        let Some(caller_did) = claim_token.client_id().filter(|did| !did.is_empty()) else {
            tracing::debug!("no caller identity in claims, returning no attributes");
            return attributes;
        };

        let memberships = match self.dataspace_service.memberships().await {
            Ok(memberships) => memberships,
            Err(e) => {
                tracing::warn!("failed to read own data space memberships: {}", e);
                return attributes;
            }
        };

        let mut verified = Vec::new();
        for data_space_did in &memberships {
            if self.dataspace_service.is_member(caller_did, data_space_did).await {
                tracing::debug!(caller_did, %data_space_did, "caller membership verified");
                verified.push(data_space_did.clone());
            } else {
                tracing::debug!(caller_did, %data_space_did, "caller is not a member");
            }
        }

        attributes.insert(
            SPACE_MEMBERSHIPS_ATTRIBUTE.to_string(),
            verified.join(MEMBERSHIP_DELIMITER),
        );

        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConnectorConfig, OrganizationConfig};
    use crate::dataspace::{HubInfoClient, MembershipRepository};
    use crate::identity::{
        DidWebResolver, FileSecretStore, IdentityService, CLIENT_ID_CLAIM,
    };
    use serde_json::json;
    use std::time::Duration;
    use tempfile::tempdir;

    fn claims_for(did: &str) -> ClaimToken {
        let mut claims = HashMap::new();
        claims.insert(CLIENT_ID_CLAIM.to_string(), did.to_string());
        ClaimToken { claims }
    }

    async fn provider_with_repo(
        dir: &tempfile::TempDir,
    ) -> (MembershipAttributeProvider, Arc<MembershipRepository>) {
        let store = FileSecretStore::new(dir.path().join("secrets.json")).await.unwrap();
        let resolver = Arc::new(DidWebResolver::new(false, Duration::from_secs(2)).unwrap());
        let config = ConnectorConfig {
            hostname: "connector.example".to_string(),
            did_document_path: "/".to_string(),
            did: "did:web:connector.example".to_string(),
            key_pair_id: "connector-keypair".to_string(),
            organization: OrganizationConfig {
                name: "Example Org".to_string(),
                description: "Test connector".to_string(),
                website: "https://example.org".to_string(),
            },
            dsp_callback_address: "https://connector.example/dsp".to_string(),
            did_web_use_https: false,
            membership_file: dir.path().join("space-memberships.txt"),
            secret_store_file: dir.path().join("secrets.json"),
            port: 8585,
            http_timeout_secs: 2,
        };
        let identity = Arc::new(
            IdentityService::new(&config, &store, Arc::clone(&resolver))
                .await
                .unwrap(),
        );
        let info_client =
            Arc::new(HubInfoClient::new(identity, Duration::from_secs(2)).unwrap());
        let repository = Arc::new(
            MembershipRepository::new(dir.path().join("space-memberships.txt"))
                .await
                .unwrap(),
        );
        let dataspace_service = Arc::new(DataSpaceService::new(
            resolver,
            info_client,
            Arc::clone(&repository),
        ));
        (
            MembershipAttributeProvider::new(dataspace_service),
            repository,
        )
    }

    #[tokio::test]
    async fn test_missing_caller_identity_yields_empty_attributes() {
        let dir = tempdir().unwrap();
        let (provider, _repo) = provider_with_repo(&dir).await;

        let attributes = provider.attributes_for(&ClaimToken::default()).await;
        assert!(attributes.is_empty());
    }

    #[tokio::test]
    async fn test_only_verified_memberships_are_published() {
        let dir = tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        let host_did = format!("did:web:{}", server.host_with_port().replace(':', "%3A"));
        let member_space = format!("{}:memberspace", host_did);
        let other_space = format!("{}:otherspace", host_did);
        let alice = "did:web:alice.example";

        // memberspace lists alice directly; otherspace never resolves
        server
            .mock("GET", "/memberspace/did.json")
            .with_status(200)
            .with_body(
                json!({
                    "id": member_space.clone(),
                    "verificationMethod": [],
                    "service": [{
                        "id": format!("{}#DataSpaceInfo", member_space),
                        "type": "DataSpaceInfoService",
                        "serviceEndpoint": format!("{}/ds-info", server.url())
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/ds-info")
            .with_status(200)
            .with_body(
                json!({
                    "title": "Member Space",
                    "description": "",
                    "participantCount": 1,
                    "isRestricted": false,
                    "participantDIDs": [alice]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let (provider, repo) = provider_with_repo(&dir).await;
        repo.add(&member_space).await.unwrap();
        repo.add(&other_space).await.unwrap();

        let attributes = provider.attributes_for(&claims_for(alice)).await;
        assert_eq!(
            attributes.get(SPACE_MEMBERSHIPS_ATTRIBUTE),
            Some(&member_space)
        );
    }
}
