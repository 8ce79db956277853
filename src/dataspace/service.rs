/// Data space membership resolution
///
/// Implements the two-hop delegation trust algorithm: a data space lists
/// hubs (or self-sovereign connectors) as participants, a hub vouches for
/// its own connectors, and the hub's vouching is itself verified against
/// the hub's published connector list. All membership decisions are
/// closed-world and fail-closed: any resolution failure along the chain is
/// a conclusive `false`, never an error.
use crate::{
    dataspace::{info_client::HubInfoClient, membership::MembershipRepository},
    error::{ConnectorError, ConnectorResult},
    identity::DidWebResolver,
};
use serde::Serialize;
use std::sync::Arc;

/// Service id suffix a data space uses to declare its info endpoint
pub const DS_INFO_SVC_SUFFIX: &str = "#DataSpaceInfo";
/// Service id suffix a hub uses to declare its connector list endpoint
pub const CONNECTORS_SVC_SUFFIX: &str = "#ConnectorsEndpoint";

/// A data space with hubs expanded into their member connectors
#[derive(Debug, Clone, Serialize)]
pub struct DataSpaceView {
    pub title: String,
    pub description: String,
    #[serde(rename = "isRestricted")]
    pub is_restricted: bool,
    #[serde(rename = "participantConnectorDIDs")]
    pub participant_connector_dids: Vec<String>,
}

pub struct DataSpaceService {
    resolver: Arc<DidWebResolver>,
    info_client: Arc<HubInfoClient>,
    repository: Arc<MembershipRepository>,
}

impl DataSpaceService {
    pub fn new(
        resolver: Arc<DidWebResolver>,
        info_client: Arc<HubInfoClient>,
        repository: Arc<MembershipRepository>,
    ) -> Self {
        Self {
            resolver,
            info_client,
            repository,
        }
    }

    /// The participant DIDs a data space declares, fetched from its
    /// DataSpaceInfo service. Failures propagate to the caller.
    pub async fn participant_list(&self, data_space_did: &str) -> ConnectorResult<Vec<String>> {
        let document = self.resolver.resolve(data_space_did).await?;

        let service_id = format!("{}{}", data_space_did, DS_INFO_SVC_SUFFIX);
        let service = document.find_service(&service_id).ok_or_else(|| {
            ConnectorError::NotFound(format!(
                "no DataSpaceInfo service found in DID document for {}",
                data_space_did
            ))
        })?;

        let info = self
            .info_client
            .get_data_space_info(&service.service_endpoint, data_space_did)
            .await?;

        Ok(info.participant_dids)
    }

    /// Decide whether `connector_did` is a verified member of
    /// `data_space_did`
    ///
    /// A connector is a member when it appears directly in the data
    /// space's participant list, or when its controlling hub both vouches
    /// for it and is itself a participant. Never errors; any failure along
    /// the chain denies membership.
    pub async fn is_member(&self, connector_did: &str, data_space_did: &str) -> bool {
        let participants = match self.participant_list(data_space_did).await {
            Ok(participants) => participants,
            Err(e) => {
                tracing::debug!(data_space_did, "failed to get participant list: {}", e);
                return false;
            }
        };

        if participants.iter().any(|p| p == connector_did) {
            tracing::debug!(connector_did, data_space_did, "connector is a direct participant");
            return true;
        }

        let connector_document = match self.resolver.resolve(connector_did).await {
            Ok(document) => document,
            Err(e) => {
                tracing::debug!(connector_did, "failed to resolve connector document: {}", e);
                return false;
            }
        };

        let Some(controller) = connector_document.first_controller() else {
            tracing::debug!(connector_did, "connector declares no controller, check is conclusive");
            return false;
        };

        if controller == connector_did {
            // Self-controlled: the direct participant check above was
            // authoritative and already failed
            tracing::debug!(connector_did, "connector is its own controller, not a member");
            return false;
        }

        let controller = controller.to_string();
        let controller_document = match self.resolver.resolve(&controller).await {
            Ok(document) => document,
            Err(e) => {
                tracing::debug!(%controller, "failed to resolve controller document: {}", e);
                return false;
            }
        };

        let service_id = format!("{}{}", controller_document.id, CONNECTORS_SVC_SUFFIX);
        let Some(connectors_service) = controller_document.find_service(&service_id) else {
            tracing::debug!(%controller, "no connectors service found in controller document");
            return false;
        };

        let hub_connectors = match self
            .info_client
            .get_hub_connectors(&connectors_service.service_endpoint, &controller_document.id)
            .await
        {
            Ok(connectors) => connectors,
            Err(e) => {
                tracing::debug!(%controller, "failed to fetch hub connector list: {}", e);
                return false;
            }
        };

        // The hub must vouch for the connector; an untrusted hub cannot
        // claim unrelated members
        if !hub_connectors.iter().any(|c| c == connector_did) {
            tracing::debug!(
                connector_did,
                %controller,
                "hub does not vouch for this connector"
            );
            return false;
        }

        // And the hub itself must be a data space participant
        let hub_is_participant = participants.iter().any(|p| p == &controller_document.id);
        tracing::debug!(
            connector_did,
            data_space_did,
            %controller,
            hub_is_participant,
            "hub delegation chain evaluated"
        );
        hub_is_participant
    }

    /// Resolve a data space to its declared info with hubs expanded into
    /// their member connectors; participants that fail to resolve or
    /// expand are skipped
    pub async fn data_space_view(&self, data_space_did: &str) -> ConnectorResult<DataSpaceView> {
        let document = self.resolver.resolve(data_space_did).await?;

        let service_id = format!("{}{}", data_space_did, DS_INFO_SVC_SUFFIX);
        let service = document.find_service(&service_id).ok_or_else(|| {
            ConnectorError::NotFound(format!(
                "no DataSpaceInfo service found in DID document for {}",
                data_space_did
            ))
        })?;

        let info = self
            .info_client
            .get_data_space_info(&service.service_endpoint, data_space_did)
            .await?;

        let mut participant_connector_dids = Vec::new();
        for participant_did in &info.participant_dids {
            let participant_document = match self.resolver.resolve(participant_did).await {
                Ok(document) => document,
                Err(e) => {
                    tracing::debug!(%participant_did, "skipping unresolvable participant: {}", e);
                    continue;
                }
            };

            let connectors_service_id = format!("{}{}", participant_did, CONNECTORS_SVC_SUFFIX);
            match participant_document.find_service(&connectors_service_id) {
                Some(connectors_service) => {
                    match self
                        .info_client
                        .get_hub_connectors(&connectors_service.service_endpoint, participant_did)
                        .await
                    {
                        Ok(connectors) => participant_connector_dids.extend(connectors),
                        Err(e) => {
                            tracing::debug!(%participant_did, "skipping unreachable hub: {}", e);
                        }
                    }
                }
                None => participant_connector_dids.push(participant_did.clone()),
            }
        }

        Ok(DataSpaceView {
            title: info.title,
            description: info.description,
            is_restricted: info.is_restricted,
            participant_connector_dids,
        })
    }

    /// The data spaces this connector has joined
    pub async fn memberships(&self) -> ConnectorResult<Vec<String>> {
        self.repository.list().await
    }

    pub async fn add_membership(&self, did: &str) -> ConnectorResult<()> {
        self.repository.add(did).await
    }

    pub async fn remove_membership(&self, did: &str) -> ConnectorResult<()> {
        self.repository.remove(did).await
    }

    pub async fn clear_memberships(&self) -> ConnectorResult<()> {
        self.repository.clear().await
    }
}
