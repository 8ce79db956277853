/// Application context and dependency injection
use crate::{
    config::ConnectorConfig,
    dataspace::{DataSpaceService, HubInfoClient, MembershipRepository},
    error::ConnectorResult,
    identity::{DidWebResolver, FileSecretStore, IdentityService},
    policy::MembershipAttributeProvider,
};
use std::sync::Arc;
use std::time::Duration;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ConnectorConfig>,
    pub identity: Arc<IdentityService>,
    pub dataspace: Arc<DataSpaceService>,
    /// Pulled by the host runtime's participant agent layer to attach
    /// verified memberships to inbound request contexts
    pub attributes: Arc<MembershipAttributeProvider>,
}

impl AppContext {
    /// Create a new application context from configuration
    ///
    /// Fails fast on any configuration or key material problem; the
    /// process must not serve traffic with a partial identity.
    pub async fn new(config: ConnectorConfig) -> ConnectorResult<Self> {
        config.validate()?;

        let timeout = Duration::from_secs(config.http_timeout_secs);

        let secret_store = FileSecretStore::new(config.secret_store_file.clone()).await?;
        let resolver = Arc::new(DidWebResolver::new(config.did_web_use_https, timeout)?);

        let identity = Arc::new(
            IdentityService::new(&config, &secret_store, Arc::clone(&resolver)).await?,
        );

        let info_client = Arc::new(HubInfoClient::new(Arc::clone(&identity), timeout)?);
        let repository = Arc::new(MembershipRepository::new(config.membership_file.clone()).await?);

        let dataspace = Arc::new(DataSpaceService::new(
            resolver,
            info_client,
            repository,
        ));

        let attributes = Arc::new(MembershipAttributeProvider::new(Arc::clone(&dataspace)));

        Ok(Self {
            config: Arc::new(config),
            identity,
            dataspace,
            attributes,
        })
    }
}
