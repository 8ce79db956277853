/// Data space connector trust core
///
/// Establishes trust between autonomous connectors via self-published
/// did:web identities, resolves data space membership through hub
/// delegation and feeds verified memberships into policy evaluation.
mod api;
mod config;
mod context;
mod dataspace;
mod error;
mod identity;
mod policy;
mod server;

use config::ConnectorConfig;
use context::AppContext;
use error::ConnectorResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ConnectorResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dataspace_connector=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; missing or inconsistent settings are fatal
    let config = ConnectorConfig::from_env()?;

    // Create application context (derives and checks the own DID, loads
    // or generates the key pair)
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}
