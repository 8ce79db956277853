/// DID document and self-description endpoints
///
/// Serves the connector's own DID document at both locations did:web
/// resolvers look for it, plus the organization descriptor the document's
/// SelfDescriptionService points at.
use crate::{
    context::AppContext,
    error::ConnectorResult,
    identity::DidDocument,
};
use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;

/// Organization descriptor served under /organization
#[derive(Debug, Serialize)]
pub struct OrganizationInfo {
    #[serde(rename = "organizationName")]
    pub name: String,
    pub description: String,
    pub website: String,
}

/// Build well-known routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/did.json", get(did_document))
        .route("/.well-known/did.json", get(did_document))
        .route("/organization", get(organization))
}

/// GET /did.json and GET /.well-known/did.json
async fn did_document(State(ctx): State<AppContext>) -> ConnectorResult<Json<DidDocument>> {
    let document = ctx.identity.generate_document()?;
    Ok(Json(document))
}

/// GET /organization
async fn organization(State(ctx): State<AppContext>) -> Json<OrganizationInfo> {
    let organization = &ctx.config.organization;
    Json(OrganizationInfo {
        name: organization.name.clone(),
        description: organization.description.clone(),
        website: organization.website.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_info_field_names() {
        let info = OrganizationInfo {
            name: "Example Org".to_string(),
            description: "An example connector operator".to_string(),
            website: "https://example.org".to_string(),
        };

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["organizationName"], "Example Org");
        assert_eq!(json["website"], "https://example.org");
    }
}
