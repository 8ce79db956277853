/// Data space resolution and membership management endpoints
///
/// DIDs appear base64-encoded in path segments, since they contain
/// characters that do not survive as raw path elements.
use crate::{
    context::AppContext,
    dataspace::DataSpaceView,
    error::{ConnectorError, ConnectorResult},
};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

/// Request body for joining a data space
#[derive(Debug, Deserialize)]
pub struct DataSpaceMembershipRequest {
    #[serde(rename = "dataSpaceDID")]
    pub data_space_did: String,
}

/// Build data space routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/dataspaces/:did_base64", get(get_data_space))
        .route("/dataspaceMemberships", post(add_membership).get(list_memberships))
        .route("/dataspaceMemberships/:did_base64", delete(remove_membership))
}

/// GET /dataspaces/{didBase64}
///
/// Resolves the data space and returns its info with hubs expanded into
/// member connectors.
async fn get_data_space(
    State(ctx): State<AppContext>,
    Path(did_base64): Path<String>,
) -> ConnectorResult<Json<DataSpaceView>> {
    let did = decode_did(&did_base64)?;
    let view = ctx.dataspace.data_space_view(&did).await?;
    Ok(Json(view))
}

/// POST /dataspaceMemberships
async fn add_membership(
    State(ctx): State<AppContext>,
    Json(request): Json<DataSpaceMembershipRequest>,
) -> ConnectorResult<impl IntoResponse> {
    let did = request.data_space_did;
    tracing::debug!(%did, "adding data space membership");

    ctx.dataspace.add_membership(&did).await?;

    let location = format!("dataspaceMemberships/{}", encode_did(&did));
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]))
}

/// DELETE /dataspaceMemberships/{didBase64}
async fn remove_membership(
    State(ctx): State<AppContext>,
    Path(did_base64): Path<String>,
) -> ConnectorResult<StatusCode> {
    let did = decode_did(&did_base64)?;
    ctx.dataspace.remove_membership(&did).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /dataspaceMemberships
async fn list_memberships(State(ctx): State<AppContext>) -> ConnectorResult<Json<Vec<String>>> {
    let memberships = ctx.dataspace.memberships().await?;
    Ok(Json(memberships))
}

fn decode_did(did_base64: &str) -> ConnectorResult<String> {
    let bytes = STANDARD
        .decode(did_base64)
        .map_err(|e| ConnectorError::Validation(format!("invalid base64 DID: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| ConnectorError::Validation(format!("invalid DID encoding: {}", e)))
}

fn encode_did(did: &str) -> String {
    STANDARD.encode(did.as_bytes())
}
