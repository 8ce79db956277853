/// did:web identifier to document URL mapping and HTTP resolution
use crate::{
    error::{ConnectorError, ConnectorResult},
    identity::document::DidDocument,
};
use std::time::Duration;

const DID_WEB_PREFIX: &str = "did:web:";

/// Map a did:web identifier to the URL its document is published under
///
/// `did:web:example.com` -> `https://example.com/.well-known/did.json`
/// `did:web:example.com:user:alice` -> `https://example.com/user/alice/did.json`
///
/// Percent-encoded segments are decoded, which is how did:web carries a
/// port (`did:web:localhost%3A8585`).
pub fn did_web_url(did: &str, use_https: bool) -> ConnectorResult<String> {
    let scheme = if use_https { "https" } else { "http" };

    let suffix = did.strip_prefix(DID_WEB_PREFIX).ok_or_else(|| {
        ConnectorError::DidResolution(format!(
            "the identifier must use the web DID method: {}",
            did
        ))
    })?;

    if suffix.is_empty() || suffix.ends_with(':') {
        return Err(ConnectorError::DidResolution(format!(
            "invalid did:web identifier: {}",
            did
        )));
    }

    let mut parts = suffix.split(':').map(|part| {
        urlencoding::decode(part).map(|decoded| decoded.into_owned()).map_err(|e| {
            ConnectorError::DidResolution(format!("invalid percent-encoding in {}: {}", did, e))
        })
    });

    let domain = parts.next().expect("split yields at least one part")?;
    let path_segments = parts.collect::<ConnectorResult<Vec<_>>>()?;

    let url = if path_segments.is_empty() {
        format!("{}://{}/.well-known/did.json", scheme, domain)
    } else {
        format!("{}://{}/{}/did.json", scheme, domain, path_segments.join("/"))
    };

    Ok(url)
}

/// HTTP resolver for did:web documents
///
/// This is the connector's only DID resolution capability; other DID
/// methods are out of scope.
#[derive(Clone)]
pub struct DidWebResolver {
    http_client: reqwest::Client,
    use_https: bool,
}

impl DidWebResolver {
    /// Create a resolver with a bounded request timeout
    pub fn new(use_https: bool, timeout: Duration) -> ConnectorResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ConnectorError::Internal(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            use_https,
        })
    }

    /// Fetch and parse the DID document published for `did`
    pub async fn resolve(&self, did: &str) -> ConnectorResult<DidDocument> {
        let url = did_web_url(did, self.use_https)?;

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            ConnectorError::DidResolution(format!("Failed to fetch document for {}: {}", did, e))
        })?;

        if !response.status().is_success() {
            return Err(ConnectorError::DidResolution(format!(
                "did:web server returned {} for {}",
                response.status(),
                did
            )));
        }

        let doc: DidDocument = response.json().await.map_err(|e| {
            ConnectorError::DidResolution(format!("Invalid DID document for {}: {}", did, e))
        })?;

        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_host_maps_to_well_known() {
        let url = did_web_url("did:web:connector.example", true).unwrap();
        assert_eq!(url, "https://connector.example/.well-known/did.json");
    }

    #[test]
    fn test_host_with_path_maps_to_path_document() {
        let url = did_web_url("did:web:connector.example:iam:alice", true).unwrap();
        assert_eq!(url, "https://connector.example/iam/alice/did.json");
    }

    #[test]
    fn test_percent_encoded_port_is_decoded() {
        let url = did_web_url("did:web:localhost%3A8585", false).unwrap();
        assert_eq!(url, "http://localhost:8585/.well-known/did.json");
    }

    #[test]
    fn test_http_scheme_flag() {
        let url = did_web_url("did:web:connector.example", false).unwrap();
        assert!(url.starts_with("http://"));
    }

    #[test]
    fn test_other_did_methods_are_rejected() {
        assert!(did_web_url("did:key:z6MkhaXgBZD", true).is_err());
        assert!(did_web_url("https://connector.example", true).is_err());
    }

    #[test]
    fn test_trailing_colon_is_rejected() {
        assert!(did_web_url("did:web:connector.example:", true).is_err());
    }

    #[tokio::test]
    async fn test_resolve_fetches_published_document() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/.well-known/did.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "id": "did:web:ds.example",
                    "verificationMethod": [],
                    "service": []
                })
                .to_string(),
            )
            .create_async()
            .await;

        let did = format!("did:web:{}", server.host_with_port().replace(':', "%3A"));
        let resolver = DidWebResolver::new(false, Duration::from_secs(2)).unwrap();
        let doc = resolver.resolve(&did).await.unwrap();

        assert_eq!(doc.id, "did:web:ds.example");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_resolve_non_200_is_a_resolution_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/.well-known/did.json")
            .with_status(404)
            .create_async()
            .await;

        let did = format!("did:web:{}", server.host_with_port().replace(':', "%3A"));
        let resolver = DidWebResolver::new(false, Duration::from_secs(2)).unwrap();

        assert!(resolver.resolve(&did).await.is_err());
    }
}
