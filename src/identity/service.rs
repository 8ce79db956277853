/// Identity backed by a did:web DID
///
/// Owns the connector's key pair and DID, mints ES256 bearer tokens for
/// outbound calls and verifies inbound tokens against the issuer's
/// published DID document.
use crate::{
    config::ConnectorConfig,
    error::{ConnectorError, ConnectorResult},
    identity::{
        did_web::{did_web_url, DidWebResolver},
        document::{DidDocument, Service, VerificationMethod},
        keys::{ensure_key_pair, KeyPair, SecretStore},
    },
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Claim key carrying the verified caller identity
pub const CLIENT_ID_CLAIM: &str = "client_id";

/// Token validity window; tokens are minted fresh per outbound call
const TOKEN_VALIDITY_SECS: i64 = 300;

/// Claims carried by a connector bearer token
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    iss: String,
    sub: String,
    aud: String,
    iat: i64,
    exp: i64,
}

/// Verified claims extracted from an inbound token
#[derive(Debug, Clone, Default)]
pub struct ClaimToken {
    pub claims: HashMap<String, String>,
}

impl ClaimToken {
    /// The verified caller DID, if present
    pub fn client_id(&self) -> Option<&str> {
        self.claims.get(CLIENT_ID_CLAIM).map(|s| s.as_str())
    }
}

/// Derive the connector's did:web identifier from its hostname and the
/// path the DID document is served under
pub fn derive_did_web(hostname: &str, did_document_path: &str) -> String {
    if did_document_path == "/" {
        return format!("did:web:{}", hostname);
    }

    let mut did = format!("did:web:{}{}", hostname, did_document_path.replace('/', ":"));
    if did.ends_with(':') {
        did.pop();
    }
    did
}

/// The connector's own identity service
pub struct IdentityService {
    identity: String,
    key_pair: KeyPair,
    encoding_key: EncodingKey,
    resolver: Arc<DidWebResolver>,
    dsp_callback_address: String,
    use_https: bool,
}

impl IdentityService {
    /// Construct the identity service
    ///
    /// Derives the own DID, asserts it matches the configured one (a
    /// mismatch is a fatal misconfiguration) and ensures a key pair exists
    /// in the secret store.
    pub async fn new(
        config: &ConnectorConfig,
        secret_store: &dyn SecretStore,
        resolver: Arc<DidWebResolver>,
    ) -> ConnectorResult<Self> {
        let identity = derive_did_web(&config.hostname, &config.did_document_path);
        if identity != config.did {
            return Err(ConnectorError::Config(format!(
                "configured connector DID {} differs from derived DID {}",
                config.did, identity
            )));
        }

        let key_pair = ensure_key_pair(secret_store, &config.key_pair_id).await?;
        let encoding_key = EncodingKey::from_ec_pem(key_pair.signing_key_pem()?.as_bytes())
            .map_err(|e| ConnectorError::KeyStore(format!("Unusable signing key: {}", e)))?;

        tracing::info!(%identity, "identity loaded");

        Ok(Self {
            identity,
            key_pair,
            encoding_key,
            resolver,
            dsp_callback_address: config.dsp_callback_address.clone(),
            use_https: config.did_web_use_https,
        })
    }

    /// The connector's own DID
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Mint a bearer token for the given audience, signed with the own
    /// private key (iss = sub = own DID)
    pub fn mint_token(&self, audience: &str) -> ConnectorResult<String> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            iss: self.identity.clone(),
            sub: self.identity.clone(),
            aud: audience.to_string(),
            iat: now,
            exp: now + TOKEN_VALIDITY_SECS,
        };

        encode(&Header::new(Algorithm::ES256), &claims, &self.encoding_key)
            .map_err(|e| ConnectorError::TokenMinting(format!("Failed to sign token: {}", e)))
    }

    /// Verify an inbound bearer token
    ///
    /// Resolves the issuer's DID document, takes the first verification
    /// method of an allowed type and checks signature, audience and expiry.
    /// All failure paths collapse into the same uniform error; the cause is
    /// only logged.
    pub async fn verify_token(
        &self,
        token: &str,
        expected_audience: &str,
    ) -> ConnectorResult<ClaimToken> {
        let issuer = match read_unverified_issuer(token) {
            Ok(issuer) => issuer,
            Err(e) => {
                tracing::debug!("token rejected: unparseable token: {}", e);
                return Err(ConnectorError::TokenVerification);
            }
        };

        let document = match self.resolver.resolve(&issuer).await {
            Ok(document) => document,
            Err(e) => {
                tracing::debug!(%issuer, "token rejected: issuer DID not resolvable: {}", e);
                return Err(ConnectorError::TokenVerification);
            }
        };

        let jwk = match document
            .first_allowed_verification_method()
            .and_then(|vm| vm.public_key_jwk.as_ref())
        {
            Some(jwk) => jwk,
            None => {
                tracing::debug!(%issuer, "token rejected: no usable verification method");
                return Err(ConnectorError::TokenVerification);
            }
        };

        let decoding_key = match DecodingKey::from_ec_components(&jwk.x, &jwk.y) {
            Ok(key) => key,
            Err(e) => {
                tracing::debug!(%issuer, "token rejected: unusable public key: {}", e);
                return Err(ConnectorError::TokenVerification);
            }
        };

        let mut validation = Validation::new(Algorithm::ES256);
        validation.set_audience(&[expected_audience]);

        match decode::<TokenClaims>(token, &decoding_key, &validation) {
            Ok(data) => {
                let mut claims = HashMap::new();
                claims.insert(CLIENT_ID_CLAIM.to_string(), data.claims.iss);
                Ok(ClaimToken { claims })
            }
            Err(e) => {
                tracing::debug!(%issuer, "token rejected: {}", e);
                Err(ConnectorError::TokenVerification)
            }
        }
    }

    /// The connector's own DID document: public key as `#key-1` plus the
    /// protocol callback and self-description services
    pub fn generate_document(&self) -> ConnectorResult<DidDocument> {
        let verification_method = VerificationMethod {
            id: format!("{}#key-1", self.identity),
            method_type: "JsonWebKey2020".to_string(),
            controller: self.identity.clone(),
            public_key_jwk: Some(self.key_pair.public_jwk()),
        };

        let dsp_service = Service {
            id: format!("{}#DataSpaceProtocol", self.identity),
            service_type: "DataSpaceProtocolService".to_string(),
            service_endpoint: self.dsp_callback_address.clone(),
        };

        let organization_endpoint = did_web_url(&self.identity, self.use_https)?
            .replace("/.well-known", "")
            .replace("did.json", "organization");
        let organization_service = Service {
            id: format!("{}#OrganizationInfo", self.identity),
            service_type: "SelfDescriptionService".to_string(),
            service_endpoint: organization_endpoint,
        };

        Ok(DidDocument {
            id: self.identity.clone(),
            verification_method: vec![verification_method],
            service: vec![dsp_service, organization_service],
        })
    }
}

/// Extract the issuer claim without checking the signature; verification
/// against the issuer's published key happens afterwards
fn read_unverified_issuer(token: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let mut insecure = Validation::new(Algorithm::ES256);
    insecure.insecure_disable_signature_validation();
    insecure.validate_aud = false;
    insecure.validate_exp = false;

    let data = decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &insecure)?;
    Ok(data.claims.iss)
}
