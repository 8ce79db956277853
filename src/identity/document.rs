/// DID document data model (web method subset)
use serde::{Deserialize, Serialize};

/// Verification method types this connector accepts when extracting a
/// public key from a resolved document
pub const ALLOWED_VERIFICATION_TYPES: &[&str] = &["JsonWebKey2020"];

/// A published DID document: identifier, key material and service endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DidDocument {
    pub id: String,
    #[serde(rename = "verificationMethod", default)]
    pub verification_method: Vec<VerificationMethod>,
    #[serde(default)]
    pub service: Vec<Service>,
}

/// Key material entry of a DID document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerificationMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub method_type: String,
    /// DID of the identity controlling this key; an identity whose document
    /// declares no non-empty controller is self-sovereign
    #[serde(default)]
    pub controller: String,
    #[serde(rename = "publicKeyJwk", skip_serializing_if = "Option::is_none")]
    pub public_key_jwk: Option<PublicKeyJwk>,
}

/// Service endpoint entry of a DID document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(rename = "serviceEndpoint")]
    pub service_endpoint: String,
}

/// Elliptic curve public (or private, when `d` is set) key in JWK form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicKeyJwk {
    pub kty: String,
    pub crv: String,
    /// Base64url-encoded affine x coordinate
    pub x: String,
    /// Base64url-encoded affine y coordinate
    pub y: String,
    /// Base64url-encoded private scalar; only present in stored key pairs,
    /// never in published documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl DidDocument {
    /// First verification method whose type the connector accepts
    pub fn first_allowed_verification_method(&self) -> Option<&VerificationMethod> {
        self.verification_method
            .iter()
            .find(|vm| ALLOWED_VERIFICATION_TYPES.contains(&vm.method_type.as_str()))
    }

    /// Controller of the first verification method declaring a non-empty one
    pub fn first_controller(&self) -> Option<&str> {
        self.verification_method
            .iter()
            .find(|vm| !vm.controller.is_empty())
            .map(|vm| vm.controller.as_str())
    }

    /// Look up a service entry by its exact id
    pub fn find_service(&self, service_id: &str) -> Option<&Service> {
        self.service.iter().find(|s| s.id == service_id)
    }
}

impl PublicKeyJwk {
    /// Copy of this JWK with the private scalar stripped
    pub fn to_public(&self) -> Self {
        Self {
            d: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document_with_controllers(controllers: &[&str]) -> DidDocument {
        DidDocument {
            id: "did:web:connector.example".to_string(),
            verification_method: controllers
                .iter()
                .enumerate()
                .map(|(i, c)| VerificationMethod {
                    id: format!("did:web:connector.example#key-{}", i + 1),
                    method_type: "JsonWebKey2020".to_string(),
                    controller: c.to_string(),
                    public_key_jwk: None,
                })
                .collect(),
            service: vec![],
        }
    }

    #[test]
    fn test_first_controller_skips_empty_entries() {
        let doc = document_with_controllers(&["", "did:web:hub.example"]);
        assert_eq!(doc.first_controller(), Some("did:web:hub.example"));
    }

    #[test]
    fn test_no_controller_means_self_sovereign() {
        let doc = document_with_controllers(&["", ""]);
        assert_eq!(doc.first_controller(), None);
    }

    #[test]
    fn test_first_allowed_verification_method_filters_types() {
        let mut doc = document_with_controllers(&["did:web:connector.example"]);
        doc.verification_method[0].method_type = "Ed25519VerificationKey2018".to_string();
        assert!(doc.first_allowed_verification_method().is_none());
    }

    #[test]
    fn test_document_json_field_names() {
        let doc = DidDocument {
            id: "did:web:ds.example".to_string(),
            verification_method: vec![],
            service: vec![Service {
                id: "did:web:ds.example#DataSpaceInfo".to_string(),
                service_type: "DataSpaceInfoService".to_string(),
                service_endpoint: "https://ds.example/info".to_string(),
            }],
        };

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["service"][0]["serviceEndpoint"], "https://ds.example/info");
        assert!(json["verificationMethod"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_private_jwk_never_serializes_d_after_to_public() {
        let jwk = PublicKeyJwk {
            kty: "EC".to_string(),
            crv: "P-256".to_string(),
            x: "AAAA".to_string(),
            y: "BBBB".to_string(),
            d: Some("secret".to_string()),
            kid: None,
        };

        let json = serde_json::to_value(jwk.to_public()).unwrap();
        assert!(json.get("d").is_none());
    }
}
