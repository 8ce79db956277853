/// Identity subsystem: did:web resolution, DID documents, key material
/// and the bearer-token identity service
pub mod did_web;
pub mod document;
pub mod keys;
pub mod service;

pub use did_web::{did_web_url, DidWebResolver};
pub use document::{DidDocument, PublicKeyJwk, Service, VerificationMethod};
pub use keys::{ensure_key_pair, FileSecretStore, KeyPair, SecretStore};
pub use service::{derive_did_web, ClaimToken, IdentityService, CLIENT_ID_CLAIM};
