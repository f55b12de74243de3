//! Bearer credentials.
//!
//! A credential is `base64url(claims) "." base64url(signature)` where the
//! claims are a small JSON document naming the user and the validity window,
//! and the signature is Ed25519 over the encoded claims segment. The signing
//! key never leaves the server; it is injected through configuration.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::constants::KDF_CONTEXT_CREDENTIAL_KEY;
use crate::error::CredentialError;
use crate::types::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialClaims {
    pub sub: UserId,
    pub iat: DateTime<Utc>,
    pub exp: DateTime<Utc>,
}

/// Issues and verifies credentials with a single Ed25519 key.
#[derive(Clone)]
pub struct CredentialSigner {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
    ttl: Duration,
}

impl std::fmt::Debug for CredentialSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSigner")
            .field("verifying_key", &hex::encode(self.verifying_key.to_bytes()))
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

impl CredentialSigner {
    pub fn from_seed(seed: &[u8; 32], ttl: Duration) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
            ttl,
        }
    }

    /// Random key; credentials it issues die with the process.
    pub fn generate(ttl: Duration) -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
            ttl,
        }
    }

    /// Derive the signing seed from an operator passphrase (BLAKE3 KDF).
    pub fn from_passphrase(passphrase: &[u8], ttl: Duration) -> Self {
        Self::from_seed(&derive_seed_from_passphrase(passphrase), ttl)
    }

    pub fn issue(&self, user: UserId) -> Result<String, CredentialError> {
        self.issue_at(user, Utc::now())
    }

    pub fn issue_at(&self, user: UserId, issued_at: DateTime<Utc>) -> Result<String, CredentialError> {
        let claims = CredentialClaims {
            sub: user,
            iat: issued_at,
            exp: issued_at + self.ttl,
        };
        let json =
            serde_json::to_vec(&claims).map_err(|e| CredentialError::Encoding(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = self.signing_key.sign(payload.as_bytes());

        Ok(format!(
            "{payload}.{}",
            URL_SAFE_NO_PAD.encode(signature.to_bytes())
        ))
    }

    pub fn verify(&self, token: &str) -> Result<CredentialClaims, CredentialError> {
        self.verify_at(token, Utc::now())
    }

    /// Signature is checked before expiry, so a forged token never reports
    /// `Expired`.
    pub fn verify_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<CredentialClaims, CredentialError> {
        let (payload, signature) = token
            .trim()
            .split_once('.')
            .ok_or(CredentialError::Malformed)?;

        let signature_bytes = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| CredentialError::Malformed)?;
        let signature =
            Signature::from_slice(&signature_bytes).map_err(|_| CredentialError::Malformed)?;

        self.verifying_key
            .verify(payload.as_bytes(), &signature)
            .map_err(|_| CredentialError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| CredentialError::Malformed)?;
        let claims: CredentialClaims =
            serde_json::from_slice(&json).map_err(|_| CredentialError::Malformed)?;

        if now >= claims.exp {
            return Err(CredentialError::Expired);
        }

        Ok(claims)
    }
}

// BLAKE3 KDF with domain separation
pub fn derive_seed_from_passphrase(passphrase: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(KDF_CONTEXT_CREDENTIAL_KEY);
    hasher.update(passphrase);
    *hasher.finalize().as_bytes()
}

/// Parse a 64-character hex string into a 32-byte signing seed.
pub fn parse_hex_seed(hex_seed: &str) -> Result<[u8; 32], CredentialError> {
    let hex_seed = hex_seed.trim();
    if hex_seed.len() != 64 {
        return Err(CredentialError::InvalidKey(format!(
            "expected 64 hex chars, got {}",
            hex_seed.len()
        )));
    }
    let bytes = hex::decode(hex_seed).map_err(|e| CredentialError::InvalidKey(e.to_string()))?;
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&bytes);
    Ok(seed)
}
