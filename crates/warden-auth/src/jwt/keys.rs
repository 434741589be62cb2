//! RSA key material shared by the encoder and decoder.

use std::path::Path;

use jsonwebtoken::{DecodingKey, EncodingKey};
use tracing::info;

use warden_core::config::AuthConfig;

use crate::error::AuthError;

/// Process-wide RSA key pair, loaded once at startup and never mutated.
///
/// The private half is optional so stateless verifier processes can run
/// with only the public key. Share it behind an `Arc`.
pub struct KeyPair {
    signing: Option<EncodingKey>,
    verifying: DecodingKey,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("can_sign", &self.signing.is_some())
            .finish_non_exhaustive()
    }
}

impl KeyPair {
    /// Builds a key pair from PEM-encoded RSA keys.
    pub fn from_pem(private_pem: Option<&[u8]>, public_pem: &[u8]) -> Result<Self, AuthError> {
        let signing = private_pem
            .map(EncodingKey::from_rsa_pem)
            .transpose()
            .map_err(|e| AuthError::Key(format!("invalid RSA private key: {e}")))?;

        let verifying = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| AuthError::Key(format!("invalid RSA public key: {e}")))?;

        Ok(Self { signing, verifying })
    }

    /// Builds a verify-only key pair from a PEM-encoded public key.
    pub fn public_only(public_pem: &[u8]) -> Result<Self, AuthError> {
        Self::from_pem(None, public_pem)
    }

    /// Reads the key files named in the auth configuration.
    pub fn load(config: &AuthConfig) -> Result<Self, AuthError> {
        let private_pem = config
            .private_key_path
            .as_deref()
            .map(read_pem)
            .transpose()?;
        let public_pem = read_pem(&config.public_key_path)?;

        let keys = Self::from_pem(private_pem.as_deref(), &public_pem)?;
        info!(
            public_key = %config.public_key_path,
            can_sign = keys.can_sign(),
            "Loaded token key material"
        );
        Ok(keys)
    }

    /// Whether the private half is present.
    pub fn can_sign(&self) -> bool {
        self.signing.is_some()
    }

    pub(crate) fn signing_key(&self) -> Option<&EncodingKey> {
        self.signing.as_ref()
    }

    pub(crate) fn verifying_key(&self) -> &DecodingKey {
        &self.verifying
    }
}

fn read_pem(path: &str) -> Result<Vec<u8>, AuthError> {
    std::fs::read(Path::new(path))
        .map_err(|e| AuthError::Key(format!("cannot read key file '{path}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_PEM: &str = include_str!("../../tests/fixtures/issuer_private.pem");
    const PUBLIC_PEM: &str = include_str!("../../tests/fixtures/issuer_public.pem");

    #[test]
    fn test_from_pem() {
        let keys = KeyPair::from_pem(Some(PRIVATE_PEM.as_bytes()), PUBLIC_PEM.as_bytes()).unwrap();
        assert!(keys.can_sign());

        let verify_only = KeyPair::public_only(PUBLIC_PEM.as_bytes()).unwrap();
        assert!(!verify_only.can_sign());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            KeyPair::public_only(b"not a pem"),
            Err(AuthError::Key(_))
        ));
        assert!(matches!(
            KeyPair::from_pem(Some(&b"nope"[..]), PUBLIC_PEM.as_bytes()),
            Err(AuthError::Key(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let config: AuthConfig = serde_json::from_value(serde_json::json!({
            "public_key_path": "/nonexistent/public.pem",
        }))
        .unwrap();
        assert!(matches!(KeyPair::load(&config), Err(AuthError::Key(_))));
    }

    #[test]
    fn test_debug_hides_material() {
        let keys = KeyPair::public_only(PUBLIC_PEM.as_bytes()).unwrap();
        let debug = format!("{keys:?}");
        assert!(debug.contains("can_sign: false"));
        assert!(!debug.contains("BEGIN"));
    }
}
