//! Token service: claims model, RSA key material, issuance and verification.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod keys;

pub use claims::{Claims, TokenKind};
pub use decoder::JwtDecoder;
pub use encoder::{IssuedToken, JwtEncoder, TokenPair};
pub use keys::KeyPair;
