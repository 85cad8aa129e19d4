//! Credential material in its transient and durable forms.
//!
//! The external OIDC exchange hands back an opaque credential blob that the
//! host needs for the remainder of the request lifecycle. The durable
//! account field is capped, so the blob must never be written verbatim when
//! it exceeds the cap. The two representations are therefore separate
//! types: [`CredentialsSource`] (in-memory, unbounded, secret) and
//! [`StoredCredentials`] (durable, bounded).

use std::fmt;

use rand::distributions::Alphanumeric;
use rand::Rng;
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Storage cap for inline credential material, in bytes.
pub const MAX_INLINE_CREDENTIALS_LEN: usize = 1024;

/// Opaque credential bytes issued by the external OIDC exchange.
///
/// Redacted from `Debug` output; equality is compared in constant time.
pub struct CredentialsSource(Secret<Vec<u8>>);

impl CredentialsSource {
    /// Wraps raw credential bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Secret::new(bytes.into()))
    }

    /// Returns the raw bytes.
    pub fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.0.expose_secret().len()
    }

    /// Returns true when no credential bytes are present.
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// Returns true when the material fits the durable storage cap.
    pub fn fits_storage(&self) -> bool {
        self.len() <= MAX_INLINE_CREDENTIALS_LEN
    }
}

impl Clone for CredentialsSource {
    fn clone(&self) -> Self {
        Self::new(self.0.expose_secret().clone())
    }
}

impl fmt::Debug for CredentialsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialsSource(<{} bytes>)", self.len())
    }
}

impl PartialEq for CredentialsSource {
    fn eq(&self, other: &Self) -> bool {
        self.expose().ct_eq(other.expose()).into()
    }
}

impl Eq for CredentialsSource {}

impl From<&[u8]> for CredentialsSource {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

/// Durable form of the credential field on a persistent account.
///
/// Oversized material is stored as a SHA-256 digest reference, never
/// verbatim; the field stays bounded regardless of what the provider
/// issued.
#[derive(Clone, PartialEq, Eq)]
pub enum StoredCredentials {
    /// The material fit within the cap and is stored as-is.
    Inline(Vec<u8>),
    /// The material exceeded the cap; only its SHA-256 digest is stored.
    DigestRef([u8; 32]),
}

impl StoredCredentials {
    /// Derives the durable form from in-memory credential material.
    pub fn from_source(source: &CredentialsSource) -> Self {
        if source.fits_storage() {
            Self::Inline(source.expose().to_vec())
        } else {
            Self::DigestRef(Sha256::digest(source.expose()).into())
        }
    }

    /// Derives the durable form of a password placeholder.
    ///
    /// Only the digest is stored; the plaintext placeholder never reaches
    /// the persistence layer.
    pub fn from_password(password: &PasswordPlaceholder) -> Self {
        Self::DigestRef(Sha256::digest(password.expose().as_bytes()).into())
    }

    /// Returns true when the material was stored verbatim.
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }

    /// Returns true when this stored form derives from the given source.
    pub fn matches(&self, source: &CredentialsSource) -> bool {
        Self::from_source(source) == *self
    }
}

impl fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(bytes) => write!(f, "StoredCredentials::Inline(<{} bytes>)", bytes.len()),
            Self::DigestRef(digest) => write!(
                f,
                "StoredCredentials::DigestRef({:02x}{:02x}{:02x}{:02x}..)",
                digest[0], digest[1], digest[2], digest[3]
            ),
        }
    }
}

/// Random placeholder satisfying the storage rule that every account
/// carries a credential.
///
/// Externally-authenticated accounts never log in with it; the value is
/// generated from the thread CSPRNG, never derivable and never reused.
pub struct PasswordPlaceholder(Secret<String>);

impl PasswordPlaceholder {
    /// Length of a generated placeholder, in alphanumeric characters.
    pub const LEN: usize = 30;

    /// Generates a fresh placeholder.
    pub fn generate() -> Self {
        let value: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::LEN)
            .map(char::from)
            .collect();
        Self(Secret::new(value))
    }

    /// Returns the plaintext value.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for PasswordPlaceholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasswordPlaceholder(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_source_equality_matches_bytes() {
        let a = CredentialsSource::new(b"token-material".to_vec());
        let b = CredentialsSource::new(b"token-material".to_vec());
        let c = CredentialsSource::new(b"other-material".to_vec());

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn credentials_source_debug_is_redacted() {
        let source = CredentialsSource::new(b"super-secret".to_vec());
        let debug = format!("{:?}", source);

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("12 bytes"));
    }

    #[test]
    fn small_source_is_stored_inline() {
        let source = CredentialsSource::new(vec![7u8; 100]);
        let stored = StoredCredentials::from_source(&source);

        assert!(stored.is_inline());
        assert!(stored.matches(&source));
    }

    #[test]
    fn source_at_the_cap_is_stored_inline() {
        let source = CredentialsSource::new(vec![7u8; MAX_INLINE_CREDENTIALS_LEN]);
        assert!(StoredCredentials::from_source(&source).is_inline());
    }

    #[test]
    fn oversized_source_is_stored_as_digest() {
        let source = CredentialsSource::new(vec![7u8; MAX_INLINE_CREDENTIALS_LEN + 1]);
        let stored = StoredCredentials::from_source(&source);

        assert!(!stored.is_inline());
        assert!(stored.matches(&source));
    }

    #[test]
    fn digest_differs_for_different_oversized_sources() {
        let a = CredentialsSource::new(vec![1u8; 2048]);
        let b = CredentialsSource::new(vec![2u8; 2048]);

        assert_ne!(
            StoredCredentials::from_source(&a),
            StoredCredentials::from_source(&b)
        );
    }

    #[test]
    fn stored_debug_never_contains_inline_bytes() {
        let stored = StoredCredentials::Inline(b"plaintext".to_vec());
        assert!(!format!("{:?}", stored).contains("plaintext"));
    }

    #[test]
    fn password_placeholder_has_expected_length_and_alphabet() {
        let password = PasswordPlaceholder::generate();

        assert_eq!(password.expose().len(), PasswordPlaceholder::LEN);
        assert!(password.expose().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn password_placeholders_are_not_reused() {
        let a = PasswordPlaceholder::generate();
        let b = PasswordPlaceholder::generate();
        assert_ne!(a.expose(), b.expose());
    }

    #[test]
    fn password_is_never_stored_verbatim() {
        let password = PasswordPlaceholder::generate();
        let stored = StoredCredentials::from_password(&password);

        assert!(!stored.is_inline());
    }
}
