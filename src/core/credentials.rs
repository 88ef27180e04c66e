//! Credentials
//!
//! Account credentials and the (host, login) identity used as the registry
//! sharding key.

use secrecy::{ExposeSecret, SecretString};
use sha1::{Digest, Sha1};

/// Credentials for one iiko server account.
#[derive(Clone)]
pub struct Credentials {
    /// Server host, e.g. `https://stary-oskol-co.iiko.it`.
    pub host: String,
    /// Account login.
    pub login: String,
    /// Account password. Only its SHA1 hash ever leaves this struct.
    pub password: SecretString,
}

impl Credentials {
    pub fn new(
        host: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            login: login.into(),
            password: SecretString::new(password.into()),
        }
    }

    /// Identity key for the authority and client registries.
    pub fn key(&self) -> CredentialKey {
        CredentialKey::new(&self.host, &self.login)
    }

    /// SHA1 hex digest of the password, as required by the auth endpoint.
    pub fn password_hash(&self) -> String {
        hash_password(self.password.expose_secret())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Unique identity of one (host, login) pair.
///
/// Two keys are equal iff both fields match; the password never participates
/// in identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CredentialKey(String);

impl CredentialKey {
    pub fn new(host: &str, login: &str) -> Self {
        Self(format!("{}:{}", host, login))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// SHA1-hex digest of a password. The auth endpoint accepts only this form,
/// so the plaintext password is hashed once and then dropped.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_known_vector() {
        assert_eq!(
            hash_password("test"),
            "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3"
        );
    }

    #[test]
    fn test_hash_password_deterministic() {
        assert_eq!(hash_password("mypassword"), hash_password("mypassword"));
        assert_ne!(hash_password("password1"), hash_password("password2"));
    }

    #[test]
    fn test_credential_key_identity() {
        let a = CredentialKey::new("https://a.example", "admin");
        let b = CredentialKey::new("https://a.example", "admin");
        let c = CredentialKey::new("https://b.example", "admin");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str(), "https://a.example:admin");
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("https://a.example", "admin", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_password_hash_not_plaintext() {
        let creds = Credentials::new("https://a.example", "admin", "password123");
        assert_eq!(creds.password_hash(), hash_password("password123"));
        assert_ne!(creds.password_hash(), "password123");
    }
}
