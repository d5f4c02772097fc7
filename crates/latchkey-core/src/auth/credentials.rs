use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use keyring::Entry;

const SERVICE_NAME: &str = "latchkey";

/// Keychain account name for the stored token. Mirrors the key the
/// device's bundled web UI uses in browser local storage.
const AUTH_KEY: &str = "auth";

/// Build the opaque Basic-auth token for a username/password pair.
/// This is the exact value the firmware compares the header against.
pub fn encode_basic_token(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{}:{}", username, password))
}

pub struct CredentialStore;

impl CredentialStore {
    /// Store the Basic token in the OS keychain
    pub fn store(token: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, AUTH_KEY)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(token)
            .context("Failed to store token in keychain")?;
        Ok(())
    }

    /// Retrieve the stored token. A missing entry is not an error:
    /// it means requests go out unauthenticated.
    pub fn load() -> Result<Option<String>> {
        let entry = Entry::new(SERVICE_NAME, AUTH_KEY)
            .context("Failed to create keyring entry")?;
        match entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read token from keychain"),
        }
    }

    /// Delete the stored token (logout)
    pub fn clear() -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, AUTH_KEY)
            .context("Failed to create keyring entry")?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }

    /// Check whether a token is stored
    pub fn exists() -> bool {
        matches!(Self::load(), Ok(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_basic_token() {
        // base64("admin:secret")
        assert_eq!(encode_basic_token("admin", "secret"), "YWRtaW46c2VjcmV0");
    }

    #[test]
    fn test_encode_basic_token_empty_password() {
        // base64("admin:")
        assert_eq!(encode_basic_token("admin", ""), "YWRtaW46");
    }
}
