use crate::services::errors::credential_errors::CredentialError;

#[cfg(test)]
use mockall::automock;

pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Produces and checks password hashes. Plaintext never leaves the caller.
#[cfg_attr(test, automock)]
pub trait CredentialStore: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError>;
    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, CredentialError>;
}

pub struct BcryptCredentialStore {
    cost: u32,
}

impl BcryptCredentialStore {
    pub fn new() -> Self {
        Self::with_cost(DEFAULT_COST)
    }

    pub fn with_cost(cost: u32) -> Self {
        BcryptCredentialStore { cost }
    }
}

impl Default for BcryptCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for BcryptCredentialStore {
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| CredentialError::Hashing(e.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, CredentialError> {
        bcrypt::verify(plaintext, hash).map_err(|e| CredentialError::MalformedHash(e.to_string()))
    }
}
