#[derive(Debug, Clone, PartialEq)]
pub enum CredentialError {
    Hashing(String),
    MalformedHash(String),
}

impl std::fmt::Display for CredentialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialError::Hashing(msg) => write!(f, "Could not hash password: {}", msg),
            CredentialError::MalformedHash(msg) => write!(f, "Stored hash is malformed: {}", msg),
        }
    }
}

impl std::error::Error for CredentialError {}
