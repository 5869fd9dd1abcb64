pub mod auth_service_errors;
pub mod credential_errors;
pub mod league_service_errors;
pub mod player_service_errors;
pub mod user_service_errors;

/// Coarse classification shared by every service error, so callers can pick
/// a response without matching each variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Forbidden,
    Validation,
    InvalidCredentials,
    PersistenceFailure,
    Internal,
}
