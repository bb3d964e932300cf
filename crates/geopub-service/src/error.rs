use thiserror::Error;

use crate::authz::error::AuthzError;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Domain denial from the authorization engine; carries a stable
    /// numeric code for the HTTP layer.
    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error(transparent)]
    DatabaseError(#[from] geopub_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] geopub_core::error::CoreError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),

    #[error("Diesel error: {0}")]
    DieselError(#[from] diesel::result::Error),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
