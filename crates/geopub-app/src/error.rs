use salvo::http::StatusCode;
use salvo::writing::Json;
use thiserror::Error;

use geopub_service::authz::AuthzError;
use geopub_service::error::ServiceError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] geopub_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] geopub_core::error::CoreError),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// The JSON error contract: a stable numeric code plus a message, with an
/// optional detail object.
pub fn write_error(
    res: &mut salvo::Response,
    status: StatusCode,
    code: u16,
    message: &str,
    detail: Option<serde_json::Value>,
) {
    res.status_code(status);
    let mut body = serde_json::json!({
        "code": code,
        "message": message,
    });
    if let Some(detail) = detail {
        body["detail"] = detail;
    }
    res.render(Json(body));
}

/// ## Summary
/// Writes an authorization denial as its stable code and HTTP status.
pub fn write_authz_error(res: &mut salvo::Response, err: &AuthzError) {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let detail = match err {
        AuthzError::UnsupportedMethod { method } => {
            Some(serde_json::json!({ "method": method }))
        }
        AuthzError::InvalidWorkspaceName {
            workspace,
            expected,
        } => Some(serde_json::json!({ "workspace": workspace, "expected": expected })),
        _ => None,
    };
    write_error(res, status, err.code(), &err.to_string(), detail);
}

/// ## Summary
/// Maps any error reaching the HTTP layer to a response: authorization
/// denials keep their code and status, everything else becomes a 500.
pub fn write_app_error(res: &mut salvo::Response, err: &AppError) {
    if let AppError::ServiceError(ServiceError::Authz(authz)) = err {
        write_authz_error(res, authz);
        return;
    }

    tracing::error!(error = %err, "Request failed with internal error");
    res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
    res.render(Json(serde_json::json!({
        "code": -1,
        "message": "Internal Server Error",
    })));
}
