//! The denial taxonomy.
//!
//! Every variant carries the platform's stable numeric error code and the
//! HTTP status the REST layer maps it to. Read-denial on a single
//! publication is deliberately reported as the not-found variant so actors
//! without read access cannot probe for the existence of private
//! publications; write-denial reveals itself as `Unauthorized` only when the
//! actor could already read the publication.

use thiserror::Error;

use geopub_core::constants::WORKSPACE_NAME_PATTERN;

use super::store::PublicationType;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("Workspace does not exist: {workspace}")]
    WorkspaceNotFound { workspace: String },

    #[error("Layer was not found: {workspace}/{name}")]
    LayerNotFound { workspace: String, name: String },

    #[error("Map was not found: {workspace}/{name}")]
    MapNotFound { workspace: String, name: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Unexpected HTTP method: {method}")]
    UnsupportedMethod { method: String },

    #[error("Wrong workspace name: {workspace}, expected pattern {expected}")]
    InvalidWorkspaceName {
        workspace: String,
        expected: &'static str,
    },
}

impl AuthzError {
    /// The not-found variant matching the publication type, also used to
    /// disguise read-denial.
    #[must_use]
    pub fn publication_not_found(
        publication_type: PublicationType,
        workspace: &str,
        name: &str,
    ) -> Self {
        match publication_type {
            PublicationType::Layer => Self::LayerNotFound {
                workspace: workspace.to_string(),
                name: name.to_string(),
            },
            PublicationType::Map => Self::MapNotFound {
                workspace: workspace.to_string(),
                name: name.to_string(),
            },
        }
    }

    #[must_use]
    pub fn invalid_workspace_name(workspace: &str) -> Self {
        Self::InvalidWorkspaceName {
            workspace: workspace.to_string(),
            expected: WORKSPACE_NAME_PATTERN,
        }
    }

    /// The platform's stable numeric error code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::InvalidWorkspaceName { .. } => 2,
            Self::LayerNotFound { .. } => 15,
            Self::MapNotFound { .. } => 26,
            Self::Unauthorized => 30,
            Self::UnsupportedMethod { .. } => 31,
            Self::WorkspaceNotFound { .. } => 40,
        }
    }

    /// The HTTP status the REST layer maps this denial to.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::WorkspaceNotFound { .. }
            | Self::LayerNotFound { .. }
            | Self::MapNotFound { .. } => 404,
            Self::Unauthorized => 403,
            Self::UnsupportedMethod { .. } | Self::InvalidWorkspaceName { .. } => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let layer = AuthzError::publication_not_found(PublicationType::Layer, "ws", "l");
        let map = AuthzError::publication_not_found(PublicationType::Map, "ws", "m");

        assert_eq!(layer.code(), 15);
        assert_eq!(map.code(), 26);
        assert_eq!(AuthzError::Unauthorized.code(), 30);
        assert_eq!(
            AuthzError::UnsupportedMethod {
                method: "TRACE".into()
            }
            .code(),
            31
        );
        assert_eq!(
            AuthzError::WorkspaceNotFound {
                workspace: "ws".into()
            }
            .code(),
            40
        );
        assert_eq!(AuthzError::invalid_workspace_name("Bad Name").code(), 2);
    }

    #[test]
    fn statuses_match_codes() {
        assert_eq!(
            AuthzError::publication_not_found(PublicationType::Layer, "ws", "l").http_status(),
            404
        );
        assert_eq!(AuthzError::Unauthorized.http_status(), 403);
        assert_eq!(
            AuthzError::UnsupportedMethod {
                method: "TRACE".into()
            }
            .http_status(),
            400
        );
    }
}
