//! Traits for the stores the authorization engine consults.
//!
//! The engine owns none of this data. Workspaces, publication records and
//! role memberships live in backing stores that are queried read-only during
//! a decision; infrastructure failures from those stores surface as
//! `ServiceError` variants outside the denial taxonomy.

use std::collections::HashSet;
use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use geopub_core::constants::{LAYERS_ROUTE_COMPONENT, MAPS_ROUTE_COMPONENT};

use crate::error::ServiceResult;

use super::rights::AccessRights;

/// The two kinds of publication the platform serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationType {
    Layer,
    Map,
}

impl PublicationType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Layer => "layer",
            Self::Map => "map",
        }
    }

    /// Returns the REST path segment for collections of this type.
    #[must_use]
    pub const fn as_route_segment(self) -> &'static str {
        match self {
            Self::Layer => LAYERS_ROUTE_COMPONENT,
            Self::Map => MAPS_ROUTE_COMPONENT,
        }
    }

    /// Parse a REST path segment into a publication type.
    #[must_use]
    pub fn from_route_segment(s: &str) -> Option<Self> {
        match s {
            LAYERS_ROUTE_COMPONENT => Some(Self::Layer),
            MAPS_ROUTE_COMPONENT => Some(Self::Map),
            _ => None,
        }
    }
}

impl std::fmt::Display for PublicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PublicationType {
    type Err = geopub_core::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "layer" => Ok(Self::Layer),
            "map" => Ok(Self::Map),
            other => Err(geopub_core::error::CoreError::ParseError(format!(
                "unknown publication type: {other}"
            ))),
        }
    }
}

/// What the engine needs to know about a stored publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationInfo {
    pub uuid: Uuid,
    pub workspace: String,
    pub publication_type: PublicationType,
    pub name: String,
    pub title: String,
    pub access_rights: AccessRights,
}

/// Workspace lookups.
pub trait WorkspaceStore: Send + Sync {
    /// Whether a workspace of this name exists.
    fn exists(&self, name: &str) -> impl Future<Output = ServiceResult<bool>> + Send;

    /// Whether the name belongs to a registered user. A workspace is public
    /// iff this returns `false`.
    fn is_personal(&self, name: &str) -> impl Future<Output = ServiceResult<bool>> + Send;
}

/// Publication-info lookups.
pub trait PublicationStore: Send + Sync {
    fn get_info(
        &self,
        workspace: &str,
        publication_type: PublicationType,
        name: &str,
    ) -> impl Future<Output = ServiceResult<Option<PublicationInfo>>> + Send;

    fn get_info_by_uuid(
        &self,
        uuid: Uuid,
    ) -> impl Future<Output = ServiceResult<Option<PublicationInfo>>> + Send;
}

/// Role-membership lookups, unfiltered. Reserved-role policy is applied by
/// `RoleService` on top of this trait.
pub trait RoleStore: Send + Sync {
    /// All role names held by the user; empty if the user is unknown.
    fn roles_for(&self, username: &str)
    -> impl Future<Output = ServiceResult<HashSet<String>>> + Send;

    /// All role names known to the role service.
    fn all_roles(&self) -> impl Future<Output = ServiceResult<Vec<String>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_segment_roundtrip() {
        for ptype in [PublicationType::Layer, PublicationType::Map] {
            assert_eq!(
                PublicationType::from_route_segment(ptype.as_route_segment()),
                Some(ptype)
            );
        }
        assert_eq!(PublicationType::from_route_segment("styles"), None);
    }
}
