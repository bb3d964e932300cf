//! Parsing of workspace-publication request paths.
//!
//! ## Summary
//! Turns `/rest/workspaces/{workspace}/layers[/{name}[/...]]` (and the
//! `maps` twin) into the (workspace, type, name) triple the authorizer
//! consumes. Trailing sub-endpoints (`/style`, `/thumbnail`, ...) still
//! address the same publication, so anything after the name is ignored.

use geopub_core::constants::WORKSPACES_ROUTE_PREFIX;
use geopub_service::authz::PublicationType;

/// The publication coordinates addressed by a request path. `name` is
/// `None` for collection-level requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationPath {
    pub workspace: String,
    pub publication_type: PublicationType,
    pub name: Option<String>,
}

/// ## Summary
/// Parses a request path into publication coordinates.
///
/// Returns `None` for any path this module cannot vouch for; such requests
/// must never reach a publication handler unauthorized.
#[must_use]
pub fn parse_publication_path(path: &str) -> Option<PublicationPath> {
    let rest = path.strip_prefix(WORKSPACES_ROUTE_PREFIX)?;
    let mut segments = rest.split('/').filter(|s| !s.is_empty());

    let workspace = segments.next()?;
    let publication_type = PublicationType::from_route_segment(segments.next()?)?;
    let name = segments.next().map(ToString::to_string);

    Some(PublicationPath {
        workspace: workspace.to_string(),
        publication_type,
        name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_collection_paths() {
        for path in [
            "/rest/workspaces/user_a/layers",
            "/rest/workspaces/user_a/layers/",
            "/rest/workspaces/user_a/maps/",
        ] {
            let parsed = parse_publication_path(path)
                .unwrap_or_else(|| panic!("{path} should be accepted"));
            assert_eq!(parsed.workspace, "user_a");
            assert_eq!(parsed.name, None);
        }
    }

    #[test]
    fn accepts_single_publication_paths() {
        let parsed = parse_publication_path("/rest/workspaces/user_a/layers/abc").unwrap();
        assert_eq!(parsed.workspace, "user_a");
        assert_eq!(parsed.publication_type, PublicationType::Layer);
        assert_eq!(parsed.name.as_deref(), Some("abc"));

        let parsed = parse_publication_path("/rest/workspaces/user_a/maps/a_map").unwrap();
        assert_eq!(parsed.publication_type, PublicationType::Map);
        assert_eq!(parsed.name.as_deref(), Some("a_map"));
    }

    #[test]
    fn nested_endpoints_address_the_same_publication() {
        let parsed =
            parse_publication_path("/rest/workspaces/user_a/layers/some_layer/some/nested/endpoint")
                .unwrap();
        assert_eq!(parsed.name.as_deref(), Some("some_layer"));
    }

    #[test]
    fn rejects_paths_outside_the_workspace_tree() {
        for path in [
            "/rest/workspaces/layers",
            "/rest/workspaces/username/abc",
            "/rest/workspaces/username/publications",
            "/rest/workspaces/username/publications/blablabla",
            "/rest/layers",
            "/rest/username/abc",
            "/other/workspaces/user_a/layers",
        ] {
            assert!(
                parse_publication_path(path).is_none(),
                "{path} should be rejected"
            );
        }
    }
}
