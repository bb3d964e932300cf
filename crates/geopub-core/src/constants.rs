/// Route component constants shared across crates
pub const REST_ROUTE_COMPONENT: &str = "rest";
pub const REST_ROUTE_PREFIX: &str = const_str::concat!("/", REST_ROUTE_COMPONENT);

pub const WORKSPACES_ROUTE_COMPONENT: &str = "workspaces";
pub const WORKSPACES_ROUTE_PREFIX: &str =
    const_str::concat!(REST_ROUTE_PREFIX, "/", WORKSPACES_ROUTE_COMPONENT);

pub const ROLES_ROUTE_COMPONENT: &str = "roles";

pub const LAYERS_ROUTE_COMPONENT: &str = "layers";
pub const MAPS_ROUTE_COMPONENT: &str = "maps";

/// Pseudo-role granting access to any actor, anonymous included.
pub const EVERYONE_ROLE: &str = "EVERYONE";

/// Role names owned by the platform itself, never surfaced as grantable roles.
pub const ADMIN_ROLE: &str = "ADMIN";
pub const GROUP_ADMIN_ROLE: &str = "GROUP_ADMIN";

/// Prefix of auto-generated per-user roles in the role service.
pub const USER_ROLE_PREFIX: &str = "USER_";

/// Workspace names are lowercase snake-case identifiers.
pub const WORKSPACE_NAME_PATTERN: &str = "^[a-z][a-z0-9]*(_[a-z0-9]+)*$";

/// Grantable role names are uppercase snake-case identifiers.
pub const ROLE_NAME_PATTERN: &str = "^[A-Z][A-Z0-9]*(_[A-Z0-9]+)*$";
