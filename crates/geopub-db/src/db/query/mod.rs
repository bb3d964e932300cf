pub mod publications;
pub mod rights;
pub mod roles;
pub mod workspaces;
