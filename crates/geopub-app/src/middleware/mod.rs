pub mod actor;
pub mod authz;
pub mod publication_path;

pub mod depot_keys {
    pub const REQUEST_ACTOR: &str = "__request_actor";
    pub const PUBLICATION_PATH: &str = "__publication_path";
}
