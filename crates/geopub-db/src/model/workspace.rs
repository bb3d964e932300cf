use diesel::{pg::Pg, prelude::*};
use serde::{Deserialize, Serialize};

use crate::db::schema;

/// A workspace row. Personal workspaces have a matching `users` row; public
/// workspaces do not.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Serialize, Deserialize,
)]
#[diesel(table_name = schema::workspaces)]
#[diesel(check_for_backend(Pg))]
pub struct Workspace {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::workspaces)]
pub struct NewWorkspace<'a> {
    pub name: &'a str,
}
