use diesel::{pg::Pg, prelude::*};
use serde::{Deserialize, Serialize};

use crate::db::schema;

/// A publication record (layer or map) within a workspace.
///
/// The `EVERYONE` pseudo-role is not stored in the `rights` table; it is
/// folded into the two boolean columns so the common "public read" case
/// needs no join.
#[derive(
    Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable, Serialize, Deserialize,
)]
#[diesel(table_name = schema::publications)]
#[diesel(check_for_backend(Pg))]
pub struct Publication {
    pub id: i32,
    pub uuid: uuid::Uuid,
    pub id_workspace: i32,
    pub publication_type: String,
    pub name: String,
    pub title: String,
    pub everyone_can_read: bool,
    pub everyone_can_write: bool,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::publications)]
pub struct NewPublication<'a> {
    pub uuid: uuid::Uuid,
    pub id_workspace: i32,
    pub publication_type: &'a str,
    pub name: &'a str,
    pub title: &'a str,
    pub everyone_can_read: bool,
    pub everyone_can_write: bool,
}
