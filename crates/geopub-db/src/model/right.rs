use diesel::{pg::Pg, prelude::*};
use serde::{Deserialize, Serialize};

use crate::db::schema;

/// A single access-right row: one principal (user or role) granted `read`
/// or `write` on one publication. Exactly one of `id_user` / `role_name`
/// is set.
#[derive(
    Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable, Serialize, Deserialize,
)]
#[diesel(table_name = schema::rights)]
#[diesel(check_for_backend(Pg))]
pub struct Right {
    pub id: i32,
    pub id_publication: i32,
    pub id_user: Option<i32>,
    pub role_name: Option<String>,
    pub right_type: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::rights)]
pub struct NewRight<'a> {
    pub id_publication: i32,
    pub id_user: Option<i32>,
    pub role_name: Option<&'a str>,
    pub right_type: &'a str,
}
