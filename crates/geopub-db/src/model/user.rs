use diesel::{pg::Pg, prelude::*};
use serde::{Deserialize, Serialize};

use crate::db::schema;

/// A registered user. The user's name is the name of their personal
/// workspace; the row only carries the link plus the OAuth2 subject the
/// user claimed the name with.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Serialize, Deserialize,
)]
#[diesel(table_name = schema::users)]
#[diesel(check_for_backend(Pg))]
pub struct User {
    pub id: i32,
    pub id_workspace: i32,
    pub issuer_sub: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::users)]
pub struct NewUser<'a> {
    pub id_workspace: i32,
    pub issuer_sub: &'a str,
}
