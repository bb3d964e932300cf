//! Query composition for the internal role service tables.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::{roles, user_roles};

/// ## Summary
/// Loads the role names assigned to a user, ordered by name.
///
/// Reserved-role filtering is a policy concern and happens in the service
/// layer, not here.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn roles_for_user(
    conn: &mut DbConnection<'_>,
    username: &str,
) -> QueryResult<Vec<String>> {
    user_roles::table
        .filter(user_roles::username.eq(username))
        .order(user_roles::role_name.asc())
        .select(user_roles::role_name)
        .load(conn)
        .await
}

/// ## Summary
/// Loads all role names known to the role service, ordered by name.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn all_role_names(conn: &mut DbConnection<'_>) -> QueryResult<Vec<String>> {
    roles::table
        .order(roles::name.asc())
        .select(roles::name)
        .load(conn)
        .await
}
