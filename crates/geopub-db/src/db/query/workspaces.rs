//! Query composition for `workspaces`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::{users, workspaces};
use crate::model::workspace::{NewWorkspace, Workspace};

/// ## Summary
/// Loads a workspace by name.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get_by_name(
    conn: &mut DbConnection<'_>,
    name: &str,
) -> QueryResult<Option<Workspace>> {
    workspaces::table
        .filter(workspaces::name.eq(name))
        .select(Workspace::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Checks whether a workspace of the given name exists.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn exists(conn: &mut DbConnection<'_>, name: &str) -> QueryResult<bool> {
    Ok(get_by_name(conn, name).await?.is_some())
}

/// ## Summary
/// Checks whether a workspace name belongs to a registered user.
///
/// A workspace with no matching `users` row is a public workspace.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn is_personal(conn: &mut DbConnection<'_>, name: &str) -> QueryResult<bool> {
    let row: Option<i32> = users::table
        .inner_join(workspaces::table)
        .filter(workspaces::name.eq(name))
        .select(users::id)
        .first(conn)
        .await
        .optional()?;
    Ok(row.is_some())
}

/// ## Summary
/// Filters a list of candidate usernames down to the ones that are
/// registered users.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn existing_user_names(
    conn: &mut DbConnection<'_>,
    names: &[String],
) -> QueryResult<Vec<String>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    users::table
        .inner_join(workspaces::table)
        .filter(workspaces::name.eq_any(names))
        .select(workspaces::name)
        .load(conn)
        .await
}

/// ## Summary
/// Inserts the workspace if it does not exist yet and returns the row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn ensure(conn: &mut DbConnection<'_>, name: &str) -> QueryResult<Workspace> {
    diesel::insert_into(workspaces::table)
        .values(NewWorkspace { name })
        .on_conflict(workspaces::name)
        .do_nothing()
        .execute(conn)
        .await?;

    workspaces::table
        .filter(workspaces::name.eq(name))
        .select(Workspace::as_select())
        .first(conn)
        .await
}
