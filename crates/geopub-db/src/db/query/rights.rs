//! Query composition for `rights`.
//!
//! Access rights of a publication are stored as one row per (principal,
//! right type) pair, with the `EVERYONE` pseudo-role folded into boolean
//! columns on the publication row itself.

use std::collections::HashSet;

use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl, scoped_futures::ScopedFutureExt};

use crate::db::connection::DbConnection;
use crate::db::schema::{publications, rights, users, workspaces};
use crate::model::right::NewRight;

pub const RIGHT_READ: &str = "read";
pub const RIGHT_WRITE: &str = "write";

/// Principals granted one right on one publication, already split into the
/// two kinds the `rights` table distinguishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantSet {
    pub users: Vec<String>,
    pub roles: Vec<String>,
    pub everyone: bool,
}

/// ## Summary
/// Collects the principal names granted `right_type` on a publication.
///
/// Usernames are resolved through the `users` → `workspaces` join; role
/// grants are read directly from the row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn principals_for_publication(
    conn: &mut DbConnection<'_>,
    id_publication: i32,
    right_type: &str,
) -> QueryResult<HashSet<String>> {
    let user_names: Vec<String> = rights::table
        .inner_join(users::table.inner_join(workspaces::table))
        .filter(rights::id_publication.eq(id_publication))
        .filter(rights::right_type.eq(right_type))
        .select(workspaces::name)
        .load(conn)
        .await?;

    let role_names: Vec<String> = rights::table
        .filter(rights::id_publication.eq(id_publication))
        .filter(rights::right_type.eq(right_type))
        .filter(rights::role_name.is_not_null())
        .select(rights::role_name.assume_not_null())
        .load(conn)
        .await?;

    Ok(user_names.into_iter().chain(role_names).collect())
}

/// ## Summary
/// Replaces all rights rows of a publication with the given grants and
/// updates the publication's `EVERYONE` flags, atomically.
///
/// Usernames without a matching `users` row are skipped, mirroring the
/// insert-select the rights table was originally populated with.
///
/// ## Errors
/// Returns an error if any database operation inside the transaction fails.
pub async fn replace_for_publication<'a>(
    conn: &mut DbConnection<'a>,
    id_publication: i32,
    read: &'a GrantSet,
    write: &'a GrantSet,
) -> QueryResult<()> {
    conn.transaction(|conn| {
        async move {
            diesel::update(publications::table.find(id_publication))
                .set((
                    publications::everyone_can_read.eq(read.everyone),
                    publications::everyone_can_write.eq(write.everyone),
                ))
                .execute(conn)
                .await?;

            diesel::delete(rights::table.filter(rights::id_publication.eq(id_publication)))
                .execute(conn)
                .await?;

            insert_grant_rows(conn, id_publication, read, RIGHT_READ).await?;
            insert_grant_rows(conn, id_publication, write, RIGHT_WRITE).await?;

            Ok(())
        }
        .scope_boxed()
    })
    .await
}

async fn insert_grant_rows(
    conn: &mut DbConnection<'_>,
    id_publication: i32,
    grants: &GrantSet,
    right_type: &str,
) -> QueryResult<()> {
    let user_ids: Vec<i32> = if grants.users.is_empty() {
        Vec::new()
    } else {
        users::table
            .inner_join(workspaces::table)
            .filter(workspaces::name.eq_any(&grants.users))
            .select(users::id)
            .load(conn)
            .await?
    };

    let rows: Vec<NewRight<'_>> = user_ids
        .into_iter()
        .map(|id_user| NewRight {
            id_publication,
            id_user: Some(id_user),
            role_name: None,
            right_type,
        })
        .chain(grants.roles.iter().map(|role| NewRight {
            id_publication,
            id_user: None,
            role_name: Some(role.as_str()),
            right_type,
        }))
        .collect();

    if rows.is_empty() {
        return Ok(());
    }

    diesel::insert_into(rights::table)
        .values(rows)
        .execute(conn)
        .await?;
    Ok(())
}
