//! Query composition for `publications`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::{publications, workspaces};
use crate::model::publication::{NewPublication, Publication};

/// ## Summary
/// Loads a publication by its (workspace, type, name) triple.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get_by_name(
    conn: &mut DbConnection<'_>,
    workspace: &str,
    publication_type: &str,
    name: &str,
) -> QueryResult<Option<Publication>> {
    publications::table
        .inner_join(workspaces::table)
        .filter(workspaces::name.eq(workspace))
        .filter(publications::publication_type.eq(publication_type))
        .filter(publications::name.eq(name))
        .select(Publication::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Loads a publication by its UUID, together with its workspace name.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get_by_uuid(
    conn: &mut DbConnection<'_>,
    uuid: Uuid,
) -> QueryResult<Option<(Publication, String)>> {
    publications::table
        .inner_join(workspaces::table)
        .filter(publications::uuid.eq(uuid))
        .select((Publication::as_select(), workspaces::name))
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Lists all publications of one type in a workspace, ordered by name.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list_by_workspace(
    conn: &mut DbConnection<'_>,
    workspace: &str,
    publication_type: &str,
) -> QueryResult<Vec<Publication>> {
    publications::table
        .inner_join(workspaces::table)
        .filter(workspaces::name.eq(workspace))
        .filter(publications::publication_type.eq(publication_type))
        .order(publications::name.asc())
        .select(Publication::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Inserts a publication record and returns the stored row.
///
/// ## Errors
/// Returns an error if the database operation fails, including unique
/// violations when the (workspace, type, name) triple is already taken.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    publication: &NewPublication<'_>,
) -> QueryResult<Publication> {
    diesel::insert_into(publications::table)
        .values(publication)
        .returning(Publication::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Updates the title of a publication.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn update_title(
    conn: &mut DbConnection<'_>,
    id_publication: i32,
    title: &str,
) -> QueryResult<()> {
    diesel::update(publications::table.find(id_publication))
        .set(publications::title.eq(title))
        .execute(conn)
        .await?;
    Ok(())
}

/// ## Summary
/// Deletes a publication record; `rights` rows cascade.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete_by_id(conn: &mut DbConnection<'_>, id_publication: i32) -> QueryResult<()> {
    diesel::delete(publications::table.find(id_publication))
        .execute(conn)
        .await?;
    Ok(())
}
