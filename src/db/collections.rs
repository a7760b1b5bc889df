// src/db/collections.rs
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::collection::{clone_name, Collection, CollectionCriteria};
use crate::errors::ServerError;

fn row_to_collection(r: &Row) -> rusqlite::Result<Collection> {
    let criteria_json: String = r.get(4)?;
    Ok(Collection {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        description: r.get(3)?,
        criteria: CollectionCriteria::from_json(&criteria_json),
        lead_count: r.get(5)?,
        created_at: r.get(6)?,
        updated_at: r.get(7)?,
    })
}

const COLLECTION_COLS: &str =
    "id, user_id, name, description, criteria, lead_count, created_at, updated_at";

pub fn create_collection(
    conn: &Connection,
    user_id: i64,
    name: &str,
    description: &str,
    criteria: &CollectionCriteria,
    now: i64,
) -> Result<i64, ServerError> {
    conn.execute(
        "insert into collections (user_id, name, description, criteria, created_at, updated_at)
         values (?, ?, ?, ?, ?, ?)",
        params![user_id, name, description, criteria.to_json(), now, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert collection failed: {e}")))?;
    Ok(conn.last_insert_rowid())
}

/// All of a user's collections, most recently updated first.
pub fn list_collections(conn: &Connection, user_id: i64) -> Result<Vec<Collection>, ServerError> {
    let mut stmt = conn
        .prepare(&format!(
            "select {COLLECTION_COLS} from collections where user_id = ? order by updated_at desc, id desc"
        ))
        .map_err(|e| ServerError::DbError(format!("prepare list collections failed: {e}")))?;

    let rows = stmt
        .query_map(params![user_id], row_to_collection)
        .map_err(|e| ServerError::DbError(format!("query collections failed: {e}")))?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| ServerError::DbError(format!("read collection row failed: {e}")))
}

/// A single collection, owner-checked. Missing and foreign rows look alike.
pub fn get_collection(
    conn: &Connection,
    id: i64,
    user_id: i64,
) -> Result<Option<Collection>, ServerError> {
    conn.query_row(
        &format!("select {COLLECTION_COLS} from collections where id = ? and user_id = ?"),
        params![id, user_id],
        row_to_collection,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select collection failed: {e}")))
}

pub fn update_collection(
    conn: &Connection,
    id: i64,
    user_id: i64,
    name: &str,
    description: &str,
    now: i64,
) -> Result<bool, ServerError> {
    let updated = conn
        .execute(
            "update collections set name = ?, description = ?, updated_at = ?
             where id = ? and user_id = ?",
            params![name, description, now, id, user_id],
        )
        .map_err(|e| ServerError::DbError(format!("update collection failed: {e}")))?;
    Ok(updated == 1)
}

/// Deletes the collection; leads go with it via the FK cascade.
pub fn delete_collection(conn: &Connection, id: i64, user_id: i64) -> Result<bool, ServerError> {
    let deleted = conn
        .execute(
            "delete from collections where id = ? and user_id = ?",
            params![id, user_id],
        )
        .map_err(|e| ServerError::DbError(format!("delete collection failed: {e}")))?;
    Ok(deleted == 1)
}

/// Copies name (prefixed), description, and criteria. Leads are not copied,
/// so the clone starts at zero.
pub fn clone_collection(
    conn: &Connection,
    id: i64,
    user_id: i64,
    now: i64,
) -> Result<Option<i64>, ServerError> {
    let Some(original) = get_collection(conn, id, user_id)? else {
        return Ok(None);
    };
    let new_id = create_collection(
        conn,
        user_id,
        &clone_name(&original.name),
        &original.description,
        &original.criteria,
        now,
    )?;
    Ok(Some(new_id))
}

/// Shift the denormalized count and bump recency on the parent.
pub fn bump_lead_count(
    conn: &Connection,
    collection_id: i64,
    delta: i64,
    now: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "update collections set lead_count = lead_count + ?, updated_at = ? where id = ?",
        params![delta, now, collection_id],
    )
    .map_err(|e| ServerError::DbError(format!("bump lead_count failed: {e}")))?;
    Ok(())
}

/// Contacted leads across every collection the user owns.
pub fn count_contacted_leads(conn: &Connection, user_id: i64) -> Result<i64, ServerError> {
    conn.query_row(
        "select count(*)
         from leads l
         join collections c on c.id = l.collection_id
         where c.user_id = ? and l.contacted_at is not null",
        params![user_id],
        |r| r.get(0),
    )
    .map_err(|e| ServerError::DbError(format!("count contacted leads failed: {e}")))
}
