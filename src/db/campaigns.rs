// src/db/campaigns.rs
use rusqlite::{params, Connection, Row};

use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct Campaign {
    pub id: i64,
    pub user_id: i64,
    pub collection_id: Option<i64>,
    pub name: String,
    pub status: String,
    pub budget_cents: i64,
    /// Lead count of the source collection when the campaign was created.
    pub lead_snapshot: i64,
    pub started_at: Option<i64>,
    pub created_at: i64,
}

fn row_to_campaign(r: &Row) -> rusqlite::Result<Campaign> {
    Ok(Campaign {
        id: r.get(0)?,
        user_id: r.get(1)?,
        collection_id: r.get(2)?,
        name: r.get(3)?,
        status: r.get(4)?,
        budget_cents: r.get(5)?,
        lead_snapshot: r.get(6)?,
        started_at: r.get(7)?,
        created_at: r.get(8)?,
    })
}

pub fn list_campaigns(conn: &Connection, user_id: i64) -> Result<Vec<Campaign>, ServerError> {
    let mut stmt = conn
        .prepare(
            "select id, user_id, collection_id, name, status, budget_cents, lead_snapshot,
                    started_at, created_at
             from campaigns where user_id = ? order by created_at desc, id desc",
        )
        .map_err(|e| ServerError::DbError(format!("prepare list campaigns failed: {e}")))?;

    let rows = stmt
        .query_map(params![user_id], row_to_campaign)
        .map_err(|e| ServerError::DbError(format!("query campaigns failed: {e}")))?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| ServerError::DbError(format!("read campaign row failed: {e}")))
}

/// New campaigns start as drafts and freeze the source collection's current
/// lead count as their snapshot.
pub fn create_campaign(
    conn: &Connection,
    user_id: i64,
    collection_id: i64,
    name: &str,
    budget_cents: i64,
    lead_snapshot: i64,
    now: i64,
) -> Result<i64, ServerError> {
    conn.execute(
        "insert into campaigns (user_id, collection_id, name, status, budget_cents,
                                lead_snapshot, created_at)
         values (?, ?, ?, 'draft', ?, ?, ?)",
        params![user_id, collection_id, name, budget_cents, lead_snapshot, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert campaign failed: {e}")))?;
    Ok(conn.last_insert_rowid())
}
