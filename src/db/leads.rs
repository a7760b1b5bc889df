// src/db/leads.rs
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::collections::bump_lead_count;
use crate::domain::lead::{Lead, QualityTier};
use crate::domain::quality::{engagement_rate, follower_ratio, quality_tier};
use crate::errors::ServerError;

const LEAD_COLS: &str = "id, collection_id, handle, full_name, followers, following, posts, \
     last_post_at, last_post_likes, last_post_comments, engagement_rate, quality, \
     follower_ratio, contacted_at, notes, tags, created_at, updated_at";

fn row_to_lead(r: &Row) -> rusqlite::Result<Lead> {
    let quality_raw: String = r.get(11)?;
    let tags_json: String = r.get(15)?;
    Ok(Lead {
        id: r.get(0)?,
        collection_id: r.get(1)?,
        handle: r.get(2)?,
        full_name: r.get(3)?,
        followers: r.get(4)?,
        following: r.get(5)?,
        posts: r.get(6)?,
        last_post_at: r.get(7)?,
        last_post_likes: r.get(8)?,
        last_post_comments: r.get(9)?,
        engagement_rate: r.get(10)?,
        quality: QualityTier::parse(&quality_raw).unwrap_or(QualityTier::Low),
        follower_ratio: r.get(12)?,
        contacted_at: r.get(13)?,
        notes: r.get(14)?,
        tags: serde_json::from_str(&tags_json).unwrap_or_default(),
        created_at: r.get(16)?,
        updated_at: r.get(17)?,
    })
}

/// Inserts one lead per handle with zeroed counters, then adjusts the parent
/// collection's count. Returns how many rows were written.
pub fn insert_leads(
    conn: &Connection,
    collection_id: i64,
    handles: &[String],
    now: i64,
) -> Result<usize, ServerError> {
    if handles.is_empty() {
        return Ok(0);
    }
    // Fresh rows have no metrics yet, so the derived columns start from zeros.
    let rate = engagement_rate(0, 0, 0);
    let ratio = follower_ratio(0, 0);
    let tier = quality_tier(0, 0, 0, 0);

    let mut stmt = conn
        .prepare(
            "insert into leads (collection_id, handle, engagement_rate, quality, follower_ratio,
                                created_at, updated_at)
             values (?, ?, ?, ?, ?, ?, ?)",
        )
        .map_err(|e| ServerError::DbError(format!("prepare insert lead failed: {e}")))?;
    for handle in handles {
        stmt.execute(params![
            collection_id,
            handle,
            rate,
            tier.as_str(),
            ratio,
            now,
            now
        ])
        .map_err(|e| ServerError::DbError(format!("insert lead failed: {e}")))?;
    }
    bump_lead_count(conn, collection_id, handles.len() as i64, now)?;
    Ok(handles.len())
}

/// Every lead in a collection, in insertion order.
pub fn list_leads(conn: &Connection, collection_id: i64) -> Result<Vec<Lead>, ServerError> {
    let mut stmt = conn
        .prepare(&format!(
            "select {LEAD_COLS} from leads where collection_id = ? order by id"
        ))
        .map_err(|e| ServerError::DbError(format!("prepare list leads failed: {e}")))?;

    let rows = stmt
        .query_map(params![collection_id], row_to_lead)
        .map_err(|e| ServerError::DbError(format!("query leads failed: {e}")))?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| ServerError::DbError(format!("read lead row failed: {e}")))
}

/// Handles already present in a collection, for import deduplication.
/// Case folding happens in the import engine.
pub fn existing_handles(conn: &Connection, collection_id: i64) -> Result<Vec<String>, ServerError> {
    let mut stmt = conn
        .prepare("select handle from leads where collection_id = ?")
        .map_err(|e| ServerError::DbError(format!("prepare existing handles failed: {e}")))?;

    let rows = stmt
        .query_map(params![collection_id], |r| r.get::<_, String>(0))
        .map_err(|e| ServerError::DbError(format!("query handles failed: {e}")))?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| ServerError::DbError(format!("read handle failed: {e}")))
}

/// A single lead, owner-checked through its parent collection.
pub fn get_lead(conn: &Connection, id: i64, user_id: i64) -> Result<Option<Lead>, ServerError> {
    conn.query_row(
        "select l.id, l.collection_id, l.handle, l.full_name, l.followers, l.following,
                l.posts, l.last_post_at, l.last_post_likes, l.last_post_comments,
                l.engagement_rate, l.quality, l.follower_ratio, l.contacted_at, l.notes,
                l.tags, l.created_at, l.updated_at
         from leads l
         join collections c on c.id = l.collection_id
         where l.id = ? and c.user_id = ?",
        params![id, user_id],
        row_to_lead,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select lead failed: {e}")))
}

/// Flips the contact state. Returns the state after the write, or None when
/// the row does not exist.
pub fn toggle_contacted(
    conn: &Connection,
    id: i64,
    now: i64,
) -> Result<Option<bool>, ServerError> {
    let current: Option<Option<i64>> = conn
        .query_row("select contacted_at from leads where id = ?", params![id], |r| {
            r.get(0)
        })
        .optional()
        .map_err(|e| ServerError::DbError(format!("select contacted_at failed: {e}")))?;

    let Some(current) = current else {
        return Ok(None);
    };
    let next: Option<i64> = if current.is_some() { None } else { Some(now) };
    conn.execute(
        "update leads set contacted_at = ?, updated_at = ? where id = ?",
        params![next, now, id],
    )
    .map_err(|e| ServerError::DbError(format!("toggle contacted failed: {e}")))?;
    Ok(Some(next.is_some()))
}

pub fn set_notes(conn: &Connection, id: i64, notes: &str, now: i64) -> Result<bool, ServerError> {
    let updated = conn
        .execute(
            "update leads set notes = ?, updated_at = ? where id = ?",
            params![notes, now, id],
        )
        .map_err(|e| ServerError::DbError(format!("set notes failed: {e}")))?;
    Ok(updated == 1)
}

pub fn set_tags(conn: &Connection, id: i64, tags: &[String], now: i64) -> Result<bool, ServerError> {
    let tags_json = serde_json::to_string(tags)
        .map_err(|e| ServerError::DbError(format!("encode tags failed: {e}")))?;
    let updated = conn
        .execute(
            "update leads set tags = ?, updated_at = ? where id = ?",
            params![tags_json, now, id],
        )
        .map_err(|e| ServerError::DbError(format!("set tags failed: {e}")))?;
    Ok(updated == 1)
}

/// Removes the lead and decrements the parent collection's count.
pub fn delete_lead(conn: &Connection, id: i64, now: i64) -> Result<bool, ServerError> {
    let collection_id: Option<i64> = conn
        .query_row("select collection_id from leads where id = ?", params![id], |r| {
            r.get(0)
        })
        .optional()
        .map_err(|e| ServerError::DbError(format!("select lead parent failed: {e}")))?;

    let Some(collection_id) = collection_id else {
        return Ok(false);
    };
    conn.execute("delete from leads where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete lead failed: {e}")))?;
    bump_lead_count(conn, collection_id, -1, now)?;
    Ok(true)
}

/// The explicit metrics edit. Counters clamp at zero and the derived columns
/// are recomputed from the clamped values.
#[allow(clippy::too_many_arguments)]
pub fn update_metrics(
    conn: &Connection,
    id: i64,
    full_name: Option<&str>,
    followers: i64,
    following: i64,
    posts: i64,
    likes: i64,
    comments: i64,
    last_post_at: Option<i64>,
    now: i64,
) -> Result<bool, ServerError> {
    let followers = followers.max(0);
    let following = following.max(0);
    let posts = posts.max(0);
    let likes = likes.max(0);
    let comments = comments.max(0);

    let rate = engagement_rate(likes, comments, followers);
    let ratio = follower_ratio(followers, following);
    let tier = quality_tier(followers, following, likes, comments);

    let updated = conn
        .execute(
            "update leads set full_name = ?, followers = ?, following = ?, posts = ?,
                    last_post_likes = ?, last_post_comments = ?, last_post_at = ?,
                    engagement_rate = ?, quality = ?, follower_ratio = ?, updated_at = ?
             where id = ?",
            params![
                full_name,
                followers,
                following,
                posts,
                likes,
                comments,
                last_post_at,
                rate,
                tier.as_str(),
                ratio,
                now,
                id
            ],
        )
        .map_err(|e| ServerError::DbError(format!("update metrics failed: {e}")))?;
    Ok(updated == 1)
}
