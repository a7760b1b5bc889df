// src/db/auth.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct LoginCodeRow {
    pub id: i64,
    pub email: String,
    pub created_at: i64,
    pub expires_at: i64,
    pub used_at: Option<i64>,
}

/// Insert a user if they don't exist, then return the user id.
/// Email should already be normalized by caller (trim/lowercase).
pub fn get_or_create_user(conn: &Connection, email: &str, now: i64) -> Result<i64, ServerError> {
    conn.execute(
        "insert or ignore into users (email, created_at) values (?, ?)",
        params![email, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert user failed: {e}")))?;

    let id: i64 = conn
        .query_row(
            "select id from users where email = ?",
            params![email],
            |row| row.get(0),
        )
        .map_err(|e| ServerError::DbError(format!("select user id failed: {e}")))?;

    Ok(id)
}

pub fn touch_last_login(conn: &Connection, user_id: i64, now: i64) -> Result<(), ServerError> {
    conn.execute(
        "update users set last_login_at = ? where id = ?",
        params![now, user_id],
    )
    .map_err(|e| ServerError::DbError(format!("update last_login_at failed: {e}")))?;
    Ok(())
}

/// When the latest code for this email was issued, if any. Drives the
/// resend cooldown.
pub fn latest_code_issued_at(conn: &Connection, email: &str) -> Result<Option<i64>, ServerError> {
    conn.query_row(
        "select created_at from login_codes where email = ? order by id desc limit 1",
        params![email],
        |r| r.get(0),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select latest code failed: {e}")))
}

/// Insert a login code row (code_hash should be SHA-256 bytes). Any unused
/// earlier codes for the same email are superseded.
pub fn insert_login_code(
    conn: &Connection,
    email: &str,
    code_hash: &[u8],
    created_at: i64,
    expires_at: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "delete from login_codes where email = ? and used_at is null",
        params![email],
    )
    .map_err(|e| ServerError::DbError(format!("supersede login codes failed: {e}")))?;

    conn.execute(
        "insert into login_codes (email, code_hash, created_at, expires_at) values (?, ?, ?, ?)",
        params![email, code_hash, created_at, expires_at],
    )
    .map_err(|e| ServerError::DbError(format!("insert login code failed: {e}")))?;
    Ok(())
}

/// Consume a login code for an email:
/// - must exist with a matching hash
/// - must be unexpired (expires_at > now)
/// - must be unused (used_at is null)
/// If valid, sets used_at=now and returns Ok(true). A wrong code leaves the
/// stored one untouched.
///
/// Uses a transaction to prevent double-use races.
pub fn consume_login_code(
    conn: &mut Connection,
    email: &str,
    code_hash: &[u8],
    now: i64,
) -> Result<bool, ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let row: Option<LoginCodeRow> = tx
        .query_row(
            "select id, email, created_at, expires_at, used_at
             from login_codes
             where email = ? and code_hash = ?",
            params![email, code_hash],
            |r| {
                Ok(LoginCodeRow {
                    id: r.get(0)?,
                    email: r.get(1)?,
                    created_at: r.get(2)?,
                    expires_at: r.get(3)?,
                    used_at: r.get(4)?,
                })
            },
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select login code in tx failed: {e}")))?;

    let Some(code) = row else {
        tx.rollback().ok();
        return Ok(false);
    };

    if code.used_at.is_some() || code.expires_at <= now {
        tx.rollback().ok();
        return Ok(false);
    }

    // Guard used_at IS NULL so only one consumer wins.
    let updated = tx
        .execute(
            "update login_codes set used_at = ?
             where id = ? and used_at is null",
            params![now, code.id],
        )
        .map_err(|e| ServerError::DbError(format!("update login code used_at failed: {e}")))?;

    if updated != 1 {
        tx.rollback().ok();
        return Ok(false);
    }

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;

    Ok(true)
}

#[cfg(test)]
pub(crate) fn apply_schema(conn: &Connection) {
    conn.execute_batch(include_str!("../../sql/schema.sql")).unwrap();
}
