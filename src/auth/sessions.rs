// src/auth/sessions.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::auth::token::{generate_token_default, hash_token};
use crate::errors::ServerError;

pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7; // 7 days

/// The signed-in identity resolved from a session token.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: i64,
    pub email: String,
    pub expires_at: i64,
}

/// Mint a session row and hand back the raw token for the cookie. Only the
/// hash is stored.
pub fn create_session(conn: &Connection, user_id: i64, now: i64) -> Result<String, ServerError> {
    let raw_token = generate_token_default();
    let hash = hash_token(&raw_token);
    let expires_at = now + SESSION_TTL_SECS;

    conn.execute(
        r#"
        insert into sessions (user_id, token_hash, created_at, expires_at)
        values (?, ?, ?, ?)
        "#,
        params![user_id, hash.as_slice(), now, expires_at],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

    Ok(raw_token)
}

pub fn load_user_from_session(
    conn: &Connection,
    raw_token: &str,
    now: i64,
) -> Result<Option<SessionUser>, ServerError> {
    let hash = hash_token(raw_token);

    conn.query_row(
        r#"
        select u.id, u.email, s.expires_at
        from sessions s
        join users u on u.id = s.user_id
        where s.token_hash = ?
          and s.expires_at > ?
          and s.revoked_at is null
        "#,
        params![hash.as_slice(), now],
        |row| {
            Ok(SessionUser {
                user_id: row.get(0)?,
                email: row.get(1)?,
                expires_at: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))
}

/// Marks the session revoked and reports whose it was. Revoking an unknown or
/// already-revoked token is a no-op.
pub fn revoke_session(
    conn: &Connection,
    raw_token: &str,
    now: i64,
) -> Result<Option<i64>, ServerError> {
    let hash = hash_token(raw_token);

    let user_id: Option<i64> = conn
        .query_row(
            "select user_id from sessions where token_hash = ? and revoked_at is null",
            params![hash.as_slice()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))?;

    let Some(user_id) = user_id else {
        return Ok(None);
    };
    conn.execute(
        "update sessions set revoked_at = ? where token_hash = ?",
        params![now, hash.as_slice()],
    )
    .map_err(|e| ServerError::DbError(format!("revoke session failed: {e}")))?;
    Ok(Some(user_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::auth::{apply_schema, get_or_create_user};

    fn setup() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn);
        let user_id = get_or_create_user(&conn, "user@example.com", 100).unwrap();
        (conn, user_id)
    }

    #[test]
    fn create_then_load_round_trips() {
        let (conn, user_id) = setup();
        let token = create_session(&conn, user_id, 1000).unwrap();

        let loaded = load_user_from_session(&conn, &token, 1000).unwrap().unwrap();
        assert_eq!(loaded.user_id, user_id);
        assert_eq!(loaded.email, "user@example.com");
        assert_eq!(loaded.expires_at, 1000 + SESSION_TTL_SECS);
    }

    #[test]
    fn expired_session_does_not_load() {
        let (conn, user_id) = setup();
        let token = create_session(&conn, user_id, 1000).unwrap();

        let at_expiry = 1000 + SESSION_TTL_SECS;
        assert!(load_user_from_session(&conn, &token, at_expiry).unwrap().is_none());
    }

    #[test]
    fn unknown_token_does_not_load() {
        let (conn, _) = setup();
        assert!(load_user_from_session(&conn, "not-a-token", 1000).unwrap().is_none());
    }

    #[test]
    fn revoke_blocks_further_loads() {
        let (conn, user_id) = setup();
        let token = create_session(&conn, user_id, 1000).unwrap();

        assert_eq!(revoke_session(&conn, &token, 2000).unwrap(), Some(user_id));
        assert!(load_user_from_session(&conn, &token, 2000).unwrap().is_none());
        // Second revoke is a no-op.
        assert_eq!(revoke_session(&conn, &token, 3000).unwrap(), None);
    }
}
