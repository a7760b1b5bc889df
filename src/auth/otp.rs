// src/auth/otp.rs
use rusqlite::Connection;

use crate::auth::token::{generate_login_code_default, hash_token};
use crate::db::auth as db_auth;
use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// TTL for login codes in seconds.
    pub code_ttl_secs: i64,
    /// Minimum gap between two codes for the same email.
    pub resend_cooldown_secs: i64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_ttl_secs: 10 * 60,
            resend_cooldown_secs: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub email: String,
    /// Raw code (never store this in DB).
    pub code: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone)]
pub struct VerifiedLogin {
    pub user_id: i64,
    pub email: String,
}

pub struct OtpService {
    cfg: OtpConfig,
}

impl OtpService {
    pub fn new(cfg: OtpConfig) -> Self {
        Self { cfg }
    }

    /// Trim + lowercase, minimal sanity check.
    pub fn normalize_email(email: &str) -> Result<String, ServerError> {
        let e = email.trim().to_lowercase();
        if e.is_empty() || !e.contains('@') || e.starts_with('@') || e.ends_with('@') {
            return Err(ServerError::BadRequest("invalid email".into()));
        }
        Ok(e)
    }

    /// Request a login code (signup + login unified):
    /// - normalize email
    /// - enforce the resend cooldown
    /// - insert the code (store hash only; supersedes unused earlier codes)
    ///
    /// No user row yet: that happens on verify. Email sending is the
    /// caller's job via the mailer.
    pub fn request_code(
        &self,
        conn: &Connection,
        email: &str,
        now: i64,
    ) -> Result<IssuedCode, ServerError> {
        let email = Self::normalize_email(email)?;

        if let Some(issued_at) = db_auth::latest_code_issued_at(conn, &email)? {
            let elapsed = now - issued_at;
            if elapsed < self.cfg.resend_cooldown_secs {
                let wait = self.cfg.resend_cooldown_secs - elapsed;
                return Err(ServerError::BadRequest(format!(
                    "please wait {wait}s before requesting another code"
                )));
            }
        }

        let code = generate_login_code_default();
        let code_hash = hash_token(&code);
        let expires_at = now + self.cfg.code_ttl_secs;

        db_auth::insert_login_code(conn, &email, &code_hash, now, expires_at)?;

        Ok(IssuedCode {
            email,
            code,
            expires_at,
        })
    }

    /// Verify a login code:
    /// - hash code
    /// - consume_login_code (transactional single-use)
    /// - create the user row on first successful login
    pub fn verify_code(
        &self,
        conn: &mut Connection,
        email: &str,
        code: &str,
        now: i64,
    ) -> Result<VerifiedLogin, ServerError> {
        let email = Self::normalize_email(email)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(ServerError::BadRequest("missing code".into()));
        }

        let code_hash = hash_token(code);
        if !db_auth::consume_login_code(conn, &email, &code_hash, now)? {
            return Err(ServerError::Unauthorized("invalid or expired code".into()));
        }

        let user_id = db_auth::get_or_create_user(conn, &email, now)?;
        db_auth::touch_last_login(conn, user_id, now)?;

        Ok(VerifiedLogin { user_id, email })
    }
}
