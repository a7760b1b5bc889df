use std::io::Read;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use astra::{Body, Request, Response};
use http::Method;

use crate::auth::hub::SessionHub;
use crate::auth::otp::{OtpConfig, OtpService};
use crate::auth::sessions;
use crate::db::auth::get_or_create_user;
use crate::db::connection::{init_db, Database};
use crate::mailer::{Mailer, MailerError};
use crate::router::App;

/// Records outgoing login codes so tests can complete the sign-in flow.
pub struct CapturingMailer {
    pub outbox: Arc<Mutex<Vec<(String, String)>>>,
}

impl Mailer for CapturingMailer {
    fn send_login_code(&self, to_email: &str, code: &str) -> Result<(), MailerError> {
        self.outbox
            .lock()
            .unwrap()
            .push((to_email.to_string(), code.to_string()));
        Ok(())
    }
}

/// Fresh database on the production schema, with a unique path per call so
/// tests can run in parallel.
pub fn make_db() -> Database {
    let path = std::env::temp_dir().join(format!(
        "leadpanel_test_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db, "sql/schema.sql").expect("Failed to initialize DB");
    db
}

/// App wired like production, except mail lands in the returned outbox
/// instead of going anywhere.
pub fn make_app() -> (App, Arc<Mutex<Vec<(String, String)>>>) {
    let outbox = Arc::new(Mutex::new(Vec::new()));
    let app = App {
        db: make_db(),
        hub: SessionHub::new(),
        otp: OtpService::new(OtpConfig::default()),
        mailer: Box::new(CapturingMailer {
            outbox: outbox.clone(),
        }),
    };
    (app, outbox)
}

pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Create (or reuse) a user and mint a live session, skipping the email
/// round trip. Returns the raw cookie token.
pub fn sign_in(app: &App, email: &str) -> String {
    app.db
        .with_conn(|conn| {
            let user_id = get_or_create_user(conn, email, now_unix())?;
            sessions::create_session(conn, user_id, now_unix())
        })
        .expect("Failed to create test session")
}

pub fn get(path: &str) -> Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_session(path: &str, token: &str) -> Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(path)
        .header("Cookie", format!("session={token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(path: &str, token: &str, form: &str) -> Request {
    http::Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("Cookie", format!("session={token}"))
        .body(Body::from(form.as_bytes().to_vec()))
        .unwrap()
}

pub fn post_form_anon(path: &str, form: &str) -> Request {
    http::Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form.as_bytes().to_vec()))
        .unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body()
        .reader()
        .read_to_string(&mut body)
        .unwrap();
    body
}
