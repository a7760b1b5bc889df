use crate::auth::hub::{SessionEvent, SessionHub};
use crate::auth::otp::{OtpConfig, OtpService};
use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::responses::error_to_response;
use crate::router::{handle, App};
use astra::Server;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod mailer;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = AppConfig::from_env();

    let db = Database::new(cfg.db_path.clone());
    if let Err(e) = init_db(&db, "sql/schema.sql") {
        tracing::error!("database initialization failed: {e}");
        std::process::exit(1);
    }

    let hub = SessionHub::new();
    hub.subscribe(|event| match event {
        SessionEvent::SignedIn { user_id, email } => {
            tracing::info!("user {user_id} signed in as {email}")
        }
        SessionEvent::SignedOut { user_id } => tracing::info!("user {user_id} signed out"),
    });

    let app = App {
        db,
        hub,
        otp: OtpService::new(OtpConfig::default()),
        mailer: mailer::from_config(&cfg),
    };

    let addr: SocketAddr = match cfg.bind_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("invalid BIND_ADDR {:?}: {e}", cfg.bind_addr);
            std::process::exit(1);
        }
    };
    tracing::info!("listening on http://{addr}");

    let server = Server::bind(&addr).max_workers(8);

    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        tracing::error!("server ended with error: {e}");
    }
}
