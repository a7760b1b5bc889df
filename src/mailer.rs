// src/mailer.rs

use reqwest::blocking::Client;
use serde::Serialize;
use std::error::Error;
use std::fmt;

use crate::config::AppConfig;

#[derive(Debug)]
pub enum MailerError {
    RequestFailed(String),
    ApiError(String),
}

impl fmt::Display for MailerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailerError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            MailerError::ApiError(msg) => write!(f, "API error: {}", msg),
        }
    }
}

impl Error for MailerError {}

/// Delivery of one-time login codes. The router only talks to this trait, so
/// dev setups can run without a mail API key.
pub trait Mailer {
    fn send_login_code(&self, to_email: &str, code: &str) -> Result<(), MailerError>;
}

/// Picks the HTTP mailer when an API key is configured, otherwise a logger
/// that prints the code.
pub fn from_config(cfg: &AppConfig) -> Box<dyn Mailer + Send + Sync> {
    match &cfg.mail_api_key {
        Some(key) => Box::new(BrevoMailer::new(
            key.clone(),
            cfg.mail_from.clone(),
            cfg.mail_from_name.clone(),
        )),
        None => Box::new(LogMailer),
    }
}

pub struct BrevoMailer {
    api_key: String,
    sender_email: String,
    sender_name: String,
    client: Client,
}

#[derive(Serialize)]
struct BrevoSender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct BrevoRecipient<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoPayload<'a> {
    sender: BrevoSender<'a>,
    to: Vec<BrevoRecipient<'a>>,
    subject: &'a str,
    html_content: String,
}

impl BrevoMailer {
    pub fn new(api_key: String, sender_email: String, sender_name: String) -> Self {
        Self {
            api_key,
            sender_email,
            sender_name,
            client: Client::new(),
        }
    }
}

impl Mailer for BrevoMailer {
    fn send_login_code(&self, to_email: &str, code: &str) -> Result<(), MailerError> {
        let subject = "Your sign-in code";
        let html_content = format!(
            r#"
            <h1>Sign in to Lead Panel</h1>
            <p>Enter this code to sign in. It expires in 10 minutes.</p>
            <p style="font-size: 2em; letter-spacing: 0.3em; font-weight: bold;">{}</p>
            <p>If you did not request a code, you can safely ignore this email.</p>
        "#,
            code
        );

        let payload = BrevoPayload {
            sender: BrevoSender {
                name: &self.sender_name,
                email: &self.sender_email,
            },
            to: vec![BrevoRecipient { email: to_email }],
            subject,
            html_content,
        };

        let resp = self
            .client
            .post("https://api.brevo.com/v3/smtp/email")
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let error_body = resp.text().unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MailerError::ApiError(format!(
                "Failed to send email: {}",
                error_body
            )));
        }

        Ok(())
    }
}

/// Dev fallback: the code lands in the server log instead of an inbox.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send_login_code(&self, to_email: &str, code: &str) -> Result<(), MailerError> {
        tracing::info!("login code for {to_email}: {code}");
        Ok(())
    }
}
