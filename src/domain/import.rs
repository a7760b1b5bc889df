// src/domain/import.rs
use std::collections::HashSet;

use url::Url;

pub const HANDLE_MAX_LEN: usize = 30;

/// How the pasted blob should be torn into handle candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    #[default]
    Text,
    Csv,
    UrlList,
}

impl ImportMode {
    pub fn parse(s: &str) -> Option<ImportMode> {
        match s {
            "text" => Some(ImportMode::Text),
            "csv" => Some(ImportMode::Csv),
            "urls" => Some(ImportMode::UrlList),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImportMode::Text => "text",
            ImportMode::Csv => "csv",
            ImportMode::UrlList => "urls",
        }
    }
}

/// Outcome buckets for one import batch. Counts always add up to the number
/// of extracted candidates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub successful: Vec<String>,
    pub duplicates: Vec<String>,
    pub invalid: Vec<String>,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.successful.len() + self.duplicates.len() + self.invalid.len()
    }
}

/// Trim and strip a single leading "@".
pub fn normalize_handle(raw: &str) -> String {
    let h = raw.trim();
    h.strip_prefix('@').unwrap_or(h).trim().to_string()
}

/// 1..=30 characters of letters, digits, underscore, or period.
pub fn is_valid_handle(handle: &str) -> bool {
    !handle.is_empty()
        && handle.chars().count() <= HANDLE_MAX_LEN
        && handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Tear raw input into normalized, non-empty handle candidates. Lines that
/// cannot produce a candidate (blank, bad URL, wrong host) are dropped here
/// and never reach the report.
pub fn extract_handles(raw: &str, mode: ImportMode) -> Vec<String> {
    match mode {
        ImportMode::Text => raw
            .split(['\n', ','])
            .map(normalize_handle)
            .filter(|h| !h.is_empty())
            .collect(),
        ImportMode::Csv => raw
            .lines()
            .skip(1) // header row
            .filter_map(|line| line.split(',').next())
            .map(normalize_handle)
            .filter(|h| !h.is_empty())
            .collect(),
        ImportMode::UrlList => raw
            .lines()
            .filter_map(handle_from_url)
            .map(|h| normalize_handle(&h))
            .filter(|h| !h.is_empty())
            .collect(),
    }
}

/// First path segment of an instagram.com URL, scheme optional.
fn handle_from_url(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let candidate = if line.contains("://") {
        line.to_string()
    } else {
        format!("https://{line}")
    };
    let parsed = Url::parse(&candidate).ok()?;
    let host = parsed.host_str()?;
    if host != "instagram.com" && !host.ends_with(".instagram.com") {
        return None;
    }
    parsed
        .path_segments()?
        .find(|seg| !seg.is_empty())
        .map(|seg| seg.to_string())
}

/// Validate and dedupe one batch. `existing` holds handles already in the
/// target collection; comparison is case-insensitive on both sides, and the
/// first occurrence within the batch wins.
pub fn run_import(raw: &str, mode: ImportMode, existing: &[String]) -> ImportReport {
    let known: HashSet<String> = existing.iter().map(|h| h.to_lowercase()).collect();
    let mut seen_in_batch: HashSet<String> = HashSet::new();
    let mut report = ImportReport::default();

    for handle in extract_handles(raw, mode) {
        if !is_valid_handle(&handle) {
            report.invalid.push(handle);
            continue;
        }
        let folded = handle.to_lowercase();
        if known.contains(&folded) || !seen_in_batch.insert(folded) {
            report.duplicates.push(handle);
            continue;
        }
        report.successful.push(handle);
    }

    report
}
