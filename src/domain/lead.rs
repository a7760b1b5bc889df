// src/domain/lead.rs
use chrono::{TimeZone, Utc};

pub const DAY_SECS: i64 = 24 * 60 * 60;

/// Coarse desirability tier. Variant order matters: `Ord` must put
/// High above Medium above Low so descending sorts lead with High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

impl QualityTier {
    /// Stable string form used in the DB and in query params.
    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::High => "high",
            QualityTier::Medium => "medium",
            QualityTier::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<QualityTier> {
        match s {
            "high" => Some(QualityTier::High),
            "medium" => Some(QualityTier::Medium),
            "low" => Some(QualityTier::Low),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityTier::High => "High",
            QualityTier::Medium => "Medium",
            QualityTier::Low => "Low",
        }
    }
}

/// A tracked Instagram prospect. The derived columns (`engagement_rate`,
/// `quality`, `follower_ratio`) are written by the quality calculator when
/// counters are written and never recomputed on read.
#[derive(Debug, Clone)]
pub struct Lead {
    pub id: i64,
    pub collection_id: i64,
    pub handle: String,
    pub full_name: Option<String>,
    pub followers: i64,
    pub following: i64,
    pub posts: i64,
    pub last_post_at: Option<i64>,
    pub last_post_likes: i64,
    pub last_post_comments: i64,
    pub engagement_rate: f64,
    pub quality: QualityTier,
    pub follower_ratio: f64,
    pub contacted_at: Option<i64>,
    pub notes: String,
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Lead {
    pub fn is_contacted(&self) -> bool {
        self.contacted_at.is_some()
    }
}

/// Compact counter display: 1_234_567 -> "1.2M", 45_600 -> "45.6K",
/// always one decimal above a thousand.
pub fn format_compact(n: i64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Recency label for the lead table.
pub fn activity_status(last_post_at: Option<i64>, now: i64) -> &'static str {
    let Some(at) = last_post_at else {
        return "No posts";
    };
    let days = (now - at) / DAY_SECS;
    if days <= 1 {
        "Active today"
    } else if days <= 7 {
        "Active this week"
    } else if days <= 30 {
        "Active this month"
    } else {
        "Inactive"
    }
}

/// Short human date for timestamps, e.g. "Jan 5, 2026".
pub fn format_date(ts: i64) -> String {
    match Utc.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_strings_round_trip() {
        for tier in [QualityTier::High, QualityTier::Medium, QualityTier::Low] {
            assert_eq!(QualityTier::parse(tier.as_str()), Some(tier));
        }
        assert_eq!(QualityTier::parse("great"), None);
    }

    #[test]
    fn tier_ordering_puts_high_on_top() {
        assert!(QualityTier::High > QualityTier::Medium);
        assert!(QualityTier::Medium > QualityTier::Low);
    }

    #[test]
    fn format_compact_bands() {
        assert_eq!(format_compact(0), "0");
        assert_eq!(format_compact(999), "999");
        assert_eq!(format_compact(1_000), "1.0K");
        assert_eq!(format_compact(45_600), "45.6K");
        assert_eq!(format_compact(1_000_000), "1.0M");
        assert_eq!(format_compact(1_234_567), "1.2M");
    }

    #[test]
    fn activity_status_bands() {
        let now = 1_000_000;
        assert_eq!(activity_status(None, now), "No posts");
        assert_eq!(activity_status(Some(now), now), "Active today");
        assert_eq!(activity_status(Some(now - DAY_SECS), now), "Active today");
        assert_eq!(activity_status(Some(now - 3 * DAY_SECS), now), "Active this week");
        assert_eq!(activity_status(Some(now - 20 * DAY_SECS), now), "Active this month");
        assert_eq!(activity_status(Some(now - 31 * DAY_SECS), now), "Inactive");
    }

    #[test]
    fn format_date_renders_utc() {
        // 2026-01-05 00:00:00 UTC
        assert_eq!(format_date(1_767_571_200), "Jan 5, 2026");
    }
}
