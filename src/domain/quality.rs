// src/domain/quality.rs
use crate::domain::lead::QualityTier;

/// Likes plus comments on the latest post, relative to follower count, as a
/// percentage. Negative counters clamp to zero; zero followers yields 0.0.
pub fn engagement_rate(likes: i64, comments: i64, followers: i64) -> f64 {
    let likes = likes.max(0);
    let comments = comments.max(0);
    let followers = followers.max(0);
    if followers == 0 {
        return 0.0;
    }
    (likes + comments) as f64 / followers as f64 * 100.0
}

/// Followers per followed account. Following of zero (or below) counts as 1
/// so the ratio stays finite and non-negative.
pub fn follower_ratio(followers: i64, following: i64) -> f64 {
    followers.max(0) as f64 / following.max(1) as f64
}

/// Deterministic tier from raw counters. High needs strong engagement at
/// real scale; Medium takes decent engagement or a large organic-looking
/// account (more followers than follows).
pub fn quality_tier(followers: i64, following: i64, likes: i64, comments: i64) -> QualityTier {
    let rate = engagement_rate(likes, comments, followers);
    let ratio = follower_ratio(followers, following);

    if rate >= 4.0 && followers >= 1_000 {
        QualityTier::High
    } else if rate >= 2.0 || (followers >= 10_000 && ratio >= 1.0) {
        QualityTier::Medium
    } else {
        QualityTier::Low
    }
}

/// Color band for the engagement column. Presentation only: this is not the
/// stored tier.
pub fn engagement_band(rate: f64) -> &'static str {
    if rate >= 4.0 {
        "high"
    } else if rate >= 2.0 {
        "medium"
    } else {
        "low"
    }
}
