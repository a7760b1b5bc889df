// src/domain/stats.rs
use crate::domain::lead::{Lead, QualityTier, DAY_SECS};

/// Rollup shown above the lead table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollectionStats {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub avg_engagement: f64,
    pub avg_followers: f64,
    pub contacted: usize,
    pub active_last_7d: usize,
}

pub fn collection_stats(leads: &[Lead], now: i64) -> CollectionStats {
    let mut stats = CollectionStats {
        total: leads.len(),
        ..Default::default()
    };
    if leads.is_empty() {
        return stats;
    }

    let cutoff = now - 7 * DAY_SECS;
    let mut engagement_sum = 0.0;
    let mut follower_sum: i64 = 0;

    for lead in leads {
        match lead.quality {
            QualityTier::High => stats.high += 1,
            QualityTier::Medium => stats.medium += 1,
            QualityTier::Low => stats.low += 1,
        }
        engagement_sum += lead.engagement_rate;
        follower_sum += lead.followers;
        if lead.is_contacted() {
            stats.contacted += 1;
        }
        if matches!(lead.last_post_at, Some(at) if at >= cutoff) {
            stats.active_last_7d += 1;
        }
    }

    stats.avg_engagement = engagement_sum / leads.len() as f64;
    stats.avg_followers = follower_sum as f64 / leads.len() as f64;
    stats
}
