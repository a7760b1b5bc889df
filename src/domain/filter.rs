// src/domain/filter.rs
use crate::domain::collection::Collection;
use crate::domain::lead::{Lead, QualityTier, DAY_SECS};

/// Relative cutoff buckets used by list filters. `All` is the no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    All,
    Week,
    Month,
    Quarter,
    Year,
}

impl DateRange {
    pub fn parse(s: &str) -> Option<DateRange> {
        match s {
            "all" => Some(DateRange::All),
            "week" => Some(DateRange::Week),
            "month" => Some(DateRange::Month),
            "quarter" => Some(DateRange::Quarter),
            "year" => Some(DateRange::Year),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DateRange::All => "all",
            DateRange::Week => "week",
            DateRange::Month => "month",
            DateRange::Quarter => "quarter",
            DateRange::Year => "year",
        }
    }

    /// Timestamps on/after the cutoff pass; None means no constraint.
    pub fn cutoff(self, now: i64) -> Option<i64> {
        let days = match self {
            DateRange::All => return None,
            DateRange::Week => 7,
            DateRange::Month => 30,
            DateRange::Quarter => 90,
            DateRange::Year => 365,
        };
        Some(now - days * DAY_SECS)
    }
}

/// Predicates over a lead list. Every field is optional and absent fields
/// impose no constraint; present fields combine conjunctively.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub search: Option<String>,
    pub min_followers: Option<i64>,
    pub max_followers: Option<i64>,
    pub min_engagement: Option<f64>,
    pub max_engagement: Option<f64>,
    pub quality: Option<Vec<QualityTier>>,
    pub tags: Option<Vec<String>>,
    pub contacted: Option<bool>,
    pub last_activity_days: Option<i64>,
}

impl LeadFilter {
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.min_followers.is_none()
            && self.max_followers.is_none()
            && self.min_engagement.is_none()
            && self.max_engagement.is_none()
            && self.quality.as_deref().map_or(true, |q| q.is_empty())
            && self.tags.as_deref().map_or(true, |t| t.is_empty())
            && self.contacted.is_none()
            && self.last_activity_days.is_none()
    }

    pub fn matches(&self, lead: &Lead, now: i64) -> bool {
        if let Some(q) = &self.search {
            let q = q.trim().to_lowercase();
            if !q.is_empty() {
                let in_handle = lead.handle.to_lowercase().contains(&q);
                let in_name = lead
                    .full_name
                    .as_deref()
                    .map(|n| n.to_lowercase().contains(&q))
                    .unwrap_or(false);
                let in_notes = lead.notes.to_lowercase().contains(&q);
                if !in_handle && !in_name && !in_notes {
                    return false;
                }
            }
        }
        if let Some(min) = self.min_followers {
            if lead.followers < min {
                return false;
            }
        }
        if let Some(max) = self.max_followers {
            if lead.followers > max {
                return false;
            }
        }
        if let Some(min) = self.min_engagement {
            if lead.engagement_rate < min {
                return false;
            }
        }
        if let Some(max) = self.max_engagement {
            if lead.engagement_rate > max {
                return false;
            }
        }
        if let Some(tiers) = &self.quality {
            if !tiers.is_empty() && !tiers.contains(&lead.quality) {
                return false;
            }
        }
        if let Some(tags) = &self.tags {
            if !tags.is_empty() && !lead.tags.iter().any(|t| tags.contains(t)) {
                return false;
            }
        }
        if let Some(want) = self.contacted {
            if lead.is_contacted() != want {
                return false;
            }
        }
        if let Some(days) = self.last_activity_days {
            let cutoff = now - days * DAY_SECS;
            match lead.last_post_at {
                Some(at) if at >= cutoff => {}
                _ => return false,
            }
        }
        true
    }

    /// Drops non-matching leads, preserving input order.
    pub fn apply(&self, leads: &mut Vec<Lead>, now: i64) {
        leads.retain(|lead| self.matches(lead, now));
    }
}

/// Predicates over the collections list screen.
#[derive(Debug, Clone, Default)]
pub struct CollectionFilter {
    pub lead_count_min: Option<i64>,
    pub lead_count_max: Option<i64>,
    pub date_range: DateRange,
}

impl CollectionFilter {
    pub fn matches(&self, collection: &Collection, now: i64) -> bool {
        if let Some(min) = self.lead_count_min {
            if collection.lead_count < min {
                return false;
            }
        }
        if let Some(max) = self.lead_count_max {
            if collection.lead_count > max {
                return false;
            }
        }
        // The list screen cuts on recency of activity, not creation.
        if let Some(cutoff) = self.date_range.cutoff(now) {
            if collection.updated_at < cutoff {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, collections: &mut Vec<Collection>, now: i64) {
        collections.retain(|c| self.matches(c, now));
    }
}
