// src/domain/sort.rs
use std::cmp::Ordering;

use crate::domain::collection::Collection;
use crate::domain::lead::Lead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn flip(self) -> SortDir {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }

    pub fn parse(s: &str) -> Option<SortDir> {
        match s {
            "asc" => Some(SortDir::Asc),
            "desc" => Some(SortDir::Desc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    fn order(self, ord: Ordering) -> Ordering {
        match self {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    }
}

/// Sortable columns of the lead table. One typed comparator per key instead
/// of looking fields up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadSortKey {
    Handle,
    Followers,
    Engagement,
    Quality,
    DateAdded,
}

impl LeadSortKey {
    pub fn parse(s: &str) -> Option<LeadSortKey> {
        match s {
            "handle" => Some(LeadSortKey::Handle),
            "followers" => Some(LeadSortKey::Followers),
            "engagement" => Some(LeadSortKey::Engagement),
            "quality" => Some(LeadSortKey::Quality),
            "date_added" => Some(LeadSortKey::DateAdded),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LeadSortKey::Handle => "handle",
            LeadSortKey::Followers => "followers",
            LeadSortKey::Engagement => "engagement",
            LeadSortKey::Quality => "quality",
            LeadSortKey::DateAdded => "date_added",
        }
    }

    fn compare(self, a: &Lead, b: &Lead) -> Ordering {
        match self {
            LeadSortKey::Handle => a
                .handle
                .to_lowercase()
                .cmp(&b.handle.to_lowercase()),
            LeadSortKey::Followers => a.followers.cmp(&b.followers),
            LeadSortKey::Engagement => cmp_f64(a.engagement_rate, b.engagement_rate),
            LeadSortKey::Quality => a.quality.cmp(&b.quality),
            LeadSortKey::DateAdded => a.created_at.cmp(&b.created_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadSort {
    pub key: LeadSortKey,
    pub dir: SortDir,
}

impl Default for LeadSort {
    fn default() -> Self {
        // The detail screen opens sorted by reach.
        LeadSort {
            key: LeadSortKey::Followers,
            dir: SortDir::Desc,
        }
    }
}

impl LeadSort {
    /// Selecting the active column flips direction; a new column starts
    /// descending.
    pub fn toggle(self, key: LeadSortKey) -> LeadSort {
        if self.key == key {
            LeadSort {
                key,
                dir: self.dir.flip(),
            }
        } else {
            LeadSort {
                key,
                dir: SortDir::Desc,
            }
        }
    }
}

/// Stable sort, so ties keep their prior relative order.
pub fn sort_leads(leads: &mut [Lead], sort: LeadSort) {
    leads.sort_by(|a, b| sort.dir.order(sort.key.compare(a, b)));
}

/// Sortable columns of the collections list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionSortKey {
    Updated,
    Created,
    LeadCount,
    Name,
}

impl CollectionSortKey {
    pub fn parse(s: &str) -> Option<CollectionSortKey> {
        match s {
            "updated" => Some(CollectionSortKey::Updated),
            "created" => Some(CollectionSortKey::Created),
            "lead_count" => Some(CollectionSortKey::LeadCount),
            "name" => Some(CollectionSortKey::Name),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CollectionSortKey::Updated => "updated",
            CollectionSortKey::Created => "created",
            CollectionSortKey::LeadCount => "lead_count",
            CollectionSortKey::Name => "name",
        }
    }

    fn compare(self, a: &Collection, b: &Collection) -> Ordering {
        match self {
            CollectionSortKey::Updated => a.updated_at.cmp(&b.updated_at),
            CollectionSortKey::Created => a.created_at.cmp(&b.created_at),
            CollectionSortKey::LeadCount => a.lead_count.cmp(&b.lead_count),
            CollectionSortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSort {
    pub key: CollectionSortKey,
    pub dir: SortDir,
}

impl Default for CollectionSort {
    fn default() -> Self {
        CollectionSort {
            key: CollectionSortKey::Updated,
            dir: SortDir::Desc,
        }
    }
}

impl CollectionSort {
    pub fn toggle(self, key: CollectionSortKey) -> CollectionSort {
        if self.key == key {
            CollectionSort {
                key,
                dir: self.dir.flip(),
            }
        } else {
            CollectionSort {
                key,
                dir: SortDir::Desc,
            }
        }
    }
}

pub fn sort_collections(collections: &mut [Collection], sort: CollectionSort) {
    collections.sort_by(|a, b| sort.dir.order(sort.key.compare(a, b)));
}

// Stored engagement rates are finite, so any incomparable pair ties.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
