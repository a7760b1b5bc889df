// src/domain/paginate.rs

/// Presets carried over from the panel design tokens.
pub const COLLECTIONS_PER_PAGE: usize = 3;
pub const COLLECTIONS_MAX_VISIBLE: usize = 3;
pub const LEADS_PER_PAGE: usize = 10;
pub const LEADS_MAX_VISIBLE: usize = 7;

/// One resolved page over `total` items. `start..end` is always a valid
/// slice range for a list of that length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub start: usize,
    pub end: usize,
}

impl Page {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-based bounds for "Showing X-Y of Z" copy.
    pub fn display_start(&self) -> usize {
        ((self.page - 1) * self.per_page + 1).min(self.total)
    }

    pub fn display_end(&self) -> usize {
        (self.page * self.per_page).min(self.total)
    }
}

/// Resolve a requested page against the item count. Out-of-range requests
/// clamp rather than error; `per_page` of 0 is treated as 1.
pub fn paginate(total: usize, per_page: usize, requested: usize) -> Page {
    let per_page = per_page.max(1);
    let total_pages = if total == 0 {
        1
    } else {
        (total + per_page - 1) / per_page
    };
    let page = requested.clamp(1, total_pages);
    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total);
    Page {
        page,
        per_page,
        total,
        total_pages,
        start,
        end,
    }
}

/// An entry in the page-selector strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Sliding window of page numbers with ellipsis markers. Empty when there is
/// a single page, so callers can hide the strip entirely.
pub fn page_numbers(current: usize, total_pages: usize, max_visible: usize) -> Vec<PageItem> {
    if total_pages <= 1 {
        return Vec::new();
    }
    if total_pages <= max_visible {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    // Reserve slots for page 1, an ellipsis, and the last page.
    let side = max_visible.saturating_sub(3) / 2;
    let mut items = Vec::new();

    if current <= side + 2 {
        for p in 1..=max_visible.saturating_sub(2).max(1) {
            items.push(PageItem::Page(p));
        }
        items.push(PageItem::Ellipsis);
        items.push(PageItem::Page(total_pages));
    } else if current >= total_pages - side - 1 {
        items.push(PageItem::Page(1));
        items.push(PageItem::Ellipsis);
        for p in (total_pages + 3).saturating_sub(max_visible)..=total_pages {
            items.push(PageItem::Page(p));
        }
    } else {
        items.push(PageItem::Page(1));
        items.push(PageItem::Ellipsis);
        for p in (current - side)..=(current + side) {
            items.push(PageItem::Page(p));
        }
        items.push(PageItem::Ellipsis);
        items.push(PageItem::Page(total_pages));
    }

    items
}
