use maud::{html, Markup};

use crate::domain::lead::QualityTier;
use crate::domain::paginate::{Page, PageItem};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn stat_card(label: &str, value: &str) -> Markup {
    html! {
        div class="stat-card" style="text-align: center; padding: 8px 12px;" {
            div class="stat-value" style="font-size: 1.4em; font-weight: bold;" { (value) }
            div class="stat-label" style="font-size: 0.8em; color: #666;" { (label) }
        }
    }
}

pub fn quality_badge(tier: QualityTier) -> Markup {
    let (class, bg) = match tier {
        QualityTier::High => ("quality-high", "#10b981"),
        QualityTier::Medium => ("quality-medium", "#f59e0b"),
        QualityTier::Low => ("quality-low", "#9ca3af"),
    };
    html! {
        span
            class=(class)
            style=(format!("background-color: {bg}; color: white; padding: 2px 8px; border-radius: 10px; font-size: 0.8em;"))
        {
            (tier.label())
        }
    }
}

pub fn status_badge(status: &str) -> Markup {
    let bg = match status {
        "active" => "#10b981",
        "completed" => "#3b82f6",
        _ => "#6b7280",
    };
    html! {
        span
            style=(format!("background-color: {bg}; color: white; padding: 2px 8px; border-radius: 10px; font-size: 0.8em; text-transform: uppercase;"))
        {
            (status)
        }
    }
}

/// Page-selector strip plus the "Showing X-Y of Z" line. Hidden entirely when
/// one page holds everything.
pub fn pagination_nav(page: &Page, window: &[PageItem], page_url: impl Fn(usize) -> String) -> Markup {
    html! {
        @if page.total > 0 {
            p class="muted" style="font-size: 0.85em; color: #666;" {
                "Showing " (page.display_start()) "-" (page.display_end())
                " of " (page.total)
            }
        }
        @if !window.is_empty() {
            nav class="pagination" style="display: flex; gap: 6px; align-items: center;" {
                @if page.has_prev() {
                    a href=(page_url(page.page - 1)) { "Prev" }
                } @else {
                    span style="color: #bbb;" { "Prev" }
                }

                @for item in window {
                    @match item {
                        PageItem::Page(n) => {
                            @if *n == page.page {
                                span style="font-weight: bold;" { (n) }
                            } @else {
                                a href=(page_url(*n)) { (n) }
                            }
                        }
                        PageItem::Ellipsis => {
                            span style="color: #bbb;" { "..." }
                        }
                    }
                }

                @if page.has_next() {
                    a href=(page_url(page.page + 1)) { "Next" }
                } @else {
                    span style="color: #bbb;" { "Next" }
                }
            }
        }
    }
}
