// templates/pages/collection_detail.rs

use chrono::{TimeZone, Utc};
use maud::{html, Markup};

use crate::domain::collection::Collection;
use crate::domain::filter::LeadFilter;
use crate::domain::import::{ImportMode, ImportReport};
use crate::domain::lead::{activity_status, format_compact, format_date, Lead, QualityTier};
use crate::domain::paginate::{Page, PageItem};
use crate::domain::quality::engagement_band;
use crate::domain::sort::{LeadSort, LeadSortKey, SortDir};
use crate::domain::stats::CollectionStats;
use crate::templates::components::{pagination_nav, quality_badge, stat_card};
use crate::templates::panel_layout;

pub struct CollectionDetailVm {
    pub collection: Collection,
    pub stats: CollectionStats,
    /// Visible slice after filter, sort, and pagination.
    pub leads: Vec<Lead>,
    pub page: Page,
    pub window: Vec<PageItem>,
    pub sort: LeadSort,
    pub filter: LeadFilter,
    pub import_report: Option<ImportReport>,
    pub now: i64,
}

/// Rebuild the detail URL for a given page, keeping filter and sort intact.
pub fn detail_url(collection_id: i64, filter: &LeadFilter, sort: LeadSort, page: usize) -> String {
    let mut qs = url::form_urlencoded::Serializer::new(String::new());
    if let Some(q) = filter.search.as_deref() {
        if !q.trim().is_empty() {
            qs.append_pair("search", q);
        }
    }
    if let Some(n) = filter.min_followers {
        qs.append_pair("min_followers", &n.to_string());
    }
    if let Some(n) = filter.max_followers {
        qs.append_pair("max_followers", &n.to_string());
    }
    if let Some(n) = filter.min_engagement {
        qs.append_pair("min_engagement", &n.to_string());
    }
    if let Some(n) = filter.max_engagement {
        qs.append_pair("max_engagement", &n.to_string());
    }
    for tier in filter.quality.as_deref().unwrap_or(&[]) {
        qs.append_pair("quality", tier.as_str());
    }
    for tag in filter.tags.as_deref().unwrap_or(&[]) {
        qs.append_pair("tag", tag);
    }
    if let Some(contacted) = filter.contacted {
        qs.append_pair("contacted", if contacted { "yes" } else { "no" });
    }
    if let Some(days) = filter.last_activity_days {
        qs.append_pair("active_days", &days.to_string());
    }
    qs.append_pair("sort", sort.key.as_str());
    qs.append_pair("dir", sort.dir.as_str());
    if page > 1 {
        qs.append_pair("page", &page.to_string());
    }
    format!("/collections/{}?{}", collection_id, qs.finish())
}

fn sort_header(vm: &CollectionDetailVm, label: &str, key: LeadSortKey) -> Markup {
    let marker = if vm.sort.key == key {
        match vm.sort.dir {
            SortDir::Asc => " \u{25b2}",
            SortDir::Desc => " \u{25bc}",
        }
    } else {
        ""
    };
    html! {
        th {
            a href=(detail_url(vm.collection.id, &vm.filter, vm.sort.toggle(key), 1)) {
                (label) (marker)
            }
        }
    }
}

/// "@a, @b, @c and 4 more"
fn handle_preview(handles: &[String]) -> String {
    let shown: Vec<String> = handles.iter().take(3).map(|h| format!("@{h}")).collect();
    let mut out = shown.join(", ");
    if handles.len() > 3 {
        out.push_str(&format!(" and {} more", handles.len() - 3));
    }
    out
}

fn import_summary(report: &ImportReport) -> Markup {
    html! {
        section class="card" style="border-left: 4px solid #3b82f6;" {
            h3 { "Import results" }
            p {
                "Added " strong { (report.successful.len()) }
                " of " (report.total()) " handles."
            }
            @if !report.duplicates.is_empty() {
                p style="color: #b45309;" {
                    (report.duplicates.len()) " duplicates skipped: "
                    (handle_preview(&report.duplicates))
                }
            }
            @if !report.invalid.is_empty() {
                p style="color: #dc2626;" {
                    (report.invalid.len()) " invalid: "
                    (handle_preview(&report.invalid))
                }
            }
        }
    }
}

fn date_input_value(ts: Option<i64>) -> String {
    match ts.and_then(|t| Utc.timestamp_opt(t, 0).single()) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

fn stats_bar(stats: &CollectionStats) -> Markup {
    html! {
        section class="card" {
            div style="display: flex; gap: 12px; flex-wrap: wrap;" {
                (stat_card("Leads", &stats.total.to_string()))
                (stat_card("High", &stats.high.to_string()))
                (stat_card("Medium", &stats.medium.to_string()))
                (stat_card("Low", &stats.low.to_string()))
                (stat_card("Avg engagement", &format!("{:.1}%", stats.avg_engagement)))
                (stat_card("Avg followers", &format_compact(stats.avg_followers.round() as i64)))
                (stat_card("Contacted", &stats.contacted.to_string()))
                (stat_card("Active 7d", &stats.active_last_7d.to_string()))
            }
        }
    }
}

fn filter_form(vm: &CollectionDetailVm) -> Markup {
    let f = &vm.filter;
    let selected_tiers = f.quality.as_deref().unwrap_or(&[]);
    let tag_value = f
        .tags
        .as_deref()
        .map(|t| t.join(", "))
        .unwrap_or_default();

    html! {
        section class="card" {
            form method="get" action=(format!("/collections/{}", vm.collection.id)) {
                div style="display: flex; gap: 10px; flex-wrap: wrap; align-items: center;" {
                    input type="search" name="search" placeholder="Search handle, name, notes"
                        value=[f.search.as_deref()];

                    label { "Followers" }
                    input type="number" name="min_followers" min="0" placeholder="min" style="width: 80px;"
                        value=[f.min_followers.map(|n| n.to_string())];
                    input type="number" name="max_followers" min="0" placeholder="max" style="width: 80px;"
                        value=[f.max_followers.map(|n| n.to_string())];

                    label { "Engagement %" }
                    input type="number" name="min_engagement" min="0" step="0.1" placeholder="min" style="width: 70px;"
                        value=[f.min_engagement.map(|n| n.to_string())];
                    input type="number" name="max_engagement" min="0" step="0.1" placeholder="max" style="width: 70px;"
                        value=[f.max_engagement.map(|n| n.to_string())];
                }

                div style="display: flex; gap: 10px; flex-wrap: wrap; align-items: center; margin-top: 8px;" {
                    fieldset style="border: none; display: inline; padding: 0;" {
                        @for tier in [QualityTier::High, QualityTier::Medium, QualityTier::Low] {
                            label {
                                input type="checkbox" name="quality" value=(tier.as_str())
                                    checked[selected_tiers.contains(&tier)];
                                " " (tier.label())
                            }
                        }
                    }

                    label { "Tag" }
                    input type="text" name="tag" placeholder="e.g. fitness" style="width: 100px;"
                        value=(tag_value);

                    label { "Contacted" }
                    select name="contacted" {
                        option value="" selected[f.contacted.is_none()] { "Any" }
                        option value="yes" selected[f.contacted == Some(true)] { "Yes" }
                        option value="no" selected[f.contacted == Some(false)] { "No" }
                    }

                    label { "Last post" }
                    select name="active_days" {
                        option value="" selected[f.last_activity_days.is_none()] { "Any time" }
                        option value="1" selected[f.last_activity_days == Some(1)] { "Today" }
                        option value="7" selected[f.last_activity_days == Some(7)] { "This week" }
                        option value="30" selected[f.last_activity_days == Some(30)] { "This month" }
                    }

                    input type="hidden" name="sort" value=(vm.sort.key.as_str());
                    input type="hidden" name="dir" value=(vm.sort.dir.as_str());
                    button type="submit" { "Apply" }
                    a href=(format!("/collections/{}", vm.collection.id)) { "Clear" }
                }
            }
        }
    }
}

fn lead_row(vm: &CollectionDetailVm, lead: &Lead) -> Markup {
    html! {
        tr {
            td {
                strong { "@" (lead.handle) }
                @if let Some(name) = &lead.full_name {
                    br;
                    span style="color: #666; font-size: 0.85em;" { (name) }
                }
                @if !lead.tags.is_empty() {
                    br;
                    span style="color: #3b82f6; font-size: 0.8em;" { (lead.tags.join(", ")) }
                }
            }
            td { (format_compact(lead.followers)) }
            td {
                (format!("{:.1}%", lead.engagement_rate))
                br;
                span style="color: #666; font-size: 0.8em;" { (engagement_band(lead.engagement_rate)) }
            }
            td { (quality_badge(lead.quality)) }
            td { (activity_status(lead.last_post_at, vm.now)) }
            td { (format_date(lead.created_at)) }
            td {
                form method="post" action=(format!("/leads/{}/contact", lead.id)) style="margin: 0;" {
                    @if lead.is_contacted() {
                        button type="submit" title="Clear contacted" { "Contacted" }
                    } @else {
                        button type="submit" class="primary" { "Mark contacted" }
                    }
                }
            }
            td {
                details {
                    summary { "More" }
                    div style="padding: 8px; min-width: 260px;" {
                        form method="post" action=(format!("/leads/{}/notes", lead.id)) {
                            label { "Notes" }
                            textarea name="notes" rows="2" style="width: 100%;" { (lead.notes) }
                            button type="submit" { "Save notes" }
                        }
                        form method="post" action=(format!("/leads/{}/tags", lead.id)) style="margin-top: 6px;" {
                            label { "Tags (comma separated)" }
                            input type="text" name="tags" style="width: 100%;" value=(lead.tags.join(", "));
                            button type="submit" { "Save tags" }
                        }
                        form method="post" action=(format!("/leads/{}/metrics", lead.id)) style="margin-top: 6px;" {
                            label { "Metrics" }
                            input type="text" name="full_name" placeholder="Full name" value=[lead.full_name.as_deref()];
                            input type="number" name="followers" min="0" placeholder="Followers" value=(lead.followers);
                            input type="number" name="following" min="0" placeholder="Following" value=(lead.following);
                            input type="number" name="posts" min="0" placeholder="Posts" value=(lead.posts);
                            input type="number" name="likes" min="0" placeholder="Last post likes" value=(lead.last_post_likes);
                            input type="number" name="comments" min="0" placeholder="Last post comments" value=(lead.last_post_comments);
                            input type="date" name="last_post" value=(date_input_value(lead.last_post_at));
                            button type="submit" { "Update metrics" }
                        }
                        form method="post" action=(format!("/leads/{}/delete", lead.id)) style="margin-top: 6px;" {
                            button type="submit" style="color: #dc2626;" { "Delete lead" }
                        }
                    }
                }
            }
        }
    }
}

pub fn collection_detail_page(vm: &CollectionDetailVm) -> Markup {
    panel_layout(
        &vm.collection.name,
        true,
        html! {
            main class="container" {
                p { a href="/leads" { "Back to collections" } }
                h1 { (vm.collection.name) }
                @if !vm.collection.description.is_empty() {
                    p { (vm.collection.description) }
                }

                @if let Some(report) = &vm.import_report {
                    (import_summary(report))
                }

                (stats_bar(&vm.stats))
                (filter_form(vm))

                section class="card" {
                    details {
                        summary { "Import leads" }
                        form method="post" action=(format!("/collections/{}/import", vm.collection.id)) style="margin-top: 8px;" {
                            label for="mode" { "Format" }
                            select id="mode" name="mode" {
                                option value=(ImportMode::Text.as_str()) { "Handles (one per line or comma separated)" }
                                option value=(ImportMode::Csv.as_str()) { "CSV (first column, header skipped)" }
                                option value=(ImportMode::UrlList.as_str()) { "Profile URLs (one per line)" }
                            }
                            textarea name="data" rows="6" style="width: 100%; margin-top: 6px;"
                                placeholder="@handle_one\nhandle.two\nhttps://instagram.com/handle_three" {}
                            button type="submit" class="primary" { "Import" }
                        }
                    }
                    p {
                        a href=(format!("/collections/{}/export", vm.collection.id)) { "Download XLSX" }
                    }
                }

                @if vm.page.total == 0 {
                    section class="card" {
                        @if vm.filter.is_empty() {
                            p { "No leads yet. Import some handles above to get started." }
                        } @else {
                            p { "No leads match the current filters." }
                        }
                    }
                } @else {
                    table style="width: 100%; border-collapse: collapse;" {
                        thead {
                            tr {
                                (sort_header(vm, "Handle", LeadSortKey::Handle))
                                (sort_header(vm, "Followers", LeadSortKey::Followers))
                                (sort_header(vm, "Engagement", LeadSortKey::Engagement))
                                (sort_header(vm, "Quality", LeadSortKey::Quality))
                                th { "Activity" }
                                (sort_header(vm, "Added", LeadSortKey::DateAdded))
                                th { "Contact" }
                                th {}
                            }
                        }
                        tbody {
                            @for lead in &vm.leads {
                                (lead_row(vm, lead))
                            }
                        }
                    }
                }

                (pagination_nav(&vm.page, &vm.window, |p| {
                    detail_url(vm.collection.id, &vm.filter, vm.sort, p)
                }))
            }
        },
    )
}
