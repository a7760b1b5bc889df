// templates/pages/leads.rs

use crate::domain::collection::Collection;
use crate::domain::filter::{CollectionFilter, DateRange};
use crate::domain::lead::format_date;
use crate::domain::paginate::{Page, PageItem};
use crate::domain::sort::{CollectionSort, CollectionSortKey, SortDir};
use crate::templates::{
    components::{pagination_nav, stat_card},
    panel_layout,
};
use maud::{html, Markup};

pub struct CollectionsVm {
    /// Visible slice after filter, sort, and pagination.
    pub collections: Vec<Collection>,
    /// Rollup over the whole filtered set, not just the visible page.
    pub total_collections: usize,
    pub total_leads: i64,
    /// Contacted leads across every collection the user owns.
    pub contacted: i64,
    pub page: Page,
    pub window: Vec<PageItem>,
    pub sort: CollectionSort,
    pub filter: CollectionFilter,
}

/// Rebuild the list URL for a given page, keeping filter and sort intact.
pub fn collections_url(filter: &CollectionFilter, sort: CollectionSort, page: usize) -> String {
    let mut qs = url::form_urlencoded::Serializer::new(String::new());
    if let Some(min) = filter.lead_count_min {
        qs.append_pair("count_min", &min.to_string());
    }
    if let Some(max) = filter.lead_count_max {
        qs.append_pair("count_max", &max.to_string());
    }
    if filter.date_range != DateRange::All {
        qs.append_pair("range", filter.date_range.as_str());
    }
    qs.append_pair("sort", sort.key.as_str());
    qs.append_pair("dir", sort.dir.as_str());
    if page > 1 {
        qs.append_pair("page", &page.to_string());
    }
    format!("/leads?{}", qs.finish())
}

fn sort_link(vm: &CollectionsVm, label: &str, key: CollectionSortKey) -> Markup {
    let marker = if vm.sort.key == key {
        match vm.sort.dir {
            SortDir::Asc => " \u{25b2}",
            SortDir::Desc => " \u{25bc}",
        }
    } else {
        ""
    };
    html! {
        a href=(collections_url(&vm.filter, vm.sort.toggle(key), 1)) { (label) (marker) }
    }
}

pub fn collections_page(vm: &CollectionsVm) -> Markup {
    panel_layout(
        "Collections",
        true,
        html! {
            main class="container" {
                h1 { "Lead Collections" }

                section class="card" {
                    div style="display: flex; gap: 12px; flex-wrap: wrap;" {
                        (stat_card("Collections", &vm.total_collections.to_string()))
                        (stat_card("Leads", &vm.total_leads.to_string()))
                        (stat_card("Contacted", &vm.contacted.to_string()))
                    }
                }

                section class="card" {
                    h3 { "New collection" }
                    form method="post" action="/collections" style="display: flex; gap: 10px; flex-wrap: wrap; align-items: center;" {
                        label class="sr-only" for="name" { "Name" }
                        input type="text" id="name" name="name" placeholder="Collection name" required;
                        label class="sr-only" for="description" { "Description" }
                        input type="text" id="description" name="description" placeholder="Description (optional)";
                        button type="submit" class="primary" { "Create" }
                    }
                }

                section class="card" {
                    form method="get" action="/leads" style="display: flex; gap: 10px; flex-wrap: wrap; align-items: center;" {
                        label for="count_min" { "Leads" }
                        input type="number" id="count_min" name="count_min" min="0" placeholder="min" style="width: 70px;"
                            value=[vm.filter.lead_count_min.map(|n| n.to_string())];
                        input type="number" name="count_max" min="0" placeholder="max" style="width: 70px;"
                            value=[vm.filter.lead_count_max.map(|n| n.to_string())];

                        label for="range" { "Active within" }
                        select id="range" name="range" {
                            @for (value, label) in [
                                (DateRange::All, "Any time"),
                                (DateRange::Week, "Last week"),
                                (DateRange::Month, "Last month"),
                                (DateRange::Quarter, "Last quarter"),
                                (DateRange::Year, "Last year"),
                            ] {
                                option value=(value.as_str()) selected[vm.filter.date_range == value] { (label) }
                            }
                        }

                        input type="hidden" name="sort" value=(vm.sort.key.as_str());
                        input type="hidden" name="dir" value=(vm.sort.dir.as_str());
                        button type="submit" { "Apply" }
                        a href="/leads" { "Clear" }
                    }
                }

                p {
                    "Sort by: "
                    (sort_link(vm, "Updated", CollectionSortKey::Updated))
                    " | "
                    (sort_link(vm, "Created", CollectionSortKey::Created))
                    " | "
                    (sort_link(vm, "Leads", CollectionSortKey::LeadCount))
                    " | "
                    (sort_link(vm, "Name", CollectionSortKey::Name))
                }

                @if vm.page.total == 0 {
                    section class="card" {
                        p { "No collections match. Create one above or clear the filters." }
                    }
                }

                @for c in &vm.collections {
                    section class="card" {
                        h3 { a href=(format!("/collections/{}", c.id)) { (c.name) } }
                        @if !c.description.is_empty() {
                            p { (c.description) }
                        }
                        p class="muted" style="color: #666; font-size: 0.9em;" {
                            (c.lead_count) " leads | updated " (format_date(c.updated_at))
                        }

                        div style="display: flex; gap: 10px; align-items: center;" {
                            a href=(format!("/collections/{}", c.id)) { "Open" }
                            form method="post" action=(format!("/collections/{}/clone", c.id)) style="margin: 0;" {
                                button type="submit" { "Clone" }
                            }
                            form method="post" action=(format!("/collections/{}/delete", c.id)) style="margin: 0;" {
                                button type="submit" { "Delete" }
                            }
                        }

                        details {
                            summary { "Edit" }
                            form method="post" action=(format!("/collections/{}/edit", c.id)) style="display: flex; gap: 10px; flex-wrap: wrap; margin-top: 8px;" {
                                input type="text" name="name" value=(c.name) required;
                                input type="text" name="description" value=(c.description);
                                button type="submit" { "Save" }
                            }
                        }
                    }
                }

                (pagination_nav(&vm.page, &vm.window, |p| collections_url(&vm.filter, vm.sort, p)))
            }
        },
    )
}
