// templates/pages/home.rs

use crate::domain::collection::Collection;
use crate::domain::lead::format_date;
use crate::templates::{components::stat_card, panel_layout};
use maud::{html, Markup};

pub struct HomeVm {
    pub email: String,
    pub collection_count: usize,
    pub lead_count: i64,
    pub contacted_count: i64,
    pub campaign_count: usize,
    /// Most recently updated collections, newest first.
    pub recent: Vec<Collection>,
}

pub fn home_page(vm: &HomeVm) -> Markup {
    panel_layout(
        "Home",
        true,
        html! {
            main class="container" {
                h1 { "Overview" }
                p { "Signed in as " strong { (vm.email) } }

                section class="card" {
                    div style="display: flex; gap: 12px; flex-wrap: wrap;" {
                        (stat_card("Collections", &vm.collection_count.to_string()))
                        (stat_card("Leads", &vm.lead_count.to_string()))
                        (stat_card("Contacted", &vm.contacted_count.to_string()))
                        (stat_card("Campaigns", &vm.campaign_count.to_string()))
                    }
                }

                section class="card" {
                    h3 { "Quick actions" }
                    ul {
                        li {
                            a href="/leads" { "Manage leads" }
                            " | view and organize your collections"
                        }
                        li {
                            a href="/campaigns" { "View campaigns" }
                            " | check campaign status"
                        }
                        li {
                            a href="/help" { "Help" }
                            " | guides and FAQ"
                        }
                    }
                }

                section class="card" {
                    h3 { "Recent collections" }
                    @if vm.recent.is_empty() {
                        p { "Nothing yet. " a href="/leads" { "Create your first collection" } "." }
                    } @else {
                        ul {
                            @for c in &vm.recent {
                                li {
                                    a href=(format!("/collections/{}", c.id)) { (c.name) }
                                    " (" (c.lead_count) " leads, updated " (format_date(c.updated_at)) ")"
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
