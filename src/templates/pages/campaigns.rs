use crate::db::campaigns::Campaign;
use crate::domain::collection::Collection;
use crate::domain::lead::format_date;
use crate::templates::components::{stat_card, status_badge};
use crate::templates::panel_layout;
use maud::{html, Markup};

pub struct CampaignsVm {
    pub campaigns: Vec<Campaign>,
    /// The user's collections, for the launch form.
    pub collections: Vec<Collection>,
}

fn budget_display(cents: i64) -> String {
    format!("${}", cents / 100)
}

pub fn campaigns_page(vm: &CampaignsVm) -> Markup {
    let active = vm.campaigns.iter().filter(|c| c.status == "active").count();
    let total_leads: i64 = vm.campaigns.iter().map(|c| c.lead_snapshot).sum();

    panel_layout(
        "Campaigns",
        true,
        html! {
            main class="container" {
                h1 { "Campaign Management" }

                section class="card" {
                    div style="display: flex; gap: 12px; flex-wrap: wrap;" {
                        (stat_card("Total", &vm.campaigns.len().to_string()))
                        (stat_card("Active", &active.to_string()))
                        (stat_card("Total Leads", &total_leads.to_string()))
                    }
                }

                section class="card" {
                    h3 { "New campaign" }
                    @if vm.collections.is_empty() {
                        p { "Create a " a href="/leads" { "collection" } " first, then launch a campaign from it." }
                    } @else {
                        form method="post" action="/campaigns" style="display: flex; gap: 10px; flex-wrap: wrap; align-items: center;" {
                            label class="sr-only" for="name" { "Campaign name" }
                            input type="text" id="name" name="name" placeholder="Campaign name" required;

                            label for="collection_id" { "From collection" }
                            select id="collection_id" name="collection_id" required {
                                @for c in &vm.collections {
                                    option value=(c.id) { (c.name) " (" (c.lead_count) " leads)" }
                                }
                            }

                            label for="budget" { "Budget $" }
                            input type="number" id="budget" name="budget" min="0" value="0" style="width: 90px;";

                            button type="submit" class="primary" { "Create draft" }
                        }
                    }
                }

                @if vm.campaigns.is_empty() {
                    section class="card" {
                        p { "No campaigns yet." }
                    }
                }

                @for campaign in &vm.campaigns {
                    section class="card" {
                        div style="display: flex; justify-content: space-between; align-items: center;" {
                            h3 style="margin: 0;" { (campaign.name) }
                            (status_badge(&campaign.status))
                        }
                        p class="muted" style="color: #666; font-size: 0.9em;" {
                            "Budget: " (budget_display(campaign.budget_cents))
                            " | " (campaign.lead_snapshot) " leads"
                            " | Started: "
                            @match campaign.started_at {
                                Some(at) => (format_date(at)),
                                None => "not yet",
                            }
                        }
                    }
                }

                section class="card" {
                    p style="text-align: center; color: #666;" {
                        "Advanced campaign features coming soon..."
                    }
                }
            }
        },
    )
}
