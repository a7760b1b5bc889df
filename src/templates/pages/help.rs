use crate::templates::{components::card, panel_layout};
use maud::{html, Markup};

const GUIDES: [(&str, &str); 4] = [
    (
        "Getting Started",
        "Create a collection, import Instagram handles, and work through them with filters and sorting.",
    ),
    (
        "Importing leads",
        "Paste handles one per line or comma separated, upload CSV content (first column, header skipped), or paste profile URLs.",
    ),
    (
        "Quality tiers",
        "Each lead is scored High, Medium, or Low from engagement rate, follower count, and follower ratio when its metrics are saved.",
    ),
    (
        "Exporting",
        "Every collection can be downloaded as a spreadsheet from its detail page.",
    ),
];

const FAQ: [(&str, &str); 4] = [
    (
        "How do I add new leads?",
        "Open a collection and use the import form. Handles are validated, deduplicated, and added in one step.",
    ),
    (
        "Can I import leads from CSV?",
        "Yes. Choose the CSV format in the import form; the first column of each row after the header is read as a handle.",
    ),
    (
        "How do I track outreach?",
        "Mark leads as contacted from the collection table and keep notes per lead. The stats bar shows contacted counts at a glance.",
    ),
    (
        "Is my data secure?",
        "Sessions use hashed random tokens and sign-in codes are single use. Your collections are only visible to your account.",
    ),
];

pub fn help_page(signed_in: bool) -> Markup {
    panel_layout(
        "Help",
        signed_in,
        html! {
            main class="container" {
                h1 { "Help & Support" }
                p class="lead" { "Find answers to common questions and get support." }

                @for (title, description) in GUIDES {
                    (card(title, html! { p { (description) } }))
                }

                section class="card" {
                    h2 { "Frequently Asked Questions" }
                    @for (question, answer) in FAQ {
                        div style="margin-bottom: 12px;" {
                            h4 style="margin-bottom: 4px;" { (question) }
                            p style="color: #666;" { (answer) }
                        }
                    }
                }

                section class="card" {
                    p style="text-align: center; color: #666;" {
                        "Can't find what you're looking for? "
                        a href="mailto:support@leadpanel.local" { "Contact support" }
                    }
                }
            }
        },
    )
}
