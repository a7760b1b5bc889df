use crate::templates::panel_layout;
use maud::{html, Markup};

pub fn login_page(error: Option<&str>) -> Markup {
    panel_layout(
        "Sign in",
        false,
        html! {
            main class="container narrow" {
                h1 { "Welcome to Lead Panel" }
                p class="lead" {
                    "Organize Instagram prospects into collections, score their"
                    " engagement, and track your outreach."
                }

                @if let Some(msg) = error {
                    p class="error" style="color: #dc2626;" { (msg) }
                }

                form method="post" action="/auth/request-code" class="email-cta" {
                    label class="sr-only" for="email" { "Email address" }
                    input
                        type="email"
                        id="email"
                        name="email"
                        placeholder="you@domain.com"
                        autocomplete="email"
                        required;

                    button type="submit" class="primary" { "Send code" }

                    p class="microcopy" {
                        "We'll email you a six-digit sign-in code. No password needed."
                    }
                }
            }
        },
    )
}

/// Second step: the code entry form. The email rides along in hidden fields
/// so verify and resend both know who asked.
pub fn code_page(email: &str, error: Option<&str>) -> Markup {
    panel_layout(
        "Enter your code",
        false,
        html! {
            main class="container narrow" {
                h1 { "Check your email" }
                p class="lead" {
                    "We sent a sign-in code to " strong { (email) } "."
                }

                @if let Some(msg) = error {
                    p class="error" style="color: #dc2626;" { (msg) }
                }

                form method="post" action="/auth/verify-code" class="email-cta" {
                    input type="hidden" name="email" value=(email);

                    label class="sr-only" for="code" { "Sign-in code" }
                    input
                        type="text"
                        id="code"
                        name="code"
                        placeholder="123456"
                        inputmode="numeric"
                        autocomplete="one-time-code"
                        maxlength="6"
                        required;

                    button type="submit" class="primary" { "Sign in" }
                }

                form method="post" action="/auth/request-code" style="margin-top: 1rem;" {
                    input type="hidden" name="email" value=(email);
                    button type="submit" { "Resend code" }
                }

                p {
                    a href="/login" { "Try with a different email" }
                }
            }
        },
    )
}
