use maud::{html, Markup, DOCTYPE};

pub fn panel_layout(title: &str, signed_in: bool, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="icon" href="/static/favicon/favicon.ico";
                link rel="stylesheet" href="/static/main.css";
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    svg
                        xmlns="http://www.w3.org/2000/svg"
                        width="24"
                        height="24"
                        viewBox="0 0 24 24"
                        fill="none"
                        stroke="#524ed2"
                        stroke-width="2"
                        stroke-linecap="round"
                        stroke-linejoin="round"
                    {
                        path stroke="none" d="M0 0h24v24H0z" fill="none" {}
                        path d="M8 7a4 4 0 1 0 8 0a4 4 0 0 0 -8 0" {}
                        path d="M6 21v-2a4 4 0 0 1 4 -4h4a4 4 0 0 1 4 4v2" {}
                    }
                    h3 { "Lead Panel" }
                    nav {
                        ul {
                            li { a href="/" { "Home" } }
                            li { a href="/leads" { "Leads" } }
                            li { a href="/campaigns" { "Campaigns" } }
                            li { a href="/help" { "Help" } }
                        }
                    }

                    @if signed_in {
                        form method="post" action="/auth/logout" style="margin: 0;" {
                            button type="submit" class="btn" { "Sign out" }
                        }
                    } @else {
                        a href="/login" class="text-base font-medium hover:text-blue-600" { "Sign in" }
                    }
                }
                (content)
            }
        }
    }
}
