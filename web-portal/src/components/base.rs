use leptos::*;

use super::nav::{Nav, Page};

#[component]
pub fn BasePage(
    cx: Scope,
    title: &'static str,
    #[prop(optional)] page: Option<Page>,
    children: Children,
) -> impl IntoView {
    let nav = page.map(|page| view! { cx, <Nav active=page/> });
    view! { cx,
        <html lang="pt-BR">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css"
                    integrity="sha384-9ndCyUaIbzAi2FUVXJi0CjmCapSmO7SnpJef0486qhLnuZ2cdeRhO02iuK6FUUVM" crossorigin="anonymous" />
                <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css" />
                <link rel="stylesheet" href="/assets/style.css" />
                <title>"Cooper CRM Lite - "{title}</title>
            </head>
            <body class="p-3 m-0 border-0">
                <div class="container-fluid">
                    {nav}
                    {children(cx)}
                </div>
                <script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js"
                    integrity="sha384-geWF76RCwLtnZ8qwWowPQNguL3RmwHVBC9FhGdlKrxdiJJigb/j/68SIy3Te4Bkz"
                    crossorigin="anonymous"></script>
            </body>
        </html>
    }
}
