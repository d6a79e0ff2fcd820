use leptos::*;
use strum::{EnumIter, IntoEnumIterator};

/// Pages reachable from the navigation bar once logged in
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Page {
    Dashboard,
    Kanban,
    Profile,
}

impl Page {
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Dashboard => "/dashboard",
            Self::Kanban => "/kanban",
            Self::Profile => "/profile",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Kanban => "Kanban",
            Self::Profile => "Perfil",
        }
    }

    const fn icon(&self) -> &'static str {
        match self {
            Self::Dashboard => "fa-chart-column",
            Self::Kanban => "fa-table-columns",
            Self::Profile => "fa-user",
        }
    }
}

#[component]
pub fn Nav(cx: Scope, active: Page) -> impl IntoView {
    let links = Page::iter()
        .map(|page| {
            let class = if page == active { "nav-link active" } else { "nav-link" };
            view! { cx,
                <li class="nav-item">
                    <a class=class href=page.path()>
                        <i class=format!("fa-solid {} me-1", page.icon())></i>
                        {page.label()}
                    </a>
                </li>
            }
        })
        .collect::<Vec<_>>();
    view! { cx,
        <nav class="navbar navbar-expand-lg bg-body-tertiary mb-3" id="mainNavBar">
            <div class="container-fluid">
                <a class="navbar-brand" href="/dashboard">
                    <i class="fa-solid fa-handshake me-1"></i>
                    "Cooper CRM Lite"
                </a>
                <ul class="navbar-nav me-auto my-2 my-lg-0">
                    {links}
                </ul>
                <ul class="navbar-nav ms-auto my-2 my-lg-0">
                    <li class="nav-item">
                        <a class="nav-link" href="/logout">
                            <i class="fa-solid fa-right-from-bracket me-1"></i>
                            "Sair"
                        </a>
                    </li>
                </ul>
            </div>
        </nav>
    }
}
