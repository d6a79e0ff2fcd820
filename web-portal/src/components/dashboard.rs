use leptos::*;

use super::{BasePage, Page};
use crate::analytics::{format_brl, DashboardMetrics, StatusCount};

#[component]
fn MetricCard(
    cx: Scope,
    label: &'static str,
    value: String,
    icon: &'static str,
    #[prop(optional)] risk: bool,
) -> impl IntoView {
    let class = if risk {
        "card metric-card metric-risk h-100"
    } else {
        "card metric-card h-100"
    };
    view! { cx,
        <div class="col-md-4">
            <div class=class>
                <div class="card-body">
                    <h6 class="card-subtitle text-body-secondary mb-2">
                        <i class=format!("fa-solid {icon} me-1")></i>
                        {label}
                    </h6>
                    <div class="metric-value">{value}</div>
                </div>
            </div>
        </div>
    }
}

/// Horizontal bar chart of opportunities per status. Bars are scaled against the largest count.
#[component]
fn StatusChart(cx: Scope, counts: Vec<StatusCount>, max: usize) -> impl IntoView {
    if counts.is_empty() {
        return view! { cx,
            <p class="text-body-secondary">"Nenhuma oportunidade cadastrada"</p>
        }
        .into_view(cx);
    }
    let rows = counts
        .into_iter()
        .map(|status_count| {
            let width = format!("width: {:.1}%", status_count.share_of(max));
            let count = status_count.count.to_string();
            view! { cx,
                <div class="bar-row">
                    <span class="bar-label">{status_count.status}</span>
                    <div class="bar-track">
                        <div class="bar" style=width></div>
                    </div>
                    <span class="bar-count">{count}</span>
                </div>
            }
        })
        .collect::<Vec<_>>();
    view! { cx, <div class="status-chart">{rows}</div> }.into_view(cx)
}

#[component]
pub fn Dashboard(cx: Scope, metrics: DashboardMetrics) -> impl IntoView {
    let max = metrics.max_status_count();
    let DashboardMetrics {
        total_opportunities,
        total_value,
        at_risk,
        status_counts,
    } = metrics;
    view! { cx,
        <BasePage title="Dashboard" page=Page::Dashboard>
            <h3>"Dashboard"</h3>
            <div class="row g-3 mb-4">
                <MetricCard
                    label="Oportunidades"
                    value=total_opportunities.to_string()
                    icon="fa-briefcase"
                />
                <MetricCard
                    label="Valor em pipeline"
                    value=format_brl(total_value)
                    icon="fa-sack-dollar"
                />
                <MetricCard
                    label="Em risco"
                    value=at_risk.to_string()
                    icon="fa-triangle-exclamation"
                    risk=true
                />
            </div>
            <div class="card">
                <div class="card-body">
                    <h5 class="card-title">"Oportunidades por status"</h5>
                    <StatusChart counts=status_counts max=max/>
                </div>
            </div>
        </BasePage>
    }
}
