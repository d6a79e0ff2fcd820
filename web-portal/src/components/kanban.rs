use crm_api::data::{
    interaction::InteractionKind,
    opportunity::{PipelineStage, Product, Temperature},
};
use leptos::*;
use strum::IntoEnumIterator;

use super::{enum_options, BasePage, Page};
use crate::analytics::{KanbanBoard, KanbanCard, KanbanColumn};

#[component]
pub fn TemperatureBadge(cx: Scope, temperature: Temperature) -> impl IntoView {
    view! { cx,
        <span class=format!("badge {}", temperature.badge_class())>
            <i class=format!("fa-solid {} me-1", temperature.icon())></i>
            {temperature.to_string()}
        </span>
    }
}

#[component]
fn MoveStageForm(cx: Scope, id: i64, current: Option<PipelineStage>) -> impl IntoView {
    view! { cx,
        <form method="post" action=format!("/kanban/opportunities/{id}/stage")
            class="input-group input-group-sm mt-2">
            <select class="form-select" name="status" aria-label="Etapa">
                {enum_options(cx, current)}
            </select>
            <button type="submit" class="btn btn-outline-primary" title="Mover">
                <i class="fa-solid fa-arrow-right"></i>
            </button>
        </form>
    }
}

#[component]
fn InteractionForm(cx: Scope, id: i64) -> impl IntoView {
    let kinds = InteractionKind::iter()
        .map(|kind| {
            let value: &'static str = kind.into();
            view! { cx, <option value=value>{kind.label()}</option> }
        })
        .collect::<Vec<_>>();
    view! { cx,
        <form method="post" action=format!("/kanban/opportunities/{id}/interactions") class="mt-2">
            <div class="input-group input-group-sm">
                <select class="form-select" name="kind" aria-label="Tipo de contato">
                    {kinds}
                </select>
                <input class="form-control" type="text" name="notes" placeholder="Notas" />
                <button type="submit" class="btn btn-outline-success" title="Registrar contato">
                    <i class="fa-solid fa-plus"></i>
                </button>
            </div>
        </form>
    }
}

#[component]
fn OpportunityCard(cx: Scope, card: KanbanCard) -> impl IntoView {
    let interaction_label = card.interaction_label();
    let value_label = card.value_label();
    let KanbanCard {
        opportunity,
        is_free,
        ..
    } = card;
    let id = opportunity.id;
    let class = if is_free {
        "card kanban-card stale"
    } else {
        "card kanban-card"
    };
    let free_badge = is_free.then(|| {
        view! { cx, <span class="badge badge-free ms-1">"LIVRE"</span> }
    });
    let claim = is_free.then(|| {
        let status = opportunity.status.clone().unwrap_or_default();
        view! { cx,
            <form method="post" action=format!("/kanban/opportunities/{id}/claim") class="mt-2">
                <input type="hidden" name="status" value=status />
                <button type="submit" class="btn btn-sm btn-outline-danger w-100">"Assumir"</button>
            </form>
        }
    });
    let temperature = opportunity
        .temperature()
        .map(|temperature| view! { cx, <TemperatureBadge temperature=temperature/> });
    let product = opportunity.produto.clone().map(|produto| {
        view! { cx, <span class="badge text-bg-secondary ms-1">{produto}</span> }
    });
    let cnpj = opportunity.cnpj.clone().map(|cnpj| {
        view! { cx, <div class="small text-body-secondary">{cnpj}</div> }
    });
    let current_stage = opportunity.stage();
    view! { cx,
        <div class=class id=format!("opportunity-{id}")>
            <div class="card-body p-2">
                <div class="d-flex justify-content-between align-items-start">
                    <h6 class="card-title mb-1">{opportunity.razao_social}</h6>
                    {free_badge}
                </div>
                {cnpj}
                <div class="my-1">
                    {temperature}
                    {product}
                </div>
                <div class="fw-semibold">{value_label}</div>
                <div class="small">
                    <i class="fa-regular fa-clock me-1"></i>
                    {interaction_label}
                </div>
                <MoveStageForm id=id current=current_stage/>
                <InteractionForm id=id/>
                {claim}
            </div>
        </div>
    }
}

#[component]
fn StageColumn(cx: Scope, column: KanbanColumn) -> impl IntoView {
    let stage = column.stage.to_string();
    let count = column.cards.len().to_string();
    let cards = column
        .cards
        .into_iter()
        .map(|card| view! { cx, <OpportunityCard card=card/> })
        .collect::<Vec<_>>();
    view! { cx,
        <div class="kanban-column">
            <h5 class="d-flex justify-content-between">
                <span>{stage}</span>
                <span class="badge text-bg-secondary">{count}</span>
            </h5>
            {cards}
        </div>
    }
}

#[component]
fn NewOpportunityForm(cx: Scope) -> impl IntoView {
    view! { cx,
        <details class="card mb-3">
            <summary class="card-header">"Nova oportunidade"</summary>
            <form method="post" action="/kanban/opportunities" class="card-body row g-2">
                <div class="col-md-3">
                    <input class="form-control" type="text" name="razao_social" placeholder="Razão social" required />
                </div>
                <div class="col-md-2">
                    <input class="form-control" type="text" name="cnpj" placeholder="CNPJ" required />
                </div>
                <div class="col-md-2">
                    <input class="form-control" type="number" step="0.01" min="0" name="valor_estimado"
                        placeholder="Valor estimado" />
                </div>
                <div class="col-md-2">
                    <select class="form-select" name="status" aria-label="Etapa">
                        {enum_options(cx, Some(PipelineStage::Qualificacao))}
                    </select>
                </div>
                <div class="col-md-1">
                    <select class="form-select" name="temperatura" aria-label="Temperatura">
                        <option value="">"-"</option>
                        {enum_options::<Temperature>(cx, None)}
                    </select>
                </div>
                <div class="col-md-1">
                    <select class="form-select" name="produto" aria-label="Produto">
                        <option value="">"-"</option>
                        {enum_options::<Product>(cx, None)}
                    </select>
                </div>
                <div class="col-md-1">
                    <button type="submit" class="btn btn-primary w-100">"Criar"</button>
                </div>
            </form>
        </details>
    }
}

#[component]
pub fn Kanban(cx: Scope, board: KanbanBoard) -> impl IntoView {
    let columns = board
        .columns
        .into_iter()
        .map(|column| view! { cx, <StageColumn column=column/> })
        .collect::<Vec<_>>();
    view! { cx,
        <BasePage title="Kanban" page=Page::Kanban>
            <h3>"Pipeline"</h3>
            <NewOpportunityForm/>
            <div class="kanban-board">
                {columns}
            </div>
        </BasePage>
    }
}
