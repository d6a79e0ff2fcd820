use crm_api::data::user::User;
use leptos::*;

use super::{BasePage, Page};

#[component]
pub fn Profile(cx: Scope, user: Option<User>) -> impl IntoView {
    let content = match user {
        Some(user) => {
            let name = user.display_name().to_owned();
            view! { cx,
                <dl class="row">
                    <dt class="col-sm-2">"Nome"</dt>
                    <dd class="col-sm-10">{name}</dd>
                    <dt class="col-sm-2">"E-mail"</dt>
                    <dd class="col-sm-10">{user.email}</dd>
                </dl>
            }
            .into_view(cx)
        }
        None => view! { cx,
            <div class="alert alert-warning" role="alert">"Não foi possível carregar o perfil"</div>
        }
        .into_view(cx),
    };
    view! { cx,
        <BasePage title="Perfil" page=Page::Profile>
            <h3>"Perfil"</h3>
            {content}
        </BasePage>
    }
}
