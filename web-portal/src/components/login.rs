use leptos::*;

use super::BasePage;

/// Which of the two forms the login page shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    Login,
    Signup,
}

impl LoginMode {
    /// Mode requested by the `mode` query parameter. Anything but `signup` shows the login form.
    pub fn from_query(mode: Option<&str>) -> Self {
        match mode {
            Some("signup") => Self::Signup,
            _ => Self::Login,
        }
    }
}

/// Message shown above the form after a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginFeedback {
    Error(String),
    Success(String),
}

#[component]
pub fn Login(
    cx: Scope,
    mode: LoginMode,
    feedback: Option<LoginFeedback>,
    /// Email to pre-fill after a failed attempt or a successful signup
    #[prop(optional)]
    email: String,
) -> impl IntoView {
    let (heading, action) = match mode {
        LoginMode::Login => ("Entrar", "/login"),
        LoginMode::Signup => ("Criar Conta", "/signup"),
    };
    let name_field = (mode == LoginMode::Signup).then(|| {
        view! { cx,
            <div class="mb-3">
                <label class="form-label" for="name">"Nome"</label>
                <input class="form-control" type="text" id="name" name="name" required />
            </div>
        }
    });
    let feedback = feedback.map(|feedback| match feedback {
        LoginFeedback::Error(message) => view! { cx,
            <div class="alert alert-danger" role="alert">{message}</div>
        },
        LoginFeedback::Success(message) => view! { cx,
            <div class="alert alert-success" role="alert">{message}</div>
        },
    });
    let toggle = match mode {
        LoginMode::Login => view! { cx, <a href="/?mode=signup">"Não tem conta? Criar agora"</a> },
        LoginMode::Signup => view! { cx, <a href="/">"Já tem conta? Entrar"</a> },
    };
    view! { cx,
        <BasePage title=heading>
            <div class="card login-card">
                <div class="card-body">
                    <h3 class="card-title text-center mb-1">"Cooper CRM Lite"</h3>
                    <h5 class="text-center text-body-secondary mb-3">{heading}</h5>
                    {feedback}
                    <form id="loginForm" method="post" action=action>
                        {name_field}
                        <div class="mb-3">
                            <label class="form-label" for="email">"E-mail"</label>
                            <input class="form-control" type="email" id="email" name="email" value=email required />
                        </div>
                        <div class="mb-3">
                            <label class="form-label" for="password">"Senha"</label>
                            <input class="form-control" type="password" id="password" name="password" required />
                        </div>
                        <input class="btn btn-primary w-100" type="submit" value=heading />
                    </form>
                    <div class="text-center mt-3">{toggle}</div>
                </div>
            </div>
        </BasePage>
    }
}
