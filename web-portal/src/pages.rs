use actix_session::Session;
use actix_web::{
    web::{self, Data, Form, Path, Query},
    HttpResponse,
};
use chrono::Utc;
use common::error::{CrmError, CrmResult};
use crm_api::{
    data::{
        interaction::{InteractionKind, NewInteraction},
        opportunity::{NewOpportunity, Opportunity, OpportunityUpdate, PipelineStage},
        user::{Credentials, NewUser},
    },
    CrmApi, SessionToken,
};
use leptos::*;
use serde::Deserialize;

use crate::{
    analytics::{DashboardMetrics, KanbanBoard},
    components::{Dashboard, Kanban, Login, LoginFeedback, LoginMode, Profile},
    end_session, extract_session_token, start_session, utils, PortalError,
};

const AUTH_FALLBACK_MESSAGE: &str = "Erro ao autenticar";
const SIGNUP_SUCCESS_MESSAGE: &str = "Conta criada! Faça login.";

#[derive(Deserialize)]
struct LoginQuery {
    mode: Option<String>,
}

fn render_login(mode: LoginMode, feedback: Option<LoginFeedback>, email: String) -> HttpResponse {
    let mut html = leptos::ssr::render_to_string(move |cx| {
        view! { cx, <Login mode=mode feedback=feedback email=email/> }
    });
    utils::html!(html)
}

async fn login_page(session: Session, query: Query<LoginQuery>) -> HttpResponse {
    if extract_session_token(&session).is_ok() {
        return utils::redirect!("/dashboard");
    }
    render_login(
        LoginMode::from_query(query.mode.as_deref()),
        None,
        String::new(),
    )
}

async fn authenticate<A: CrmApi>(
    api: &A,
    credentials: &Credentials,
) -> Result<SessionToken, PortalError> {
    api.login(credentials)
        .await?
        .into_session_token()
        .ok_or(PortalError::BlankToken)
}

/// Message shown to the user for a failed login or signup, preferring the API's own detail
fn auth_error_message(error: &PortalError) -> String {
    let detail = match error {
        PortalError::Crm(error) => error.detail(),
        _ => None,
    };
    detail.unwrap_or(AUTH_FALLBACK_MESSAGE).to_owned()
}

async fn login_user<A: CrmApi>(
    session: Session,
    api: Data<A>,
    form: Form<Credentials>,
) -> HttpResponse {
    let credentials = form.into_inner();
    let token = match authenticate(api.get_ref(), &credentials).await {
        Ok(inner) => inner,
        Err(error) => {
            log::warn!("Login failed for {}. {error}", credentials.email);
            let feedback = LoginFeedback::Error(auth_error_message(&error));
            return render_login(LoginMode::Login, Some(feedback), credentials.email);
        }
    };
    if let Err(error) = start_session(&session, &token) {
        return error.to_response();
    }
    log::info!("{} logged in", credentials.email);
    utils::redirect!("/dashboard")
}

async fn signup_user<A: CrmApi>(api: Data<A>, form: Form<NewUser>) -> HttpResponse {
    let new_user = form.into_inner();
    match api.signup(&new_user).await {
        Ok(user) => {
            log::info!("Created account for {}", user.email);
            let feedback = LoginFeedback::Success(SIGNUP_SUCCESS_MESSAGE.to_owned());
            render_login(LoginMode::Login, Some(feedback), user.email)
        }
        Err(error) => {
            log::warn!("Signup failed for {}. {error}", new_user.email);
            let message = error.detail().unwrap_or(AUTH_FALLBACK_MESSAGE).to_owned();
            let feedback = LoginFeedback::Error(message);
            render_login(LoginMode::Signup, Some(feedback), new_user.email)
        }
    }
}

async fn logout_user(session: Session) -> HttpResponse {
    end_session(&session);
    utils::redirect_login!()
}

/// Token of the logged in user or the response sending the user to the login page
fn require_token(session: &Session) -> Result<SessionToken, HttpResponse> {
    extract_session_token(session).map_err(|error| {
        log::info!("Protected page requested without a valid session. {error}");
        error.to_response()
    })
}

/// Handle a failed CRM API call made with the session token. A rejected token ends the session
/// and yields the login redirect. Any other error is logged and [None] is returned so the page
/// can carry on without the data.
fn handle_api_error(session: &Session, error: CrmError) -> Option<HttpResponse> {
    if error.is_unauthorized() {
        log::info!("Session token rejected by the CRM API. {error}");
        end_session(session);
        return Some(utils::redirect_login!());
    }
    log::error!("{error}");
    None
}

async fn load_opportunities<A: CrmApi>(
    session: &Session,
    api: &A,
    token: &SessionToken,
) -> Result<Vec<Opportunity>, HttpResponse> {
    match api.opportunities(token).await {
        Ok(inner) => Ok(inner),
        Err(error) => match handle_api_error(session, error) {
            Some(response) => Err(response),
            None => Ok(Vec::new()),
        },
    }
}

async fn dashboard<A: CrmApi>(session: Session, api: Data<A>) -> HttpResponse {
    let token = match require_token(&session) {
        Ok(inner) => inner,
        Err(response) => return response,
    };
    let opportunities = match load_opportunities(&session, api.get_ref(), &token).await {
        Ok(inner) => inner,
        Err(response) => return response,
    };
    let metrics = DashboardMetrics::compute(&opportunities, Utc::now());
    let mut html = leptos::ssr::render_to_string(move |cx| {
        view! { cx, <Dashboard metrics=metrics/> }
    });
    utils::html!(html)
}

async fn kanban<A: CrmApi>(session: Session, api: Data<A>) -> HttpResponse {
    let token = match require_token(&session) {
        Ok(inner) => inner,
        Err(response) => return response,
    };
    let opportunities = match load_opportunities(&session, api.get_ref(), &token).await {
        Ok(inner) => inner,
        Err(response) => return response,
    };
    let board = KanbanBoard::build(&opportunities, Utc::now());
    let mut html = leptos::ssr::render_to_string(move |cx| {
        view! { cx, <Kanban board=board/> }
    });
    utils::html!(html)
}

async fn profile<A: CrmApi>(session: Session, api: Data<A>) -> HttpResponse {
    let token = match require_token(&session) {
        Ok(inner) => inner,
        Err(response) => return response,
    };
    let user = match api.get_me(&token).await {
        Ok(inner) => Some(inner),
        Err(error) => match handle_api_error(&session, error) {
            Some(response) => return response,
            None => None,
        },
    };
    let mut html = leptos::ssr::render_to_string(move |cx| {
        view! { cx, <Profile user=user/> }
    });
    utils::html!(html)
}

/// Response after a board action. The board is shown again unless the token was rejected.
fn board_action_response<T>(session: &Session, result: CrmResult<T>) -> HttpResponse {
    match result {
        Ok(_) => utils::redirect!("/kanban"),
        Err(error) => {
            handle_api_error(session, error).unwrap_or_else(|| utils::redirect!("/kanban"))
        }
    }
}

#[derive(Deserialize)]
struct NewOpportunityForm {
    razao_social: String,
    #[serde(default)]
    cnpj: String,
    #[serde(default)]
    valor_estimado: String,
    status: String,
    #[serde(default)]
    temperatura: String,
    #[serde(default)]
    produto: String,
}

impl TryFrom<NewOpportunityForm> for NewOpportunity {
    type Error = CrmError;

    fn try_from(value: NewOpportunityForm) -> Result<Self, Self::Error> {
        let Ok(status) = value.status.parse::<PipelineStage>() else {
            return Err(format!("Unknown pipeline stage `{}`", value.status).into());
        };
        Ok(Self {
            cnpj: value.cnpj.trim().to_owned(),
            razao_social: value.razao_social.trim().to_owned(),
            status,
            temperatura: value.temperatura.parse().ok(),
            produto: value.produto.parse().ok(),
            valor_estimado: parse_amount(&value.valor_estimado)?,
        })
    }
}

/// Parse a currency amount typed in a form. Blank input counts as zero and a decimal comma is
/// accepted.
fn parse_amount(value: &str) -> CrmResult<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0.0);
    }
    match value.replace(',', ".").parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(format!("Invalid estimated value `{value}`").into()),
    }
}

async fn create_opportunity<A: CrmApi>(
    session: Session,
    api: Data<A>,
    form: Form<NewOpportunityForm>,
) -> HttpResponse {
    let token = match require_token(&session) {
        Ok(inner) => inner,
        Err(response) => return response,
    };
    let new_opportunity = match NewOpportunity::try_from(form.into_inner()) {
        Ok(inner) => inner,
        Err(error) => {
            log::warn!("Rejected new opportunity. {error}");
            return utils::redirect!("/kanban");
        }
    };
    let result = api.create_opportunity(&token, &new_opportunity).await;
    board_action_response(&session, result)
}

#[derive(Deserialize)]
struct StageForm {
    status: String,
}

async fn move_opportunity<A: CrmApi>(
    session: Session,
    api: Data<A>,
    id: Path<i64>,
    form: Form<StageForm>,
) -> HttpResponse {
    let token = match require_token(&session) {
        Ok(inner) => inner,
        Err(response) => return response,
    };
    let Ok(stage) = form.status.parse::<PipelineStage>() else {
        log::warn!("Cannot move opportunity {id} to unknown stage `{}`", form.status);
        return utils::redirect!("/kanban");
    };
    let update = OpportunityUpdate::move_to(stage);
    let result = api.update_opportunity(&token, id.into_inner(), &update).await;
    board_action_response(&session, result)
}

#[derive(Deserialize)]
struct ClaimForm {
    #[serde(default)]
    status: Option<String>,
}

async fn claim_opportunity<A: CrmApi>(
    session: Session,
    api: Data<A>,
    id: Path<i64>,
    form: Form<ClaimForm>,
) -> HttpResponse {
    let token = match require_token(&session) {
        Ok(inner) => inner,
        Err(response) => return response,
    };
    let update = OpportunityUpdate::claim(form.into_inner().status);
    let result = api.update_opportunity(&token, id.into_inner(), &update).await;
    board_action_response(&session, result)
}

#[derive(Deserialize)]
struct InteractionForm {
    kind: String,
    #[serde(default)]
    notes: Option<String>,
}

async fn log_interaction<A: CrmApi>(
    session: Session,
    api: Data<A>,
    id: Path<i64>,
    form: Form<InteractionForm>,
) -> HttpResponse {
    let token = match require_token(&session) {
        Ok(inner) => inner,
        Err(response) => return response,
    };
    let InteractionForm { kind, notes } = form.into_inner();
    let Ok(kind) = kind.parse::<InteractionKind>() else {
        log::warn!("Cannot log interaction of unknown kind `{kind}` for opportunity {id}");
        return utils::redirect!("/kanban");
    };
    let interaction = NewInteraction::new(kind, notes, Utc::now());
    let result = api
        .create_interaction(&token, id.into_inner(), &interaction)
        .await;
    board_action_response(&session, result)
}

pub trait Pages {
    fn add_pages<A: CrmApi + 'static>(self) -> Self;
}

impl<T> Pages for actix_web::App<T>
where
    T: actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Error = actix_web::error::Error,
        InitError = (),
    >,
{
    fn add_pages<A: CrmApi + 'static>(self) -> Self {
        self.route("/", web::get().to(login_page))
            .route("/login", web::post().to(login_user::<A>))
            .route("/signup", web::post().to(signup_user::<A>))
            .route("/logout", web::get().to(logout_user))
            .route("/dashboard", web::get().to(dashboard::<A>))
            .route("/profile", web::get().to(profile::<A>))
            .service(
                web::scope("/kanban")
                    .route("", web::get().to(kanban::<A>))
                    .route("/opportunities", web::post().to(create_opportunity::<A>))
                    .route(
                        "/opportunities/{id}/stage",
                        web::post().to(move_opportunity::<A>),
                    )
                    .route(
                        "/opportunities/{id}/claim",
                        web::post().to(claim_opportunity::<A>),
                    )
                    .route(
                        "/opportunities/{id}/interactions",
                        web::post().to(log_interaction::<A>),
                    ),
            )
    }
}

#[cfg(test)]
mod test {
    use actix_web::{
        cookie::{Cookie, Key},
        dev::ServiceResponse,
        http::{header::LOCATION, StatusCode},
        test as actix_test,
        web::Data,
        App,
    };
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use common::error::{CrmError, CrmResult};
    use crm_api::{
        data::{
            interaction::{Interaction, InteractionKind, NewInteraction},
            opportunity::{NewOpportunity, Opportunity, OpportunityUpdate, PipelineStage},
            user::{Credentials, NewUser, Token, User},
        },
        CrmApi, SessionToken,
    };
    use mockall::mock;
    use rstest::rstest;

    use super::{parse_amount, NewOpportunityForm, Pages};
    use crate::{session_middleware, SESSION_COOKIE_NAME};

    const VALID_EMAIL: &str = "ana@coopercard.com.br";
    const VALID_PASSWORD: &str = "s3nha";
    const VALID_TOKEN: &str = "token-123";

    mock! {
        pub Api {}

        #[async_trait]
        impl CrmApi for Api {
            async fn login(&self, credentials: &Credentials) -> CrmResult<Token>;
            async fn signup(&self, new_user: &NewUser) -> CrmResult<User>;
            async fn get_me(&self, token: &SessionToken) -> CrmResult<User>;
            async fn opportunities(&self, token: &SessionToken) -> CrmResult<Vec<Opportunity>>;
            async fn create_opportunity(
                &self,
                token: &SessionToken,
                opportunity: &NewOpportunity,
            ) -> CrmResult<Opportunity>;
            async fn update_opportunity(
                &self,
                token: &SessionToken,
                id: i64,
                update: &OpportunityUpdate,
            ) -> CrmResult<Opportunity>;
            async fn create_interaction(
                &self,
                token: &SessionToken,
                opportunity_id: i64,
                interaction: &NewInteraction,
            ) -> CrmResult<Interaction>;
        }
    }

    macro_rules! test_app {
        ($api:expr) => {
            actix_test::init_service(
                App::new()
                    .wrap(session_middleware(Key::from(&[7u8; 64][..]), false))
                    .app_data(Data::new($api))
                    .add_pages::<MockApi>(),
            )
            .await
        };
    }

    macro_rules! login {
        ($app:ident) => {{
            let request = actix_test::TestRequest::post()
                .uri("/login")
                .set_form([("email", VALID_EMAIL), ("password", VALID_PASSWORD)])
                .to_request();
            let response = actix_test::call_service(&$app, request).await;
            assert_eq!(response.status(), StatusCode::FOUND);
            session_cookie(&response).unwrap()
        }};
    }

    fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
        response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
            .map(|cookie| cookie.into_owned())
    }

    fn location<B>(response: &ServiceResponse<B>) -> Option<String> {
        response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    }

    fn expect_valid_login(api: &mut MockApi) {
        api.expect_login()
            .withf(|credentials| {
                credentials.email == VALID_EMAIL && credentials.password == VALID_PASSWORD
            })
            .returning(|_| {
                Ok(Token {
                    access_token: VALID_TOKEN.to_owned(),
                    token_type: "bearer".to_owned(),
                })
            });
    }

    fn opportunity(id: i64, razao_social: &str, status: &str, days_ago: i64) -> Opportunity {
        Opportunity {
            id,
            cnpj: Some("12.345.678/0001-90".to_owned()),
            razao_social: razao_social.to_owned(),
            status: Some(status.to_owned()),
            temperatura: Some("Quente".to_owned()),
            produto: Some("Cooper".to_owned()),
            valor_estimado: Some(1000.0),
            last_interaction_date: Some(Utc::now() - Duration::days(days_ago)),
            owner_id: Some(1),
            created_at: None,
            interactions: Vec::new(),
        }
    }

    #[actix_web::test]
    async fn login_page_should_render_login_form_by_default() {
        let app = test_app!(MockApi::new());

        let request = actix_test::TestRequest::get().uri("/").to_request();
        let body = actix_test::call_and_read_body(&app, request).await;
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(body.contains("action=\"/login\""));
        assert!(body.contains("Não tem conta? Criar agora"));
        assert!(!body.contains("name=\"name\""));
    }

    #[actix_web::test]
    async fn login_page_should_render_signup_form_when_requested() {
        let app = test_app!(MockApi::new());

        let request = actix_test::TestRequest::get().uri("/?mode=signup").to_request();
        let body = actix_test::call_and_read_body(&app, request).await;
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(body.contains("action=\"/signup\""));
        assert!(body.contains("name=\"name\""));
        assert!(body.contains("Já tem conta? Entrar"));
    }

    #[actix_web::test]
    async fn login_should_store_token_and_redirect_to_dashboard() {
        let mut api = MockApi::new();
        expect_valid_login(&mut api);
        api.expect_opportunities()
            .withf(|token| token.as_str() == VALID_TOKEN)
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let app = test_app!(api);

        let request = actix_test::TestRequest::post()
            .uri("/login")
            .set_form([("email", VALID_EMAIL), ("password", VALID_PASSWORD)])
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response).as_deref(), Some("/dashboard"));
        let cookie = session_cookie(&response).unwrap();

        let request = actix_test::TestRequest::get()
            .uri("/dashboard")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn login_should_show_api_detail_without_storing_token() {
        let mut api = MockApi::new();
        api.expect_login().returning(|_| {
            Err(CrmError::Unauthorized {
                detail: Some("Incorrect username or password".to_owned()),
            })
        });
        let app = test_app!(api);

        let request = actix_test::TestRequest::post()
            .uri("/login")
            .set_form([("email", VALID_EMAIL), ("password", "wrong")])
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(session_cookie(&response).is_none());
        let body = actix_test::read_body(response).await;
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Incorrect username or password"));
        assert!(body.contains("action=\"/login\""));
    }

    #[actix_web::test]
    async fn login_should_fall_back_to_generic_message() {
        let mut api = MockApi::new();
        api.expect_login().returning(|_| {
            Err(CrmError::ApiResponse {
                status: StatusCode::BAD_GATEWAY,
                detail: None,
            })
        });
        let app = test_app!(api);

        let request = actix_test::TestRequest::post()
            .uri("/login")
            .set_form([("email", VALID_EMAIL), ("password", VALID_PASSWORD)])
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert!(session_cookie(&response).is_none());
        let body = actix_test::read_body(response).await;
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Erro ao autenticar"));
    }

    #[actix_web::test]
    async fn login_should_reject_blank_access_token() {
        let mut api = MockApi::new();
        api.expect_login().returning(|_| {
            Ok(Token {
                access_token: " ".to_owned(),
                token_type: "bearer".to_owned(),
            })
        });
        let app = test_app!(api);

        let request = actix_test::TestRequest::post()
            .uri("/login")
            .set_form([("email", VALID_EMAIL), ("password", VALID_PASSWORD)])
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(session_cookie(&response).is_none());
    }

    #[actix_web::test]
    async fn signup_should_return_to_login_mode_without_storing_token() {
        let mut api = MockApi::new();
        api.expect_signup()
            .withf(|new_user| new_user.email == VALID_EMAIL && new_user.name == "Ana")
            .returning(|new_user| {
                Ok(User {
                    id: 1,
                    email: new_user.email.clone(),
                    name: Some(new_user.name.clone()),
                })
            });
        let app = test_app!(api);

        let request = actix_test::TestRequest::post()
            .uri("/signup")
            .set_form([
                ("email", VALID_EMAIL),
                ("password", VALID_PASSWORD),
                ("name", "Ana"),
            ])
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(session_cookie(&response).is_none());
        let body = actix_test::read_body(response).await;
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Conta criada! Faça login."));
        assert!(body.contains("action=\"/login\""));
    }

    #[actix_web::test]
    async fn signup_failure_should_stay_in_signup_mode() {
        let mut api = MockApi::new();
        api.expect_signup().returning(|_| {
            Err(CrmError::ApiResponse {
                status: StatusCode::BAD_REQUEST,
                detail: Some("Email already registered".to_owned()),
            })
        });
        let app = test_app!(api);

        let request = actix_test::TestRequest::post()
            .uri("/signup")
            .set_form([
                ("email", VALID_EMAIL),
                ("password", VALID_PASSWORD),
                ("name", "Ana"),
            ])
            .to_request();
        let body = actix_test::call_and_read_body(&app, request).await;
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(body.contains("Email already registered"));
        assert!(body.contains("action=\"/signup\""));
    }

    #[rstest]
    #[case("/dashboard")]
    #[case("/kanban")]
    #[case("/profile")]
    #[actix_web::test]
    async fn protected_pages_should_redirect_to_login_without_token(#[case] uri: &str) {
        let app = test_app!(MockApi::new());

        let request = actix_test::TestRequest::get().uri(uri).to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response).as_deref(), Some("/"));
    }

    #[actix_web::test]
    async fn board_actions_should_redirect_to_login_without_token() {
        let app = test_app!(MockApi::new());

        let request = actix_test::TestRequest::post()
            .uri("/kanban/opportunities/5/stage")
            .set_form([("status", "Proposta")])
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response).as_deref(), Some("/"));
    }

    #[actix_web::test]
    async fn login_page_should_redirect_to_dashboard_when_logged_in() {
        let mut api = MockApi::new();
        expect_valid_login(&mut api);
        let app = test_app!(api);
        let cookie = login!(app);

        let request = actix_test::TestRequest::get().uri("/").cookie(cookie).to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response).as_deref(), Some("/dashboard"));
    }

    #[actix_web::test]
    async fn dashboard_should_render_metrics() {
        let mut api = MockApi::new();
        expect_valid_login(&mut api);
        api.expect_opportunities().returning(|_| {
            let mut unknown = opportunity(2, "Mercado Central", "Frio-unknown", 100);
            unknown.valor_estimado = Some(500.0);
            Ok(vec![opportunity(1, "Padaria Pão Quente", "Proposta", 40), unknown])
        });
        let app = test_app!(api);
        let cookie = login!(app);

        let request = actix_test::TestRequest::get()
            .uri("/dashboard")
            .cookie(cookie)
            .to_request();
        let body = actix_test::call_and_read_body(&app, request).await;
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(body.contains("R$ 1.500,00"));
        assert!(body.contains("Frio-unknown"));
        assert!(body.contains("Proposta"));
    }

    #[actix_web::test]
    async fn dashboard_should_end_session_when_token_is_rejected() {
        let mut api = MockApi::new();
        expect_valid_login(&mut api);
        api.expect_opportunities()
            .returning(|_| Err(CrmError::Unauthorized { detail: None }));
        let app = test_app!(api);
        let cookie = login!(app);

        let request = actix_test::TestRequest::get()
            .uri("/dashboard")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response).as_deref(), Some("/"));
        let removal = session_cookie(&response).unwrap();
        assert!(removal.value().is_empty());
    }

    #[actix_web::test]
    async fn dashboard_should_render_empty_metrics_on_other_errors() {
        let mut api = MockApi::new();
        expect_valid_login(&mut api);
        api.expect_opportunities().returning(|_| {
            Err(CrmError::ApiResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: None,
            })
        });
        let app = test_app!(api);
        let cookie = login!(app);

        let request = actix_test::TestRequest::get()
            .uri("/dashboard")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("R$ 0,00"));
        assert!(body.contains("Nenhuma oportunidade cadastrada"));
    }

    #[actix_web::test]
    async fn kanban_should_place_cards_and_skip_unknown_statuses() {
        let mut api = MockApi::new();
        expect_valid_login(&mut api);
        api.expect_opportunities().returning(|_| {
            Ok(vec![
                opportunity(1, "Padaria Pão Quente", "Proposta", 40),
                opportunity(2, "Mercado Central", "Frio-unknown", 100),
                opportunity(3, "Oficina do Zé", "Negociação", 120),
            ])
        });
        let app = test_app!(api);
        let cookie = login!(app);

        let request = actix_test::TestRequest::get()
            .uri("/kanban")
            .cookie(cookie)
            .to_request();
        let body = actix_test::call_and_read_body(&app, request).await;
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(body.contains("Padaria Pão Quente"));
        assert!(body.contains("Oficina do Zé"));
        assert!(!body.contains("Mercado Central"));
        assert!(body.contains("40 dias sem contato"));
        assert_eq!(body.matches("LIVRE").count(), 1);
        assert!(body.contains("/kanban/opportunities/3/claim"));
        assert!(!body.contains("/kanban/opportunities/1/claim"));
    }

    #[actix_web::test]
    async fn profile_should_show_current_user() {
        let mut api = MockApi::new();
        expect_valid_login(&mut api);
        api.expect_get_me()
            .withf(|token| token.as_str() == VALID_TOKEN)
            .returning(|_| {
                Ok(User {
                    id: 1,
                    email: VALID_EMAIL.to_owned(),
                    name: Some("Ana Souza".to_owned()),
                })
            });
        let app = test_app!(api);
        let cookie = login!(app);

        let request = actix_test::TestRequest::get()
            .uri("/profile")
            .cookie(cookie)
            .to_request();
        let body = actix_test::call_and_read_body(&app, request).await;
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(body.contains("Ana Souza"));
        assert!(body.contains(VALID_EMAIL));
    }

    #[actix_web::test]
    async fn logout_should_purge_session() {
        let mut api = MockApi::new();
        expect_valid_login(&mut api);
        let app = test_app!(api);
        let cookie = login!(app);

        let request = actix_test::TestRequest::get()
            .uri("/logout")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response).as_deref(), Some("/"));
        let removal = session_cookie(&response).unwrap();
        assert!(removal.value().is_empty());
    }

    #[actix_web::test]
    async fn create_opportunity_should_send_parsed_form() {
        let mut api = MockApi::new();
        expect_valid_login(&mut api);
        api.expect_create_opportunity()
            .withf(|token, new_opportunity| {
                token.as_str() == VALID_TOKEN
                    && new_opportunity.razao_social == "Padaria Pão Quente"
                    && new_opportunity.status == PipelineStage::Prospeccao
                    && new_opportunity.temperatura.is_none()
                    && new_opportunity.valor_estimado == 1500.5
            })
            .times(1)
            .returning(|_, _| Ok(opportunity(9, "Padaria Pão Quente", "Prospecção", 0)));
        let app = test_app!(api);
        let cookie = login!(app);

        let request = actix_test::TestRequest::post()
            .uri("/kanban/opportunities")
            .cookie(cookie)
            .set_form([
                ("razao_social", " Padaria Pão Quente "),
                ("cnpj", "12.345.678/0001-90"),
                ("valor_estimado", "1500.50"),
                ("status", "Prospecção"),
                ("temperatura", ""),
                ("produto", "Cooper"),
            ])
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response).as_deref(), Some("/kanban"));
    }

    #[actix_web::test]
    async fn move_opportunity_should_update_status() {
        let mut api = MockApi::new();
        expect_valid_login(&mut api);
        api.expect_update_opportunity()
            .withf(|token, id, update| {
                token.as_str() == VALID_TOKEN
                    && *id == 5
                    && *update == OpportunityUpdate::move_to(PipelineStage::Proposta)
            })
            .times(1)
            .returning(|_, id, _| Ok(opportunity(id, "Padaria Pão Quente", "Proposta", 3)));
        let app = test_app!(api);
        let cookie = login!(app);

        let request = actix_test::TestRequest::post()
            .uri("/kanban/opportunities/5/stage")
            .cookie(cookie)
            .set_form([("status", "Proposta")])
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(location(&response).as_deref(), Some("/kanban"));
    }

    #[actix_web::test]
    async fn move_opportunity_should_ignore_unknown_stage() {
        let mut api = MockApi::new();
        expect_valid_login(&mut api);
        api.expect_update_opportunity().never();
        let app = test_app!(api);
        let cookie = login!(app);

        let request = actix_test::TestRequest::post()
            .uri("/kanban/opportunities/5/stage")
            .cookie(cookie)
            .set_form([("status", "Fechado")])
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(location(&response).as_deref(), Some("/kanban"));
    }

    #[actix_web::test]
    async fn claim_opportunity_should_resubmit_current_status() {
        let mut api = MockApi::new();
        expect_valid_login(&mut api);
        api.expect_update_opportunity()
            .withf(|_, id, update| {
                *id == 3 && update.status.as_deref() == Some("Negociação")
            })
            .times(1)
            .returning(|_, id, _| Ok(opportunity(id, "Oficina do Zé", "Negociação", 120)));
        let app = test_app!(api);
        let cookie = login!(app);

        let request = actix_test::TestRequest::post()
            .uri("/kanban/opportunities/3/claim")
            .cookie(cookie)
            .set_form([("status", "Negociação")])
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(location(&response).as_deref(), Some("/kanban"));
    }

    #[actix_web::test]
    async fn log_interaction_should_create_interaction() {
        let mut api = MockApi::new();
        expect_valid_login(&mut api);
        api.expect_create_interaction()
            .withf(|_, opportunity_id, interaction| {
                *opportunity_id == 7
                    && interaction.interaction_type == InteractionKind::Meeting
                    && interaction.notes.as_deref() == Some("Visita agendada")
            })
            .times(1)
            .returning(|_, opportunity_id, interaction| {
                Ok(Interaction {
                    id: 1,
                    opportunity_id,
                    interaction_type: "meeting".to_owned(),
                    notes: interaction.notes.clone(),
                    date: Some(interaction.date),
                })
            });
        let app = test_app!(api);
        let cookie = login!(app);

        let request = actix_test::TestRequest::post()
            .uri("/kanban/opportunities/7/interactions")
            .cookie(cookie)
            .set_form([("kind", "meeting"), ("notes", "Visita agendada")])
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(location(&response).as_deref(), Some("/kanban"));
    }

    #[actix_web::test]
    async fn board_action_should_end_session_when_token_is_rejected() {
        let mut api = MockApi::new();
        expect_valid_login(&mut api);
        api.expect_update_opportunity()
            .returning(|_, _, _| Err(CrmError::Unauthorized { detail: None }));
        let app = test_app!(api);
        let cookie = login!(app);

        let request = actix_test::TestRequest::post()
            .uri("/kanban/opportunities/3/claim")
            .cookie(cookie)
            .set_form([("status", "Negociação")])
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(location(&response).as_deref(), Some("/"));
    }

    #[rstest]
    #[case("", 0.0)]
    #[case("1500", 1500.0)]
    #[case(" 1500.50 ", 1500.5)]
    #[case("99,90", 99.9)]
    fn parse_amount_should_accept_form_input(#[case] value: &str, #[case] expected: f64) {
        assert_eq!(parse_amount(value).unwrap(), expected);
    }

    #[rstest]
    #[case("abc")]
    #[case("1.500,00")]
    #[case("inf")]
    fn parse_amount_should_reject_invalid_input(#[case] value: &str) {
        assert!(parse_amount(value).is_err());
    }

    #[test]
    fn new_opportunity_form_should_reject_unknown_stage() {
        let form = NewOpportunityForm {
            razao_social: "Padaria".to_owned(),
            cnpj: String::new(),
            valor_estimado: String::new(),
            status: "Fechado".to_owned(),
            temperatura: String::new(),
            produto: String::new(),
        };

        assert!(NewOpportunity::try_from(form).is_err());
    }
}
