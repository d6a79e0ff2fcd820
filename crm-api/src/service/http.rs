use async_trait::async_trait;
use common::{
    error::{CrmError, CrmResult},
    join_url,
};
use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    data::{
        interaction::{Interaction, NewInteraction},
        opportunity::{NewOpportunity, Opportunity, OpportunityUpdate},
        user::{Credentials, NewUser, Token, TokenForm, User},
    },
    service::CrmApi,
    session::SessionToken,
};

/// [CrmApi] implementation backed by a [reqwest] client pointed at the CRM API's base url
#[derive(Clone, Debug)]
pub struct HttpCrmApi {
    client: Client,
    base_url: String,
}

impl HttpCrmApi {
    /// Create a new client for the API hosted at `base_url`
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a new client for the API hosted at `base_url` using an existing [Client]
    pub fn with_client<S: Into<String>>(client: Client, base_url: S) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Build a request for `path`. When a `token` is supplied it is attached as the bearer
    /// credential of the request.
    fn request(&self, method: Method, path: &str, token: Option<&SessionToken>) -> RequestBuilder {
        let url = join_url(&self.base_url, path);
        log::debug!("{method} {url}");
        let builder = self.client.request(method, url);
        match token {
            Some(token) => builder.header(AUTHORIZATION, token.bearer()),
            None => builder,
        }
    }

    async fn send<T>(&self, builder: RequestBuilder) -> CrmResult<T>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await?;
        process_response(response).await
    }
}

#[async_trait]
impl CrmApi for HttpCrmApi {
    async fn login(&self, credentials: &Credentials) -> CrmResult<Token> {
        let builder = self
            .request(Method::POST, "/token", None)
            .form(&TokenForm::from(credentials));
        self.send(builder).await
    }

    async fn signup(&self, new_user: &NewUser) -> CrmResult<User> {
        let builder = self.request(Method::POST, "/users/", None).json(new_user);
        self.send(builder).await
    }

    async fn get_me(&self, token: &SessionToken) -> CrmResult<User> {
        let builder = self.request(Method::GET, "/users/me/", Some(token));
        self.send(builder).await
    }

    async fn opportunities(&self, token: &SessionToken) -> CrmResult<Vec<Opportunity>> {
        let builder = self.request(Method::GET, "/opportunities/", Some(token));
        self.send(builder).await
    }

    async fn create_opportunity(
        &self,
        token: &SessionToken,
        opportunity: &NewOpportunity,
    ) -> CrmResult<Opportunity> {
        let builder = self
            .request(Method::POST, "/opportunities/", Some(token))
            .json(opportunity);
        self.send(builder).await
    }

    async fn update_opportunity(
        &self,
        token: &SessionToken,
        id: i64,
        update: &OpportunityUpdate,
    ) -> CrmResult<Opportunity> {
        let path = format!("/opportunities/{id}");
        let builder = self.request(Method::PUT, &path, Some(token)).json(update);
        self.send(builder).await
    }

    async fn create_interaction(
        &self,
        token: &SessionToken,
        opportunity_id: i64,
        interaction: &NewInteraction,
    ) -> CrmResult<Interaction> {
        let path = format!("/opportunities/{opportunity_id}/interactions/");
        let builder = self
            .request(Method::POST, &path, Some(token))
            .json(interaction);
        self.send(builder).await
    }
}

/// Error body sent by the CRM API for any non-2xx response
#[derive(Deserialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message(String),
    Validation(Vec<ValidationIssue>),
}

#[derive(Deserialize)]
struct ValidationIssue {
    msg: String,
}

/// Extract a human readable detail from an error `body`. Validation failures are reported as a
/// list of issues which get joined into a single message.
fn error_detail(body: &str) -> Option<String> {
    let ErrorBody { detail } = serde_json::from_str(body).ok()?;
    match detail {
        ErrorDetail::Message(message) => Some(message),
        ErrorDetail::Validation(issues) if issues.is_empty() => None,
        ErrorDetail::Validation(issues) => Some(
            issues
                .into_iter()
                .map(|issue| issue.msg)
                .collect::<Vec<_>>()
                .join("; "),
        ),
    }
}

async fn process_response<T>(response: Response) -> CrmResult<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let detail = match response.text().await {
        Ok(body) => error_detail(&body),
        Err(error) => {
            log::error!("{error}");
            None
        }
    };
    if status == StatusCode::UNAUTHORIZED {
        return Err(CrmError::Unauthorized { detail });
    }
    Err(CrmError::ApiResponse { status, detail })
}
