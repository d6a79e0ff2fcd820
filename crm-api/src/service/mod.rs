pub mod http;

use async_trait::async_trait;
use common::error::CrmResult;

use crate::{
    data::{
        interaction::{Interaction, NewInteraction},
        opportunity::{NewOpportunity, Opportunity, OpportunityUpdate},
        user::{Credentials, NewUser, Token, User},
    },
    session::SessionToken,
};

/// Operations the portal performs against the CRM REST API. Every authenticated operation takes
/// the caller's [SessionToken] explicitly; there is no ambient credential.
#[async_trait]
pub trait CrmApi: Send + Sync {
    /// Exchange `credentials` for a bearer [Token]
    /// # Errors
    /// This function will return an error if the API rejects the credentials or cannot be reached
    async fn login(&self, credentials: &Credentials) -> CrmResult<Token>;
    /// Register a new user account
    /// # Errors
    /// This function will return an error if the API rejects the new user or cannot be reached
    async fn signup(&self, new_user: &NewUser) -> CrmResult<User>;
    /// Fetch the profile of the user owning `token`
    /// # Errors
    /// This function will return an error if the token is not accepted or the API cannot be
    /// reached
    async fn get_me(&self, token: &SessionToken) -> CrmResult<User>;
    /// Fetch every opportunity visible to the user owning `token`
    /// # Errors
    /// This function will return an error if the token is not accepted or the API cannot be
    /// reached
    async fn opportunities(&self, token: &SessionToken) -> CrmResult<Vec<Opportunity>>;
    /// Create a new opportunity owned by the user owning `token`
    /// # Errors
    /// This function will return an error if the API rejects the request or cannot be reached
    async fn create_opportunity(
        &self,
        token: &SessionToken,
        opportunity: &NewOpportunity,
    ) -> CrmResult<Opportunity>;
    /// Update the opportunity identified by `id`
    /// # Errors
    /// This function will return an error if the API rejects the request or cannot be reached
    async fn update_opportunity(
        &self,
        token: &SessionToken,
        id: i64,
        update: &OpportunityUpdate,
    ) -> CrmResult<Opportunity>;
    /// Log a new interaction against the opportunity identified by `opportunity_id`
    /// # Errors
    /// This function will return an error if the API rejects the request or cannot be reached
    async fn create_interaction(
        &self,
        token: &SessionToken,
        opportunity_id: i64,
        interaction: &NewInteraction,
    ) -> CrmResult<Interaction>;
}
