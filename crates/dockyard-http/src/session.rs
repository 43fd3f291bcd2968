//! Login and logout.

use reqwest::Method;
use tracing::{info, instrument};

use dockyard_core::{AccessToken, Credentials, Persistence, Result, Route, UserInfo};

use crate::client::ApiClient;
use crate::endpoints::{LOGIN, LoginRequest, LoginResponse};

impl ApiClient {
    /// Authenticate and store the new session.
    ///
    /// The login request carries no bearer token. On success the token and
    /// user info are written to the scopes chosen by `persistence`.
    #[instrument(skip(self, credentials), fields(username = credentials.username()))]
    pub async fn login(
        &self,
        credentials: &Credentials,
        persistence: Persistence,
    ) -> Result<UserInfo> {
        let request = LoginRequest {
            username: credentials.username(),
            password: credentials.password(),
        };

        let response: LoginResponse = self
            .request_json(Method::POST, LOGIN, Some(&request))
            .await?;

        let token = AccessToken::new(response.access_token);
        self.store()
            .set_session_with(&token, &response.user_info, persistence)?;

        info!("Logged in");
        Ok(response.user_info)
    }

    /// Drop the session from both scopes and return to the login screen.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<()> {
        self.store().clear()?;
        self.interceptor().navigator().navigate(Route::Login);
        info!("Logged out");
        Ok(())
    }
}
