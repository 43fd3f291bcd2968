//! Bearer-token interceptor.

use std::fmt;
use std::sync::Arc;

use reqwest::RequestBuilder;
use reqwest::header::AUTHORIZATION;
use tracing::{debug, trace, warn};

use dockyard_core::{CredentialStore, Navigator, Result, Route};

use crate::endpoints::LOGIN;

/// Wraps every outbound request.
///
/// Before sending: attaches `Authorization: Bearer <token>` unless the
/// request targets the login endpoint or no token is stored. After the
/// response: a 401 clears the credential store and navigates to
/// [`Route::Login`], then the original error is handed back. Nothing is
/// retried.
#[derive(Clone)]
pub struct AuthInterceptor {
    store: Arc<CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl AuthInterceptor {
    pub fn new(store: Arc<CredentialStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Whether an endpoint path is the login endpoint.
    pub fn is_login_endpoint(endpoint: &str) -> bool {
        endpoint.trim_matches('/') == LOGIN
    }

    /// Attach the bearer credential to a request for `endpoint`.
    pub fn attach(&self, endpoint: &str, request: RequestBuilder) -> RequestBuilder {
        if Self::is_login_endpoint(endpoint) {
            trace!(endpoint, "login endpoint, no bearer token attached");
            return request;
        }

        match self.store.token() {
            Some(token) => request.header(AUTHORIZATION, token.bearer()),
            None => {
                debug!(endpoint, "no token stored, sending request unauthenticated");
                request
            }
        }
    }

    /// Observe the outcome of a request. Only a 401 has side effects.
    pub fn observe<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(ref err) = result
            && err.is_unauthorized()
        {
            warn!(error = %err, "Unauthorized response, ending session");
            if let Err(e) = self.store.clear() {
                warn!(error = %e, "Failed to clear credential store");
            }
            self.navigator.navigate(Route::Login);
        }
        result
    }
}

impl fmt::Debug for AuthInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthInterceptor")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
