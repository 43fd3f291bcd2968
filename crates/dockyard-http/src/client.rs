//! HTTP client for the remote service.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use dockyard_core::error::{Error, ProtocolError, TransportError};
use dockyard_core::{ApiUrl, CredentialStore, Entity, EntityId, Navigator, Result};

use crate::endpoints::ErrorResponse;
use crate::gateway::RestGateway;
use crate::interceptor::AuthInterceptor;

/// Map a reqwest failure onto the transport error class.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        TransportError::Decode {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

/// JSON-over-HTTP client. Every request goes through the [`AuthInterceptor`].
///
/// Cheap to clone; clones share the connection pool and credential store.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api: ApiUrl,
    interceptor: AuthInterceptor,
}

impl ApiClient {
    /// Create a client for `api` with an injected credential store and
    /// navigator.
    pub fn new(
        api: ApiUrl,
        store: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("dockyard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            api,
            interceptor: AuthInterceptor::new(store, navigator),
        })
    }

    /// Returns the API base URL this client is configured for.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        self.interceptor.store()
    }

    pub(crate) fn interceptor(&self) -> &AuthInterceptor {
        &self.interceptor
    }

    /// A gateway for one entity type, sharing this client.
    pub fn gateway<E: Entity>(&self) -> RestGateway<E> {
        RestGateway::new(self.clone())
    }

    /// Send a request and decode a JSON response body.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn request_json<B, R>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .execute(method, self.api.endpoint(endpoint), endpoint, body)
            .await?;
        response.json::<R>().await.map_err(transport_error)
    }

    /// Send a request to one record of `collection` and decode the response.
    pub async fn member_json<B, R>(
        &self,
        method: Method,
        collection: &str,
        id: &EntityId,
        body: Option<&B>,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .execute(method, self.api.member(collection, id), collection, body)
            .await?;
        response.json::<R>().await.map_err(transport_error)
    }

    /// Send a request to one record of `collection`, ignoring the body.
    pub async fn member_empty(&self, method: Method, collection: &str, id: &EntityId) -> Result<()> {
        self.execute::<()>(method, self.api.member(collection, id), collection, None)
            .await?;
        Ok(())
    }

    /// Send a request whose response body is ignored.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn request_empty<B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.execute(method, self.api.endpoint(endpoint), endpoint, body)
            .await?;
        Ok(())
    }

    /// Build, intercept, send and status-check one request to `url`.
    /// `endpoint` is the path the interceptor judges it by.
    async fn execute<B>(
        &self,
        method: Method,
        url: String,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        debug!(%method, %url, "API request");

        let mut request = self
            .client
            .request(method, &url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            request = request.json(body);
        }
        let request = self.interceptor.attach(endpoint, request);

        let result = match request.send().await {
            Ok(response) => Self::check_status(response).await,
            Err(e) => Err(transport_error(e)),
        };

        self.interceptor.observe(result)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        trace!(status = %status, "API response");

        if status.is_success() {
            Ok(response)
        } else {
            Err(Error::Protocol(Self::parse_error_response(response).await))
        }
    }

    /// Parse an error response, tolerating bodies that are not JSON.
    async fn parse_error_response(response: reqwest::Response) -> ProtocolError {
        let status = response.status().as_u16();

        match response.json::<ErrorResponse>().await {
            Ok(body) => ProtocolError::new(status, body.error, body.message),
            Err(_) => ProtocolError::new(status, None, None),
        }
    }
}
