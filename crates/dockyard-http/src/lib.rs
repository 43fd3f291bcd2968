//! dockyard-http - the remote service over HTTP.
//!
//! [`ApiClient`] sends every request through an [`AuthInterceptor`], which
//! attaches the bearer token and turns a 401 into a forced logout.
//! [`RestGateway`] maps the gateway contract onto REST collection endpoints.

mod client;
mod endpoints;
mod gateway;
mod interceptor;
mod session;

pub use client::ApiClient;
pub use endpoints::LOGIN;
pub use gateway::RestGateway;
pub use interceptor::AuthInterceptor;
