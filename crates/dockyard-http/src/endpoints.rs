//! Endpoint paths and wire types.

use serde::{Deserialize, Serialize};

use dockyard_core::UserInfo;

/// The login endpoint. Requests to it never carry a bearer token.
pub const LOGIN: &str = "auth/login";

/// Request body for the login endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response from the login endpoint.
#[derive(Deserialize)]
pub(crate) struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub user_info: UserInfo,
}

/// Error body the service may send with a non-success status.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
