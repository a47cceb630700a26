//! Typed request/response shapes for the remote account API.
//!
//! Nothing here performs I/O: responses are decoded from a status code and a
//! JSON body, and requests are plain values a transport can send as-is.
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::session::Session;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Session expired or not authorized")]
    Unauthorized,

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Response carries neither data nor error")]
    MissingData,
}

/// Validates a response at the boundary. Every endpoint answers with either
/// `{"data": ...}` or `{"error": ..., "detail": ...}`; a 401 always maps to
/// `Unauthorized` whatever the body says.
pub fn decode<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if status == 401 {
        return Err(ApiError::Unauthorized);
    }
    let mut envelope: Map<String, Value> = serde_json::from_str(body)?;

    if let Some(error) = envelope.remove("error") {
        let error = match error {
            Value::String(text) => text,
            other => other.to_string(),
        };
        let message = match envelope.remove("detail").as_ref().and_then(Value::as_str) {
            Some(detail) => format!("{error} ({detail})"),
            None => error,
        };
        return Err(ApiError::Server { status, message });
    }
    if !(200..300).contains(&status) {
        return Err(ApiError::Server { status, message: "request failed without an error message".into() });
    }

    let data = envelope.remove("data").ok_or(ApiError::MissingData)?;
    Ok(serde_json::from_value(data)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
    /// Seconds until the token expires.
    pub expires_in: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    /// Servers may rotate the token on verification.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    pub id: u64,
    pub product_id: u64,
    pub product_name: String,
    pub user_email: String,
    pub status: AccessStatus,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: u64,
    pub title: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
    Put,
}

/// Every route the front-end talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    VerifyToken,
    ListProducts,
    AddProduct,
    UpdateProduct(u64),
    RequestAccess(u64),
    MyAccessRequests,
    AdminUsers,
    AdminAddUser,
    AdminReports,
    Profile,
    UpdateProfile,
    ActivityTime,
}

impl Endpoint {
    pub fn method(self) -> Method {
        match self {
            Endpoint::VerifyToken
            | Endpoint::ListProducts
            | Endpoint::MyAccessRequests
            | Endpoint::AdminUsers
            | Endpoint::AdminReports
            | Endpoint::Profile => Method::Get,
            Endpoint::UpdateProduct(_) | Endpoint::UpdateProfile => Method::Put,
            _ => Method::Post,
        }
    }

    pub fn path(self) -> String {
        match self {
            Endpoint::Login => "/auth/login".into(),
            Endpoint::Register => "/auth/register".into(),
            Endpoint::ForgotPassword => "/auth/forgot-password".into(),
            Endpoint::ResetPassword => "/auth/reset-password".into(),
            Endpoint::VerifyToken => "/auth/verify".into(),
            Endpoint::ListProducts | Endpoint::AddProduct => "/products".into(),
            Endpoint::UpdateProduct(id) => format!("/products/{id}"),
            Endpoint::RequestAccess(id) => format!("/products/{id}/access-requests"),
            Endpoint::MyAccessRequests => "/access-requests/mine".into(),
            Endpoint::AdminUsers | Endpoint::AdminAddUser => "/admin/users".into(),
            Endpoint::AdminReports => "/admin/reports".into(),
            Endpoint::Profile | Endpoint::UpdateProfile => "/users/me".into(),
            Endpoint::ActivityTime => "/users/me/activity".into(),
        }
    }

    pub fn requires_auth(self) -> bool {
        !matches!(
            self,
            Endpoint::Login | Endpoint::Register | Endpoint::ForgotPassword | Endpoint::ResetPassword
        )
    }
}

/// Transport-agnostic request; whatever HTTP client is plugged in just sends these fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(base_url: &str, endpoint: Endpoint) -> Self {
        Self {
            method: endpoint.method(),
            url: format!("{}{}", base_url.trim_end_matches('/'), endpoint.path()),
            bearer: None,
            body: None,
        }
    }

    pub fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn authorized(mut self, session: &Session) -> Self {
        self.bearer = Some(session.token.clone());
        self
    }

    pub fn authorization_header(&self) -> Option<String> {
        self.bearer.as_ref().map(|token| format!("Bearer {token}"))
    }
}
