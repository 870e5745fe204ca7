//! Response and error envelope.
//!
//! # Responsibility
//! - Map every error kind to one HTTP status.
//! - Serialize success payloads and error bodies as JSON.
//! - Attach the fixed cross-origin headers to every reply.
//!
//! # Invariants
//! - 204 replies carry no body and no `Content-Type`.
//! - Error bodies are `{"error": "<message>"}`; only the status is contractual.

use crate::router::RouteError;
use log::error;
use serde::Serialize;
use serde_json::json;
use shoplist_core::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Cursor;
use tiny_http::{Header, Response, StatusCode};

pub const CORS_HEADERS: &[(&str, &str)] = &[
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Methods",
        "GET, POST, PUT, PATCH, DELETE, OPTIONS",
    ),
    ("Access-Control-Allow-Headers", "Content-Type, Authorization"),
];

const JSON_CONTENT_TYPE: &str = "application/json";

/// Error kinds surfaced at the HTTP boundary.
#[derive(Debug)]
pub enum ApiError {
    /// Request body is not parseable JSON of the expected shape.
    BadBody(String),
    Validation(String),
    MalformedId,
    MalformedUrl,
    MethodNotAllowed,
    NotFound(String),
    Conflict(String),
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            Self::BadBody(_) | Self::Validation(_) | Self::MalformedId | Self::MalformedUrl => 400,
            Self::NotFound(_) => 404,
            Self::MethodNotAllowed => 405,
            Self::Conflict(_) => 409,
            Self::Storage(_) => 500,
        }
    }

    /// Client-facing message. Storage details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            Self::Storage(_) => "internal storage error".to_string(),
            other => other.to_string(),
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadBody(details) => write!(f, "invalid request body: {details}"),
            Self::Validation(message) => write!(f, "{message}"),
            Self::MalformedId => write!(f, "invalid id"),
            Self::MalformedUrl => write!(f, "invalid url"),
            Self::MethodNotAllowed => write!(f, "method not allowed"),
            Self::NotFound(message) => write!(f, "{message}"),
            Self::Conflict(message) => write!(f, "{message}"),
            Self::Storage(message) => write!(f, "storage error: {message}"),
        }
    }
}

impl Error for ApiError {}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err.to_string()),
            RepoError::NotFound { .. } => Self::NotFound(value.to_string()),
            RepoError::Conflict(message) => Self::Conflict(message),
            RepoError::Db(_) | RepoError::InvalidData(_) => Self::Storage(value.to_string()),
        }
    }
}

impl From<RouteError> for ApiError {
    fn from(value: RouteError) -> Self {
        match value {
            RouteError::NoMatch => Self::NotFound("no such resource".to_string()),
            RouteError::MalformedId => Self::MalformedId,
            RouteError::MalformedUrl => Self::MalformedUrl,
            RouteError::MethodNotAllowed => Self::MethodNotAllowed,
        }
    }
}

impl From<shoplist_core::DbError> for ApiError {
    fn from(value: shoplist_core::DbError) -> Self {
        Self::Storage(value.to_string())
    }
}

/// Successful operation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    /// `None` for 204.
    pub body: Option<Vec<u8>>,
}

impl Reply {
    pub fn ok<T: Serialize + ?Sized>(payload: &T) -> Result<Self, ApiError> {
        Self::json(200, payload)
    }

    pub fn created<T: Serialize + ?Sized>(payload: &T) -> Result<Self, ApiError> {
        Self::json(201, payload)
    }

    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    fn json<T: Serialize + ?Sized>(status: u16, payload: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_vec(payload)
            .map_err(|err| ApiError::Storage(format!("response encoding failed: {err}")))?;
        Ok(Self {
            status,
            body: Some(body),
        })
    }
}

/// Fully rendered reply, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: Vec<u8>,
}

impl HttpReply {
    fn with_cors(status: u16, body: Vec<u8>, json_body: bool) -> Self {
        let mut headers = CORS_HEADERS.to_vec();
        if json_body {
            headers.push(("Content-Type", JSON_CONTENT_TYPE));
        }
        Self {
            status,
            headers,
            body,
        }
    }

    /// Answer to a cross-origin preflight.
    pub fn preflight() -> Self {
        Self::with_cors(200, Vec::new(), false)
    }

    pub fn header(&self, name: &str) -> Option<&'static str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }

    pub fn body_json(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Converts into a `tiny_http` response.
    pub fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        let mut response = Response::from_data(self.body).with_status_code(StatusCode(self.status));
        for (name, value) in self.headers {
            match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                Ok(header) => response.add_header(header),
                Err(()) => error!(
                    "event=http_header module=server status=error header={}",
                    name
                ),
            }
        }
        response
    }
}

impl From<Reply> for HttpReply {
    fn from(value: Reply) -> Self {
        match value.body {
            Some(body) => Self::with_cors(value.status, body, true),
            None => Self::with_cors(value.status, Vec::new(), false),
        }
    }
}

impl From<ApiError> for HttpReply {
    fn from(value: ApiError) -> Self {
        let body = json!({ "error": value.public_message() }).to_string();
        Self::with_cors(value.status(), body.into_bytes(), true)
    }
}
