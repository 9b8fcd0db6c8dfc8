//! Transport seam for the three endpoints the widget talks to.
//!
//! All endpoints are form-encoded `POST`s relative to a base URL:
//!
//! - `register-geo` (`state`, optional `county`, `id`) answers with the HTML
//!   fragment of the new list item, or a plain text error.
//! - `drop-geo` (`id`), whose body is never looked at.
//! - `counties-list` (`state`) answers with a JSON array of county names.

pub mod fragment;
pub mod http;
pub mod local;

use crate::core::geo::{GeoId, NewEntry};
use crate::error::ApiError;

pub use http::HttpGeoApi;
pub use local::LocalGeoApi;

pub const REGISTER_ENDPOINT: &str = "register-geo";
pub const DROP_ENDPOINT: &str = "drop-geo";
pub const COUNTIES_ENDPOINT: &str = "counties-list";

/// A confirmed registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Identifier the server rendered into the fragment, or the requested one.
    pub id: GeoId,
    pub markup: String,
    pub label: String,
}

impl Registration {
    pub fn from_fragment(requested: GeoId, markup: impl Into<String>) -> Self {
        let markup = markup.into();
        let id = fragment::fragment_id(&markup).unwrap_or(requested);
        let label = fragment::fragment_label(&markup);
        Self { id, markup, label }
    }
}

pub trait GeoApi: Send + Sync {
    fn register(&self, entry: &NewEntry) -> Result<Registration, ApiError>;
    fn drop_geo(&self, id: GeoId) -> Result<(), ApiError>;
    fn counties(&self, state: &str) -> Result<Vec<String>, ApiError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    Register(NewEntry),
    Drop { id: GeoId },
    Counties { state: String },
}

impl ApiRequest {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Register(_) => REGISTER_ENDPOINT,
            Self::Drop { .. } => DROP_ENDPOINT,
            Self::Counties { .. } => COUNTIES_ENDPOINT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiReply {
    Registered(Registration),
    Dropped,
    Counties(Vec<String>),
}

/// Outcome of one request, delivered back to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCompletion {
    pub request: ApiRequest,
    pub outcome: Result<ApiReply, ApiError>,
}

impl ApiCompletion {
    pub fn new(request: ApiRequest, outcome: Result<ApiReply, ApiError>) -> Self {
        Self { request, outcome }
    }
}

/// Runs `request` against `api` on the calling thread.
pub fn execute(api: &dyn GeoApi, request: ApiRequest) -> ApiCompletion {
    let outcome = match &request {
        ApiRequest::Register(entry) => api.register(entry).map(ApiReply::Registered),
        ApiRequest::Drop { id } => api.drop_geo(*id).map(|()| ApiReply::Dropped),
        ApiRequest::Counties { state } => api.counties(state).map(ApiReply::Counties),
    };

    match &outcome {
        Ok(_) => tracing::debug!(endpoint = request.endpoint(), "request completed"),
        Err(err) => tracing::warn!(endpoint = request.endpoint(), error = %err, "request failed"),
    }

    ApiCompletion::new(request, outcome)
}
