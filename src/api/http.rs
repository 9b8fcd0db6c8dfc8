use crate::api::{COUNTIES_ENDPOINT, DROP_ENDPOINT, GeoApi, REGISTER_ENDPOINT, Registration};
use crate::core::geo::{GeoId, NewEntry};
use crate::error::ApiError;
use std::time::Duration;

const USER_AGENT: &str = concat!("geolist/", env!("CARGO_PKG_VERSION"));

/// Talks to the geo endpoints over HTTP.
pub struct HttpGeoApi {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpGeoApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            base_url: base_url.into(),
        }
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        join_url(&self.base_url, endpoint)
    }

    fn post_form(&self, endpoint: &str, fields: &[(&str, &str)]) -> Result<String, ApiError> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(%url, "posting form");

        match self.agent.post(&url).send_form(fields) {
            Ok(response) => response
                .into_string()
                .map_err(|err| ApiError::Transport(format!("reading {url}: {err}"))),
            Err(ureq::Error::Status(status, response)) => Err(ApiError::Rejected {
                status,
                body: response.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(err)) => Err(ApiError::Transport(err.to_string())),
        }
    }
}

impl GeoApi for HttpGeoApi {
    fn register(&self, entry: &NewEntry) -> Result<Registration, ApiError> {
        let fields = entry.form_fields();
        let pairs: Vec<(&str, &str)> = fields
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .collect();
        let body = self.post_form(REGISTER_ENDPOINT, &pairs)?;
        Ok(Registration::from_fragment(entry.id, body))
    }

    fn drop_geo(&self, id: GeoId) -> Result<(), ApiError> {
        let id = id.to_string();
        self.post_form(DROP_ENDPOINT, &[("id", id.as_str())])
            .map(|_| ())
    }

    fn counties(&self, state: &str) -> Result<Vec<String>, ApiError> {
        let body = self.post_form(COUNTIES_ENDPOINT, &[("state", state)])?;
        serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

fn join_url(base: &str, endpoint: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), endpoint.trim_start_matches('/'))
}
