//! Blocking `Session` over `ureq`.
//!
//! Joins the service host to the request path and returns whatever status
//! comes back. ureq's status-as-error behavior is disabled so 4xx/5xx answers
//! reach the classifier as data. Request signing is out of scope; wrap this
//! session (or replace it) to add credentials.

use tracing::debug;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Session};

pub struct UreqSession {
    base_url: String,
    agent: ureq::Agent,
}

impl UreqSession {
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key, value);
    }
    builder
}

impl Session for UreqSession {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, %url, "executing request");

        let headers = request.headers.as_slice();
        let body = request.body.as_deref().unwrap_or_default();
        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(&url), headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&url), headers).call(),
            HttpMethod::Post => with_headers(self.agent.post(&url), headers).send(body.as_bytes()),
            HttpMethod::Put => with_headers(self.agent.put(&url), headers).send(body.as_bytes()),
        };
        let mut response = result.map_err(|e| {
            TransportError::with_source(format!("{} {url} failed", request.method), e)
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::with_source("failed to read response body", e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
