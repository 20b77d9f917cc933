//! Weather Underground "conditions" fetch over plain HTTP.

use std::time::Duration;

use dial_traits::ObservationSource;

use crate::error::{HwError, Result};

pub struct HttpObservationSource {
    agent: ureq::Agent,
    url: String,
    api_key: String,
}

impl HttpObservationSource {
    /// `{base_url}/{api_key}/conditions/q/{location}`
    pub fn new(base_url: &str, api_key: &str, location: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            url: conditions_url(base_url, api_key, location),
            api_key: api_key.to_string(),
        }
    }

    fn get(&self) -> Result<String> {
        let resp = self
            .agent
            .get(&self.url)
            .call()
            .map_err(|e| HwError::Http(redact(&e.to_string(), &self.api_key)))?;
        Ok(resp.into_string()?)
    }
}

impl ObservationSource for HttpObservationSource {
    fn fetch(&mut self) -> std::result::Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let body = self.get()?;
        tracing::debug!(bytes = body.len(), "observation fetched");
        Ok(body)
    }
}

pub fn conditions_url(base_url: &str, api_key: &str, location: &str) -> String {
    format!(
        "{}/{}/conditions/q/{}",
        base_url.trim_end_matches('/'),
        api_key,
        location.trim_start_matches('/')
    )
}

/// Keep the API key out of error messages and logs.
fn redact(msg: &str, secret: &str) -> String {
    if secret.is_empty() {
        return msg.to_string();
    }
    msg.replace(secret, "***")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_segments_without_double_slashes() {
        assert_eq!(
            conditions_url("http://api.example/api/", "KEY", "/IL/O'Fallon.json"),
            "http://api.example/api/KEY/conditions/q/IL/O'Fallon.json"
        );
    }

    #[test]
    fn redact_hides_key() {
        assert_eq!(
            redact("http://x/api/abc123/conditions: status 500", "abc123"),
            "http://x/api/***/conditions: status 500"
        );
        assert_eq!(redact("plain", ""), "plain");
    }
}
