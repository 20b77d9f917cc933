//! Observation fetch-and-parse.
//!
//! The poller has no timing of its own; the controller decides when to call it.

use dial_traits::ObservationSource;
use serde_json::{Map, Value};

use crate::error::ObservationError;

const OBSERVATION_KEY: &str = "current_observation";
const OBSERVED_AT_KEY: &str = "observation_time_rfc822";

/// Parse a metric string such as `"63%"` or `" 71.5 "` into a number.
pub fn parse_metric(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let s = s.strip_suffix('%').unwrap_or(s).trim_end();
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The `current_observation` object of one fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    fields: Map<String, Value>,
}

impl Observation {
    pub fn parse(body: &str) -> Result<Self, ObservationError> {
        let root: Value =
            serde_json::from_str(body).map_err(|e| ObservationError::Payload(e.to_string()))?;
        match root.get(OBSERVATION_KEY) {
            Some(Value::Object(fields)) => Ok(Self {
                fields: fields.clone(),
            }),
            _ => {
                let reason = root
                    .pointer("/response/error/description")
                    .and_then(Value::as_str)
                    .unwrap_or("missing current_observation");
                Err(ObservationError::Payload(reason.to_string()))
            }
        }
    }

    /// Human-readable observation time, used only for the journal.
    pub fn observed_at(&self) -> Option<&str> {
        self.fields.get(OBSERVED_AT_KEY).and_then(Value::as_str)
    }

    /// The metric as the service reported it.
    pub fn raw(&self, metric: &str) -> Option<String> {
        self.fields.get(metric).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    pub fn value(&self, metric: &str) -> Result<f64, ObservationError> {
        let v = self
            .fields
            .get(metric)
            .ok_or_else(|| ObservationError::MissingMetric(metric.to_string()))?;
        let parsed = match v {
            Value::Number(n) => n.as_f64().filter(|x| x.is_finite()),
            Value::String(s) => parse_metric(s),
            _ => None,
        };
        parsed.ok_or_else(|| ObservationError::Parse {
            metric: metric.to_string(),
            raw: self.raw(metric).unwrap_or_default(),
        })
    }
}

/// Re-derive `metric` from a payload fetched earlier, without touching the source.
pub fn resolve(observation: &Observation, metric: &str) -> Result<f64, ObservationError> {
    observation.value(metric)
}

/// One successful poll.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub value: f64,
    pub raw: String,
    pub observation: Observation,
}

pub struct ObservationPoller<S: ObservationSource> {
    source: S,
}

impl<S: ObservationSource> ObservationPoller<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch once and extract `metric`. No retries.
    pub fn poll(&mut self, metric: &str) -> Result<Reading, ObservationError> {
        let body = self
            .source
            .fetch()
            .map_err(|e| ObservationError::Fetch(e.to_string()))?;
        let observation = Observation::parse(&body)?;
        let value = observation.value(metric)?;
        let raw = observation.raw(metric).unwrap_or_default();
        tracing::info!(metric, value, "observation");
        Ok(Reading {
            value,
            raw,
            observation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_percent() {
        assert_eq!(parse_metric("63%"), Some(63.0));
        assert_eq!(parse_metric(" 63 % "), Some(63.0));
        assert_eq!(parse_metric("-2.5"), Some(-2.5));
        assert_eq!(parse_metric("NA"), None);
        assert_eq!(parse_metric("%"), None);
        assert_eq!(parse_metric("inf"), None);
    }

    #[test]
    fn resolves_string_and_number_fields() {
        let obs = Observation::parse(
            r#"{"current_observation":{"relative_humidity":"63%","dewpoint_f":58,"weather":"Clear"}}"#,
        )
        .unwrap();
        assert_eq!(resolve(&obs, "relative_humidity"), Ok(63.0));
        assert_eq!(resolve(&obs, "dewpoint_f"), Ok(58.0));
        assert_eq!(
            resolve(&obs, "weather"),
            Err(ObservationError::Parse {
                metric: "weather".into(),
                raw: "Clear".into()
            })
        );
        assert_eq!(
            resolve(&obs, "pressure_mb"),
            Err(ObservationError::MissingMetric("pressure_mb".into()))
        );
    }

    #[test]
    fn service_error_description_is_reported() {
        let body = r#"{"response":{"error":{"type":"keynotfound","description":"this key does not exist"}}}"#;
        assert_eq!(
            Observation::parse(body),
            Err(ObservationError::Payload("this key does not exist".into()))
        );
    }
}
