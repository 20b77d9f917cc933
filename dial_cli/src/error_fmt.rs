//! Human-readable error descriptions and structured JSON error formatting.

use dial_core::error::{BuildError, DialError, ObservationError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingCoils => {
                "What happened: No coil driver was provided to the controller.\nLikely causes: GPIO coil outputs failed to initialize or were not wired into the builder.\nHow to fix: Ensure the coil pins open successfully and are passed via with_coils(...).".to_string()
            }
            BuildError::MissingButtons => {
                "What happened: No button panel was provided to the controller.\nLikely causes: Jog button inputs failed to initialize or were not wired into the builder.\nHow to fix: Ensure the button pins open successfully and are passed via with_buttons(...).".to_string()
            }
            BuildError::MissingSource => {
                "What happened: No observation source was provided to the controller.\nLikely causes: The weather source was not wired into the builder.\nHow to fix: Pass a source via with_source(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/weather_dial.toml for a sample."
            ),
        };
    }

    if let Some(oe) = observation_error(err) {
        return match oe {
            ObservationError::Fetch(msg) => format!(
                "What happened: The weather service could not be reached ({msg}).\nLikely causes: No network, wrong observation.base_url, or the request timed out.\nHow to fix: Check connectivity and [observation] in the config; the dial retries after runner.backoff_s."
            ),
            ObservationError::Payload(msg) => format!(
                "What happened: The weather service answered with an unusable payload ({msg}).\nLikely causes: Invalid observation.api_key or an unknown observation.location.\nHow to fix: Verify the key and location in [observation]."
            ),
            ObservationError::MissingMetric(metric) => format!(
                "What happened: The observation has no field named {metric:?}.\nLikely causes: A typo in observation.default_metric or in the metric setting file.\nHow to fix: Use a field of current_observation such as relative_humidity."
            ),
            ObservationError::Parse { metric, raw } => format!(
                "What happened: Metric {metric:?} is not numeric (got {raw:?}).\nLikely causes: The service reports this field as text, or it is temporarily unavailable.\nHow to fix: Pick a numeric metric or wait for the next observation."
            ),
        };
    }

    if let Some(de) = err.downcast_ref::<DialError>() {
        return match de {
            DialError::Config(msg) => format!(
                "What happened: Configuration is invalid or unreadable ({msg}).\nLikely causes: Missing file, TOML syntax error, or a value rejected by validation.\nHow to fix: Edit the config file (see etc/weather_dial.toml) and try again."
            ),
            DialError::HardwareFault(msg) => format!(
                "What happened: The GPIO driver reported a fault ({msg}).\nLikely causes: Pin already in use or insufficient GPIO permissions.\nHow to fix: Check [pins] and that no other process holds the lines."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from init
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("open coil pins") || lower.contains("open button pins") {
        return "What happened: Failed to initialize GPIO pins.\nLikely causes: Incorrect pin numbers or insufficient GPIO permissions.\nHow to fix: Fix the [pins] values in the config; ensure the process has permission to access GPIO.".to_string();
    }

    if lower.contains("dial_sim_buttons") {
        return format!(
            "What happened: The simulated button script is invalid ({msg}).\nLikely causes: Tokens other than L, R, B or - (optionally with *count).\nHow to fix: Use a script such as \"L*20,-*5,R*3\"."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

fn observation_error(err: &eyre::Report) -> Option<&ObservationError> {
    err.downcast_ref::<ObservationError>()
        .or_else(|| match err.downcast_ref::<DialError>() {
            Some(DialError::Observation(oe)) => Some(oe),
            _ => None,
        })
}

/// Configuration problems exit with 2, everything else with 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match (
        err.downcast_ref::<DialError>(),
        err.downcast_ref::<BuildError>(),
    ) {
        (Some(DialError::Config(_)), _) | (_, Some(BuildError::InvalidConfig(_))) => 2,
        _ => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if exit_code_for_error(err) == 2 {
        return "Config";
    }
    if observation_error(err).is_some() {
        return "Observation";
    }
    match err.downcast_ref::<DialError>() {
        Some(DialError::Hardware(_) | DialError::HardwareFault(_)) => "Hardware",
        Some(DialError::Io(_)) => "Io",
        _ => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_exit_with_two() {
        let e = eyre::Report::new(DialError::Config("observation.api_key must be set".into()));
        assert_eq!(exit_code_for_error(&e), 2);
        assert!(humanize(&e).contains("api_key"));
        let e = eyre::Report::new(BuildError::InvalidConfig("motor steps must be >= 2"));
        assert_eq!(exit_code_for_error(&e), 2);
    }

    #[test]
    fn observation_errors_are_explained() {
        let e = eyre::Report::new(DialError::from(ObservationError::Payload(
            "keynotfound".into(),
        )));
        assert_eq!(exit_code_for_error(&e), 1);
        let json: serde_json::Value = serde_json::from_str(&format_error_json(&e)).unwrap();
        assert_eq!(json["reason"], "Observation");
        assert!(json["message"].as_str().unwrap().contains("keynotfound"));
    }
}
