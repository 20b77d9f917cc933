//! Test and helper mocks for dial_core

use dial_traits::MetricSetting;

/// Metric setting that always names the same metric.
#[derive(Debug, Clone)]
pub struct FixedSetting(pub String);

impl MetricSetting for FixedSetting {
    fn read(&mut self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.0.clone())
    }
}

/// Metric setting whose source is never readable.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnreadableSetting;

impl MetricSetting for UnreadableSetting {
    fn read(&mut self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("setting unavailable")))
    }
}
