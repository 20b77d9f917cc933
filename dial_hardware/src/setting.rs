use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use dial_traits::MetricSetting;

use crate::error::{HwError, Result};

/// Metric selection stored as the first line of a text file.
#[derive(Debug, Clone)]
pub struct FileMetricSetting {
    path: PathBuf,
}

impl FileMetricSetting {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn first_line(&self) -> Result<String> {
        let mut line = String::new();
        BufReader::new(File::open(&self.path)?).read_line(&mut line)?;
        let value = line.trim_end_matches(['\n', '\r', ' ']).trim_start();
        if value.is_empty() {
            return Err(HwError::EmptySetting);
        }
        Ok(value.to_string())
    }
}

impl MetricSetting for FileMetricSetting {
    fn read(&mut self) -> std::result::Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.first_line()?)
    }
}
