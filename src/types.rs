//! Core data types for project health reporting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of the most recent build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Success,
    Fail,
}

impl BuildStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Fail => "fail",
        }
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for BuildStatus {
    fn from(success: bool) -> Self {
        if success {
            Self::Success
        } else {
            Self::Fail
        }
    }
}

/// A value pulled out of the build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Present(String),
    /// The configuration is absent or the field is null
    Missing,
    /// The configuration has an unexpected shape at this field
    Unavailable { reason: String },
}

impl FieldValue {
    /// CSV cell text: the value, or empty
    pub fn as_str(&self) -> &str {
        match self {
            Self::Present(value) => value,
            Self::Missing | Self::Unavailable { .. } => "",
        }
    }
}

/// Console text: the value, empty when missing, `unavailable (<reason>)` otherwise
impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present(value) => f.write_str(value),
            Self::Missing => Ok(()),
            Self::Unavailable { reason } => write!(f, "unavailable ({})", reason),
        }
    }
}

/// Fields derived from a build's resolved configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfigSummary {
    /// Whether the build carried a configuration at all
    pub has_config: bool,
    pub python_version: FieldValue,
    pub conf_file: FieldValue,
    pub requirements: FieldValue,
}

impl BuildConfigSummary {
    pub fn missing() -> Self {
        Self {
            has_config: false,
            python_version: FieldValue::Missing,
            conf_file: FieldValue::Missing,
            requirements: FieldValue::Missing,
        }
    }
}

/// One CSV row: the health of a single project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Normalized repository URL
    pub repo_url: String,
    pub project_name: String,
    pub branch: String,
    /// Date of the newest build, empty when the project has no builds
    pub last_build_date: String,
    pub last_build_status: BuildStatus,
    /// Date of the newest successful build in the fetched page
    pub last_good_build_date: Option<String>,
    pub config: BuildConfigSummary,
}

impl HealthRecord {
    /// Cells in CSV column order
    pub fn csv_row(&self) -> [&str; 9] {
        [
            self.repo_url.as_str(),
            self.project_name.as_str(),
            self.branch.as_str(),
            self.last_build_date.as_str(),
            self.last_build_status.as_str(),
            self.last_good_build_date.as_deref().unwrap_or("never"),
            self.config.python_version.as_str(),
            self.config.conf_file.as_str(),
            self.config.requirements.as_str(),
        ]
    }
}

/// Totals for a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSummary {
    pub generated_at: DateTime<Utc>,
    pub output_path: PathBuf,
    pub projects: usize,
    pub repositories: usize,
    /// Projects whose newest build failed
    pub failing: usize,
    /// Projects with no successful build in the fetched page
    pub never_succeeded: usize,
}

impl AuditSummary {
    pub fn new(output_path: PathBuf) -> Self {
        Self {
            generated_at: Utc::now(),
            output_path,
            projects: 0,
            repositories: 0,
            failing: 0,
            never_succeeded: 0,
        }
    }

    pub fn record(&mut self, record: &HealthRecord) {
        self.projects += 1;
        if record.last_build_status == BuildStatus::Fail {
            self.failing += 1;
        }
        if record.last_good_build_date.is_none() {
            self.never_succeeded += 1;
        }
    }
}
