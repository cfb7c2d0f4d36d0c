//! # docs_health_audit
//!
//! Audits the publish health of Read the Docs projects:
//! - **Latest build**: date and outcome of each project's newest build
//! - **Last good build**: newest successful build, or "never"
//! - **Build config**: python version, Sphinx `conf.py` path, requirements file
//!
//! Projects are grouped by their normalized source repository, reported to the
//! console, and summarized in a CSV file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docs_health_audit::{run_audit, HealthConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = HealthConfig::default();
//! let summary = run_audit(&config, &mut std::io::stdout()).await?;
//!
//! println!("{} projects, {} failing", summary.projects, summary.failing);
//! # Ok(())
//! # }
//! ```

mod audit;
mod auth;
mod client;
mod config;
mod error;
mod health;
mod models;
mod normalize;
mod report;
mod types;

// Re-export public API
pub use audit::{run_audit, run_audit_with};
pub use auth::{Authenticator, TOKEN_ENV_VAR};
pub use client::ApiClient;
pub use config::{HealthConfig, HealthConfigBuilder, NetworkConfig};
pub use error::{HealthError, Result};
pub use health::{date, last_good_build, ProjectHealth};
pub use models::{Build, BuildDetail, Page, Project};
pub use normalize::{group_by_repository, normalize_url};
pub use report::{CsvSink, CSV_HEADER};
pub use types::{AuditSummary, BuildConfigSummary, BuildStatus, FieldValue, HealthRecord};
