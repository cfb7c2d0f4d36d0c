//! Console report and CSV output

use crate::error::Result;
use crate::health::ProjectHealth;
use crate::types::{BuildStatus, FieldValue, HealthRecord};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CSV_HEADER: [&str; 9] = [
    "repo",
    "title",
    "branch",
    "last_build",
    "succeeded",
    "last_good_build",
    "python_version",
    "conf_file",
    "requirements",
];

/// CSV output for one run. Rows are flushed as they are written, so whatever
/// was written before a failure stays on disk; the file is closed on drop.
pub struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<File>,
    rows: usize,
}

impl CsvSink {
    /// Create (or truncate) `path` and write the header row
    pub fn create(path: &Path) -> Result<Self> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(CSV_HEADER)?;
        writer.flush()?;
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            rows: 0,
        })
    }

    pub fn write(&mut self, record: &HealthRecord) -> Result<()> {
        self.writer.write_record(record.csv_row())?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and close the file, returning its path
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        debug!("Wrote {} rows to {}", self.rows, self.path.display());
        Ok(self.path)
    }
}

pub fn write_project_count(out: &mut impl Write, count: u64) -> Result<()> {
    writeln!(out, "{} projects", count)?;
    Ok(())
}

pub fn write_group_header(out: &mut impl Write, repo_url: &str, projects: usize) -> Result<()> {
    if projects > 1 {
        writeln!(out, "repo {}: {} projects", repo_url, projects)?;
    } else {
        writeln!(out, "repo {}:", repo_url)?;
    }
    Ok(())
}

/// Console block for one project
pub fn write_project(
    out: &mut impl Write,
    health: &ProjectHealth,
    default_branch: &str,
) -> Result<()> {
    let record = &health.record;

    let mut title = format!("    \"{}\"", record.project_name);
    if record.branch != default_branch {
        title.push_str(&format!(" (branch {})", record.branch));
    }
    if let Some(parent) = &health.parent {
        title.push_str(&format!(" (sub of: {})", parent));
    }
    writeln!(out, "{}", title)?;

    let Some(latest) = &health.latest_created else {
        writeln!(out, "        ** no builds")?;
        return Ok(());
    };

    let failed = if record.last_build_status == BuildStatus::Fail {
        " failed"
    } else {
        ""
    };
    writeln!(out, "        latest build: {}{}", latest, failed)?;

    if record.last_build_status == BuildStatus::Fail {
        match &health.last_good_created {
            Some(created) => writeln!(out, "        last success: {}", created)?,
            None => writeln!(out, "        ** no successful build")?,
        }
    }

    if let Some(version) = &health.version {
        writeln!(out, "        version: {}", version)?;
    }

    let config = &record.config;
    if config.has_config {
        writeln!(out, "        python version: {}", config.python_version)?;
        writeln!(out, "        conf file: {}", config.conf_file)?;
        if config.requirements != FieldValue::Missing {
            writeln!(out, "        requirements: {}", config.requirements)?;
        }
    }

    Ok(())
}
