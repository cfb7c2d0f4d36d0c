//! Derivation of project health from build history and build configuration

use crate::models::{Build, BuildDetail, Project};
use crate::types::{BuildConfigSummary, BuildStatus, FieldValue, HealthRecord};
use serde_json::Value;
use tracing::warn;

/// Date portion of an ISO-8601 timestamp
pub fn date(timestamp: &str) -> &str {
    timestamp.split_once('T').map_or(timestamp, |(day, _)| day)
}

/// The newest successful build among `builds` (ordered newest first).
///
/// Only the fetched page is searched: a success older than the page looks
/// the same as no success at all.
pub fn last_good_build(builds: &[Build]) -> Option<&Build> {
    match builds.first() {
        Some(latest) if latest.success => Some(latest),
        _ => builds.iter().find(|b| b.success),
    }
}

/// Strip everything up to and including the last `checkouts/<version>/`
pub fn relative_conf_path(path: &str, version: &str) -> String {
    let marker = format!("checkouts/{}/", version);
    match path.rsplit_once(&marker) {
        Some((_, relative)) => relative.to_string(),
        None => path.to_string(),
    }
}

/// Pull python version, Sphinx config path and requirements file out of a
/// resolved build configuration.
pub fn summarize_config(version: &str, config: Option<&Value>) -> BuildConfigSummary {
    let config = match config {
        Some(config) if !config.is_null() => config,
        _ => return BuildConfigSummary::missing(),
    };

    let python_version = match config.pointer("/python/version") {
        Some(Value::String(v)) => FieldValue::Present(v.clone()),
        Some(Value::Number(n)) => FieldValue::Present(n.to_string()),
        Some(Value::Null) => FieldValue::Missing,
        Some(other) => unavailable(format!("python.version is not a string: {}", other)),
        None => unavailable("no python.version in config"),
    };

    let conf_file = match config.get("sphinx") {
        Some(Value::Null) => FieldValue::Missing,
        Some(sphinx) => match sphinx.get("configuration") {
            Some(Value::String(path)) if !path.is_empty() => {
                FieldValue::Present(relative_conf_path(path, version))
            }
            Some(Value::String(_)) | Some(Value::Null) | None => FieldValue::Missing,
            Some(other) => unavailable(format!("sphinx.configuration is not a string: {}", other)),
        },
        None => unavailable("no sphinx section in config"),
    };

    let requirements = match config.pointer("/python/install/0/requirements") {
        Some(Value::String(path)) => FieldValue::Present(path.clone()),
        Some(Value::Null) => FieldValue::Missing,
        Some(other) => unavailable(format!("requirements is not a string: {}", other)),
        None => unavailable("first python.install step has no requirements"),
    };

    BuildConfigSummary {
        has_config: true,
        python_version,
        conf_file,
        requirements,
    }
}

fn unavailable(reason: impl Into<String>) -> FieldValue {
    FieldValue::Unavailable {
        reason: reason.into(),
    }
}

/// Everything known about one project after its builds have been fetched
#[derive(Debug, Clone)]
pub struct ProjectHealth {
    pub record: HealthRecord,
    /// Name of the parent project, for subprojects
    pub parent: Option<String>,
    /// Full timestamp of the newest build
    pub latest_created: Option<String>,
    /// Full timestamp of the newest successful build
    pub last_good_created: Option<String>,
    /// Version slug of the newest build
    pub version: Option<String>,
}

impl ProjectHealth {
    /// Derive the health of `project` from its builds page and the detail of its newest build
    pub fn from_parts(
        repo_url: &str,
        project: &Project,
        builds: &[Build],
        detail: Option<&BuildDetail>,
    ) -> Self {
        let latest = builds.first();
        let last_good = last_good_build(builds);

        let config = match detail {
            Some(detail) => summarize_config(&detail.version, detail.config.as_ref()),
            None => BuildConfigSummary::missing(),
        };
        for (field, value) in [
            ("python_version", &config.python_version),
            ("conf_file", &config.conf_file),
            ("requirements", &config.requirements),
        ] {
            if let FieldValue::Unavailable { reason } = value {
                warn!("{}: {} unavailable ({})", project.name, field, reason);
            }
        }

        let record = HealthRecord {
            repo_url: repo_url.to_string(),
            project_name: project.name.clone(),
            branch: project.default_branch.clone(),
            last_build_date: latest.map(|b| date(&b.created).to_string()).unwrap_or_default(),
            last_build_status: BuildStatus::from(latest.map_or(false, |b| b.success)),
            last_good_build_date: last_good.map(|b| date(&b.created).to_string()),
            config,
        };

        Self {
            record,
            parent: project.subproject_of.as_ref().map(|p| p.name.clone()),
            latest_created: latest.map(|b| b.created.clone()),
            last_good_created: last_good.map(|b| b.created.clone()),
            version: detail.map(|d| d.version.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuildLinks, ProjectLinks, Repository};
    use serde_json::json;

    fn build(created: &str, success: bool) -> Build {
        Build {
            id: None,
            created: created.to_string(),
            success,
            links: BuildLinks {
                self_link: format!("https://readthedocs.org/api/v3/builds/{}/", created),
            },
        }
    }

    fn project() -> Project {
        Project {
            id: Some(1),
            name: "Course Authors".to_string(),
            slug: "course-authors".to_string(),
            repository: Repository {
                url: "https://github.com/edx/docs.git".to_string(),
            },
            default_branch: "master".to_string(),
            subproject_of: None,
            links: ProjectLinks {
                builds: "https://readthedocs.org/api/v3/projects/course-authors/builds/".to_string(),
            },
        }
    }

    #[test]
    fn test_date() {
        assert_eq!(date("2024-01-02T10:15:00Z"), "2024-01-02");
        assert_eq!(date("2024-01-02"), "2024-01-02");
    }

    #[test]
    fn test_last_good_build_scans_past_failures() {
        let builds = vec![
            build("2024-01-03T09:00:00Z", false),
            build("2024-01-02T09:00:00Z", true),
            build("2024-01-01T09:00:00Z", false),
        ];
        let good = last_good_build(&builds).unwrap();
        assert_eq!(date(&good.created), "2024-01-02");
    }

    #[test]
    fn test_last_good_build_never() {
        let builds = vec![
            build("2024-01-03T09:00:00Z", false),
            build("2024-01-02T09:00:00Z", false),
        ];
        assert!(last_good_build(&builds).is_none());
        assert!(last_good_build(&[]).is_none());
    }

    #[test]
    fn test_last_good_build_is_latest_when_latest_succeeded() {
        let builds = vec![
            build("2024-01-03T09:00:00Z", true),
            build("2024-01-02T09:00:00Z", true),
        ];
        let good = last_good_build(&builds).unwrap();
        assert!(std::ptr::eq(good, &builds[0]));
    }

    #[test]
    fn test_relative_conf_path() {
        assert_eq!(
            relative_conf_path(
                "/home/docs/checkouts/readthedocs.org/user_builds/edx/checkouts/latest/en_us/source/conf.py",
                "latest"
            ),
            "en_us/source/conf.py"
        );
        assert_eq!(relative_conf_path("docs/conf.py", "latest"), "docs/conf.py");
    }

    #[test]
    fn test_summarize_full_config() {
        let config = json!({
            "python": {
                "version": "3.8",
                "install": [{"requirements": "requirements/doc.txt"}]
            },
            "sphinx": {
                "configuration": "/home/docs/checkouts/readthedocs.org/user_builds/x/checkouts/v2/docs/conf.py"
            }
        });
        let summary = summarize_config("v2", Some(&config));

        assert!(summary.has_config);
        assert_eq!(summary.python_version, FieldValue::Present("3.8".to_string()));
        assert_eq!(summary.conf_file, FieldValue::Present("docs/conf.py".to_string()));
        assert_eq!(
            summary.requirements,
            FieldValue::Present("requirements/doc.txt".to_string())
        );
    }

    #[test]
    fn test_summarize_null_config() {
        let summary = summarize_config("latest", Some(&Value::Null));
        assert_eq!(summary, BuildConfigSummary::missing());
        assert_eq!(summarize_config("latest", None), BuildConfigSummary::missing());
    }

    #[test]
    fn test_install_without_requirements_is_unavailable() {
        let config = json!({
            "python": {"version": 3, "install": [{"method": "pip", "path": "."}]},
            "sphinx": {"configuration": null}
        });
        let summary = summarize_config("latest", Some(&config));

        assert_eq!(summary.python_version, FieldValue::Present("3".to_string()));
        assert_eq!(summary.conf_file, FieldValue::Missing);
        assert!(matches!(summary.requirements, FieldValue::Unavailable { .. }));
        assert_eq!(summary.requirements.as_str(), "");
    }

    #[test]
    fn test_config_without_sphinx_section() {
        let config = json!({
            "python": {"version": "3.10", "install": [{"requirements": "docs/requirements.txt"}]}
        });
        let summary = summarize_config("latest", Some(&config));

        assert_eq!(
            summary.conf_file,
            FieldValue::Unavailable {
                reason: "no sphinx section in config".to_string()
            }
        );
        assert_eq!(summary.conf_file.as_str(), "");
    }

    #[test]
    fn test_mkdocs_config_has_null_sphinx() {
        let config = json!({
            "python": {"version": "3.10", "install": [{"requirements": "docs/requirements.txt"}]},
            "mkdocs": {"configuration": "mkdocs.yml"},
            "sphinx": null
        });
        let summary = summarize_config("latest", Some(&config));

        assert_eq!(summary.conf_file, FieldValue::Missing);
        assert_eq!(
            summary.requirements,
            FieldValue::Present("docs/requirements.txt".to_string())
        );
    }

    #[test]
    fn test_from_parts_failed_latest() {
        let builds = vec![
            build("2024-01-03T09:00:00Z", false),
            build("2024-01-02T09:00:00Z", true),
        ];
        let detail = BuildDetail {
            version: "latest".to_string(),
            config: None,
        };
        let health = ProjectHealth::from_parts(
            "https://github.com/edx/docs",
            &project(),
            &builds,
            Some(&detail),
        );

        assert_eq!(health.record.last_build_status, BuildStatus::Fail);
        assert_eq!(health.record.last_build_date, "2024-01-03");
        assert_eq!(health.record.last_good_build_date.as_deref(), Some("2024-01-02"));
        assert_eq!(health.last_good_created.as_deref(), Some("2024-01-02T09:00:00Z"));
        assert_eq!(health.version.as_deref(), Some("latest"));
        assert_eq!(
            health.record.csv_row(),
            [
                "https://github.com/edx/docs",
                "Course Authors",
                "master",
                "2024-01-03",
                "fail",
                "2024-01-02",
                "",
                "",
                "",
            ]
        );
    }

    #[test]
    fn test_from_parts_without_builds() {
        let health = ProjectHealth::from_parts("https://github.com/edx/docs", &project(), &[], None);

        assert_eq!(health.record.last_build_status, BuildStatus::Fail);
        assert_eq!(health.record.last_build_date, "");
        assert_eq!(health.record.csv_row()[5], "never");
        assert!(health.latest_created.is_none());
    }
}
