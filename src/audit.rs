//! Main audit orchestration logic

use crate::auth::Authenticator;
use crate::client::{with_query, ApiClient};
use crate::config::HealthConfig;
use crate::error::{HealthError, Result};
use crate::health::ProjectHealth;
use crate::models::{Build, BuildDetail, Page, Project};
use crate::normalize::group_by_repository;
use crate::report::{self, CsvSink};
use crate::types::AuditSummary;
use std::io::Write;
use tracing::{debug, info};

/// Audit every project visible to the configured token.
///
/// The token is resolved from the environment or netrc before any request is made.
pub async fn run_audit(config: &HealthConfig, out: &mut impl Write) -> Result<AuditSummary> {
    config.validate()?;
    let auth = Authenticator::from_env(config)?;
    run_audit_with(config, &auth, out).await
}

/// Audit with an already resolved credential
pub async fn run_audit_with(
    config: &HealthConfig,
    auth: &Authenticator,
    out: &mut impl Write,
) -> Result<AuditSummary> {
    info!("Starting audit against {}", config.api_base);

    let client = ApiClient::new(auth, &config.network)?;
    let limit = config.network.page_limit.to_string();

    let mut sink = CsvSink::create(&config.output_path)?;

    let projects_url = with_query(&format!("{}/projects/", config.api_base), "limit", &limit)?;
    let page: Page<Project> = client.get_json(&projects_url).await?;
    if page.next.is_some() {
        return Err(HealthError::PaginationLimit {
            count: page.count,
            limit: config.network.page_limit,
        });
    }
    report::write_project_count(out, page.count)?;

    let groups = group_by_repository(page.results);
    let mut summary = AuditSummary::new(config.output_path.clone());
    summary.repositories = groups.len();

    for (repo_url, projects) in &groups {
        report::write_group_header(out, repo_url, projects.len())?;

        for project in projects {
            let health = fetch_project_health(&client, repo_url, project, &limit).await?;
            report::write_project(out, &health, &config.default_branch)?;
            sink.write(&health.record)?;
            summary.record(&health.record);
        }
    }

    let path = sink.finish()?;
    writeln!(out, "Wrote {}", path.display())?;

    info!(
        "Audit complete: {} projects in {} repositories, {} failing, {} without a successful build",
        summary.projects, summary.repositories, summary.failing, summary.never_succeeded
    );

    Ok(summary)
}

/// Fetch the builds page and newest build detail for one project
async fn fetch_project_health(
    client: &ApiClient,
    repo_url: &str,
    project: &Project,
    limit: &str,
) -> Result<ProjectHealth> {
    debug!("Processing project: {}", project.name);

    let builds_url = with_query(&project.links.builds, "limit", limit)?;
    let builds: Page<Build> = client.get_json(&builds_url).await?;

    let detail = match builds.results.first() {
        Some(latest) => {
            let detail_url = with_query(&latest.links.self_link, "expand", "config")?;
            Some(client.get_json::<BuildDetail>(&detail_url).await?)
        }
        None => {
            debug!("{} has no builds", project.name);
            None
        }
    };

    Ok(ProjectHealth::from_parts(
        repo_url,
        project,
        &builds.results,
        detail.as_ref(),
    ))
}
