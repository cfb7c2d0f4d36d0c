//! Repository URL canonicalization and grouping

use crate::models::Project;
use std::collections::BTreeMap;

/// Canonical form of a repository URL, so that projects built from the same
/// repository end up in the same group.
///
/// Each pass strips a `.git` suffix, rewrites `http:` to `https:` and strips
/// one trailing `/`. Passes repeat until nothing changes, so `repo.git/`
/// and `repo` land in the same group.
pub fn normalize_url(url: &str) -> String {
    let mut current = url.to_string();
    loop {
        let next = normalize_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn normalize_once(url: &str) -> String {
    let url = url.strip_suffix(".git").unwrap_or(url);
    let url = match url.strip_prefix("http:") {
        Some(rest) => format!("https:{}", rest),
        None => url.to_string(),
    };
    match url.strip_suffix('/') {
        Some(trimmed) => trimmed.to_string(),
        None => url,
    }
}

/// Group projects by normalized repository URL. Groups iterate in key order;
/// projects within a group keep the order they were given in.
pub fn group_by_repository(projects: Vec<Project>) -> BTreeMap<String, Vec<Project>> {
    let mut groups: BTreeMap<String, Vec<Project>> = BTreeMap::new();
    for project in projects {
        groups
            .entry(normalize_url(&project.repository.url))
            .or_default()
            .push(project);
    }
    groups
}
