//! Wire types for the Read the Docs v3 API

use serde::{Deserialize, Serialize};

/// One page of a listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub repository: Repository,
    pub default_branch: String,
    pub subproject_of: Option<ParentProject>,
    #[serde(rename = "_links")]
    pub links: ProjectLinks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentProject {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectLinks {
    pub builds: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    #[serde(default)]
    pub id: Option<u64>,
    pub created: String,
    /// `null` while a build is still running
    #[serde(default, deserialize_with = "null_as_false")]
    pub success: bool,
    #[serde(rename = "_links")]
    pub links: BuildLinks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildLinks {
    #[serde(rename = "_self")]
    pub self_link: String,
}

/// Build detail fetched with `expand=config`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildDetail {
    /// Slug of the version that was built
    pub version: String,
    /// Resolved build configuration. Kept untyped: its shape varies between
    /// config file versions and is picked apart field by field.
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

fn null_as_false<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
