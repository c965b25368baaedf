use crate::cloud::Cloud;
use crate::command::{CommandOutput, CommandRunner};
use crate::models::gcp::GkeCluster;
use crate::parse::QualifiedCluster;
use anyhow::{Context, Error};
use async_trait::async_trait;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

const GCP_CMD: &str = "gcloud";

static ZONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]+-[a-z]+[0-9]+-[a-z]$").unwrap());

pub struct Gcp {
    runner: Arc<dyn CommandRunner>,
}

impl Gcp {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl Cloud for Gcp {
    async fn list_accounts(&self) -> Result<Vec<String>, Error> {
        let output = self
            .runner
            .run(GCP_CMD, &["projects", "list"])
            .await
            .context("unable to list GCP projects")?;
        Ok(parse_project_list(&output.stdout))
    }

    async fn list_clusters(&self, project: &str) -> Result<Vec<QualifiedCluster>, Error> {
        info!("gcp: list-clusters: {}", project);
        let output = self
            .runner
            .run(
                GCP_CMD,
                &["--project", project, "container", "clusters", "list"],
            )
            .await
            .with_context(|| format!("unable to list clusters for {}", project))?;
        Ok(parse_cluster_list(&output.stdout)?
            .into_iter()
            .map(|cluster| QualifiedCluster::new(cluster.location, cluster.name))
            .collect())
    }

    async fn update_kubeconfig(
        &self,
        project: &str,
        target: &QualifiedCluster,
    ) -> Result<CommandOutput, Error> {
        info!("gcp: update-kubeconfig: {} {}", project, target);
        self.runner
            .run(
                GCP_CMD,
                &[
                    "--project",
                    project,
                    "container",
                    "clusters",
                    "get-credentials",
                    target.name.as_str(),
                    location_flag(&target.qualifier),
                    target.qualifier.as_str(),
                ],
            )
            .await
            .with_context(|| format!("unable to update kubeconfig for {}", target))
    }
}

/// Zonal clusters (`us-central1-a`) need `--zone`, regional ones `--region`.
pub fn location_flag(location: &str) -> &'static str {
    if ZONE_RE.is_match(location) {
        "--zone"
    } else {
        "--region"
    }
}

/// Data rows of a `gcloud` table: the header is skipped and the table ends at
/// the first blank line.
fn table_rows<'a>(stdout: &'a str, header: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    stdout
        .lines()
        .filter(move |line| !line.starts_with(header))
        .take_while(|line| !line.trim().is_empty())
}

pub fn parse_cluster_list(stdout: &str) -> Result<Vec<GkeCluster>, Error> {
    table_rows(stdout, "NAME")
        .map(|line| match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            [name, location, ..] => Ok(GkeCluster {
                name: name.to_string(),
                location: location.to_string(),
            }),
            _ => Err(Error::msg(format!(
                "unexpected 'gcloud container clusters list' output: {}",
                line
            ))),
        })
        .collect()
}

pub fn parse_project_list(stdout: &str) -> Vec<String> {
    table_rows(stdout, "PROJECT_ID")
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}
