use crate::cloud::{aws_profiles, Cloud};
use crate::command::{CommandOutput, CommandRunner};
use crate::models::aws::AwsEksListClustersResponse;
use crate::parse::QualifiedCluster;
use anyhow::{Context, Error};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use futures_util::future::try_join_all;
use itertools::Itertools;
use log::{debug, info, warn};
use std::sync::Arc;

const AWS_CMD: &str = "aws";

pub const DEFAULT_REGIONS: [&str; 3] = ["us-east-1", "us-east-2", "us-west-2"];

pub struct Aws {
    runner: Arc<dyn CommandRunner>,
    credentials_file: Utf8PathBuf,
    config_file: Utf8PathBuf,
    // Empty means the defaults plus the profile's configured region.
    regions: Vec<String>,
}

impl Aws {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        credentials_file: Utf8PathBuf,
        config_file: Utf8PathBuf,
        regions: Vec<String>,
    ) -> Self {
        Self {
            runner,
            credentials_file,
            config_file,
            regions,
        }
    }

    fn regions_for(&self, profile: &str) -> Result<Vec<String>, Error> {
        if !self.regions.is_empty() {
            return Ok(resolve_regions(&self.regions, None));
        }
        let configured = aws_profiles::configured_region(&self.config_file, profile)?;
        Ok(resolve_regions(&[], configured))
    }

    async fn list_clusters_in_region(
        &self,
        profile: &str,
        region: &str,
    ) -> Result<Vec<QualifiedCluster>, Error> {
        let output = self
            .runner
            .run(
                AWS_CMD,
                &["--profile", profile, "eks", "--region", region, "list-clusters"],
            )
            .await
            .with_context(|| format!("unable to list clusters for {} in {}", profile, region))?;
        parse_cluster_list(region, &output.stdout)
    }
}

#[async_trait]
impl Cloud for Aws {
    async fn list_accounts(&self) -> Result<Vec<String>, Error> {
        aws_profiles::list_profiles(&self.credentials_file, &self.config_file)
    }

    async fn list_clusters(&self, profile: &str) -> Result<Vec<QualifiedCluster>, Error> {
        let regions = self.regions_for(profile)?;
        info!("aws: list-clusters: {} in {}", profile, regions.join(","));

        let per_region = try_join_all(
            regions
                .iter()
                .map(|region| self.list_clusters_in_region(profile, region)),
        )
        .await?;

        let mut clusters: Vec<QualifiedCluster> = per_region.into_iter().flatten().collect();
        clusters.sort();
        Ok(clusters)
    }

    async fn update_kubeconfig(
        &self,
        profile: &str,
        target: &QualifiedCluster,
    ) -> Result<CommandOutput, Error> {
        info!("aws: update-kubeconfig: {} {}", profile, target);
        self.runner
            .run(
                AWS_CMD,
                &[
                    "--profile",
                    profile,
                    "eks",
                    "--region",
                    target.qualifier.as_str(),
                    "update-kubeconfig",
                    "--name",
                    target.name.as_str(),
                ],
            )
            .await
            .with_context(|| format!("unable to update kubeconfig for {}", target))
    }
}

/// Explicit regions win; otherwise the defaults followed by the configured
/// region. Order is kept and duplicates dropped.
pub fn resolve_regions(explicit: &[String], configured: Option<String>) -> Vec<String> {
    if !explicit.is_empty() {
        return explicit
            .iter()
            .map(|region| region.trim().to_string())
            .filter(|region| !region.is_empty())
            .unique()
            .collect();
    }
    DEFAULT_REGIONS
        .iter()
        .map(|region| region.to_string())
        .chain(configured)
        .unique()
        .collect()
}

pub fn parse_cluster_list(region: &str, stdout: &str) -> Result<Vec<QualifiedCluster>, Error> {
    let response: AwsEksListClustersResponse = match serde_json::from_str(stdout) {
        Ok(response) => response,
        Err(err) => {
            warn!("invalid json: {}", stdout);
            return Err(Error::msg(format!(
                "invalid json from 'aws eks list-clusters' in {}: {}",
                region, err
            )));
        }
    };
    debug!("aws: {}: {} clusters", region, response.clusters.len());
    Ok(response
        .clusters
        .into_iter()
        .map(|cluster| QualifiedCluster::new(region, cluster))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::FakeRunner;
    use std::fs;
    use tempfile::TempDir;

    fn list_cmd(profile: &str, region: &str) -> String {
        format!(
            "aws --profile {} eks --region {} list-clusters",
            profile, region
        )
    }

    fn aws_with(runner: Arc<FakeRunner>, dir: &TempDir, regions: Vec<String>) -> Aws {
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        Aws::new(
            runner,
            root.join("credentials"),
            root.join("config"),
            regions,
        )
    }

    #[test]
    fn test_parse_cluster_list() {
        let clusters =
            parse_cluster_list("us-east-1", r#"{"clusters": ["prod", "dev"]}"#).unwrap();
        assert_eq!(
            clusters,
            vec![
                QualifiedCluster::new("us-east-1", "prod"),
                QualifiedCluster::new("us-east-1", "dev"),
            ]
        );
    }

    #[test]
    fn test_parse_cluster_list_empty() {
        assert!(parse_cluster_list("us-east-2", r#"{"clusters": []}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_parse_cluster_list_invalid_json() {
        let err = parse_cluster_list("us-east-1", "An error occurred").unwrap_err();
        assert!(err.to_string().contains("invalid json"));
    }

    #[test]
    fn test_resolve_regions_defaults_and_configured() {
        assert_eq!(resolve_regions(&[], None), DEFAULT_REGIONS.to_vec());
        assert_eq!(
            resolve_regions(&[], Some("eu-central-1".into())),
            vec!["us-east-1", "us-east-2", "us-west-2", "eu-central-1"]
        );
        assert_eq!(
            resolve_regions(&[], Some("us-east-2".into())),
            DEFAULT_REGIONS.to_vec()
        );
    }

    #[test]
    fn test_resolve_regions_explicit_wins() {
        let explicit = vec!["eu-west-1".to_string(), " ".into(), "eu-west-1".into()];
        assert_eq!(
            resolve_regions(&explicit, Some("us-east-2".into())),
            vec!["eu-west-1"]
        );
    }

    #[tokio::test]
    async fn test_list_clusters_fans_out_and_sorts() {
        let dir = TempDir::new().unwrap();
        let runner = Arc::new(
            FakeRunner::new()
                .respond(&list_cmd("dev", "us-west-2"), r#"{"clusters": ["zeta"]}"#)
                .respond(
                    &list_cmd("dev", "us-east-1"),
                    r#"{"clusters": ["beta", "alpha"]}"#,
                )
                .respond(&list_cmd("dev", "us-east-2"), r#"{"clusters": []}"#),
        );
        let aws = aws_with(runner.clone(), &dir, vec![]);

        let lines: Vec<String> = aws
            .list_clusters("dev")
            .await
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            lines,
            vec!["us-east-1/alpha", "us-east-1/beta", "us-west-2/zeta"]
        );
        assert_eq!(runner.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_list_clusters_includes_configured_region() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config"),
            "[profile dev]\nregion = ap-south-1\n",
        )
        .unwrap();
        let runner = Arc::new(
            FakeRunner::new()
                .respond(&list_cmd("dev", "us-east-1"), r#"{"clusters": []}"#)
                .respond(&list_cmd("dev", "us-east-2"), r#"{"clusters": []}"#)
                .respond(&list_cmd("dev", "us-west-2"), r#"{"clusters": []}"#)
                .respond(&list_cmd("dev", "ap-south-1"), r#"{"clusters": ["edge"]}"#),
        );
        let aws = aws_with(runner.clone(), &dir, vec![]);

        let clusters = aws.list_clusters("dev").await.unwrap();
        assert_eq!(clusters, vec![QualifiedCluster::new("ap-south-1", "edge")]);
        assert!(runner.calls().contains(&list_cmd("dev", "ap-south-1")));
    }

    #[tokio::test]
    async fn test_list_clusters_only_explicit_regions() {
        let dir = TempDir::new().unwrap();
        let runner = Arc::new(
            FakeRunner::new().respond(&list_cmd("dev", "eu-west-1"), r#"{"clusters": ["a"]}"#),
        );
        let aws = aws_with(runner.clone(), &dir, vec!["eu-west-1".into()]);

        let clusters = aws.list_clusters("dev").await.unwrap();
        assert_eq!(clusters, vec![QualifiedCluster::new("eu-west-1", "a")]);
        assert_eq!(runner.calls(), vec![list_cmd("dev", "eu-west-1")]);
    }

    #[tokio::test]
    async fn test_list_clusters_region_failure_fails_listing() {
        let dir = TempDir::new().unwrap();
        let runner = Arc::new(
            FakeRunner::new()
                .respond(&list_cmd("dev", "us-east-1"), r#"{"clusters": ["a"]}"#)
                .fail(&list_cmd("dev", "us-east-2"), "AccessDeniedException")
                .respond(&list_cmd("dev", "us-west-2"), r#"{"clusters": ["b"]}"#),
        );
        let aws = aws_with(runner, &dir, vec![]);

        let err = aws.list_clusters("dev").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "unable to list clusters for dev in us-east-2"
        );
        assert!(format!("{:#}", err).contains("AccessDeniedException"));
    }

    #[tokio::test]
    async fn test_update_kubeconfig_command() {
        let dir = TempDir::new().unwrap();
        let runner = Arc::new(FakeRunner::new().respond(
            "aws --profile dev eks --region us-east-2 update-kubeconfig --name prod",
            "Added new context prod\n",
        ));
        let aws = aws_with(runner, &dir, vec![]);

        let output = aws
            .update_kubeconfig("dev", &QualifiedCluster::new("us-east-2", "prod"))
            .await
            .unwrap();
        assert_eq!(output.stdout, "Added new context prod\n");
    }

    #[tokio::test]
    async fn test_list_accounts_reads_profiles() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("credentials"),
            "[default]\naws_access_key_id = A\n[ops]\n",
        )
        .unwrap();
        let aws = aws_with(Arc::new(FakeRunner::new()), &dir, vec![]);

        assert_eq!(aws.list_accounts().await.unwrap(), vec!["default", "ops"]);
    }
}
