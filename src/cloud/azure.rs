use crate::cloud::Cloud;
use crate::command::{CommandOutput, CommandRunner};
use crate::models::azure::{AzureAccountState, AzureAksCluster, AzureSubscription};
use crate::parse::QualifiedCluster;
use anyhow::{Context, Error};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::str::FromStr;
use std::sync::Arc;

const AZURE_CMD: &str = "az";

pub struct Azure {
    runner: Arc<dyn CommandRunner>,
}

impl Azure {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl Cloud for Azure {
    async fn list_accounts(&self) -> Result<Vec<String>, Error> {
        let output = self
            .runner
            .run(
                AZURE_CMD,
                &[
                    "account",
                    "list",
                    "--query",
                    "[].{id: id, name: name, state: state}",
                    "--output",
                    "tsv",
                ],
            )
            .await
            .context("unable to list Azure subscriptions")?;

        let subscriptions = parse_subscription_list(&output.stdout)?;
        if subscriptions.is_empty() {
            warn!("No Azure subscriptions found, make sure that you have run \n\n\taz login\n");
        }
        Ok(subscriptions
            .into_iter()
            .filter(|subscription| {
                if !subscription.is_enabled() {
                    debug!("azure: skipping disabled subscription {}", subscription.name);
                }
                subscription.is_enabled()
            })
            .map(|subscription| subscription.to_string())
            .collect())
    }

    async fn list_clusters(&self, subscription: &str) -> Result<Vec<QualifiedCluster>, Error> {
        info!("azure: list-clusters: {}", subscription);
        let output = self
            .runner
            .run(
                AZURE_CMD,
                &[
                    "aks",
                    "list",
                    "--subscription",
                    subscription,
                    "--query",
                    "[].{name: name, resourceGroup: resourceGroup}",
                    "--output",
                    "json",
                ],
            )
            .await
            .with_context(|| format!("unable to list clusters for {}", subscription))?;
        parse_cluster_list(&output.stdout)
    }

    async fn update_kubeconfig(
        &self,
        subscription: &str,
        target: &QualifiedCluster,
    ) -> Result<CommandOutput, Error> {
        info!("azure: update-kubeconfig: {} {}", subscription, target);
        self.runner
            .run(
                AZURE_CMD,
                &[
                    "aks",
                    "get-credentials",
                    "--overwrite-existing",
                    "--subscription",
                    subscription,
                    "--resource-group",
                    target.qualifier.as_str(),
                    "--name",
                    target.name.as_str(),
                ],
            )
            .await
            .with_context(|| format!("unable to update kubeconfig for {}", target))
    }
}

/// Parses `id<TAB>name[<TAB>state]` rows.
pub fn parse_subscription_list(stdout: &str) -> Result<Vec<AzureSubscription>, Error> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            match fields.as_slice() {
                [id, name, rest @ ..] if !id.is_empty() => Ok(AzureSubscription {
                    id: id.to_string(),
                    name: name.to_string(),
                    state: rest
                        .first()
                        .and_then(|state| AzureAccountState::from_str(state).ok()),
                }),
                _ => Err(Error::msg(format!(
                    "unexpected 'az account list' output: {}",
                    line
                ))),
            }
        })
        .collect()
}

pub fn parse_cluster_list(stdout: &str) -> Result<Vec<QualifiedCluster>, Error> {
    let clusters: Vec<AzureAksCluster> = match serde_json::from_str(stdout) {
        Ok(clusters) => clusters,
        Err(err) => {
            warn!("invalid json: {}", stdout);
            return Err(Error::msg(format!(
                "invalid json from 'az aks list': {}",
                err
            )));
        }
    };
    Ok(clusters
        .into_iter()
        .map(|cluster| {
            debug!("azure: found {}", cluster);
            QualifiedCluster::new(cluster.resource_group, cluster.name)
        })
        .collect())
}
