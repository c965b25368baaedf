pub mod aws;
pub mod aws_profiles;
pub mod azure;
pub mod gcp;

use crate::command::CommandOutput;
use crate::parse::QualifiedCluster;
use anyhow::Error;
use async_trait::async_trait;

/// The operations every provider supports, each backed by its native CLI.
#[async_trait]
pub trait Cloud: Send + Sync {
    /// Profiles, subscriptions or projects, one per line.
    async fn list_accounts(&self) -> Result<Vec<String>, Error>;

    async fn list_clusters(&self, account: &str) -> Result<Vec<QualifiedCluster>, Error>;

    async fn update_kubeconfig(
        &self,
        account: &str,
        target: &QualifiedCluster,
    ) -> Result<CommandOutput, Error>;
}
