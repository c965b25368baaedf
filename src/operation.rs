use crate::cli::KcloudEnvironment;
use crate::cloud::{aws::Aws, azure::Azure, gcp::Gcp, Cloud};
use crate::command::CommandRunner;
use crate::models::kubeconfig::Kubeconfig;
use crate::parse::{parse_qualifier_cluster, QualifiedCluster};
use anyhow::Error;
use camino::{Utf8Path, Utf8PathBuf};
use clap::ArgMatches;
use log::{debug, info};
use std::sync::Arc;
use strum_macros::{Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
pub enum Provider {
    #[strum(to_string = "aws", serialize = "amazon")]
    Aws,
    #[strum(to_string = "azure", serialize = "azr")]
    Azure,
    #[strum(to_string = "gcp", serialize = "google")]
    Gcp,
}

impl Provider {
    pub fn parse(name: &str) -> Result<Self, Error> {
        name.parse()
            .map_err(|_| Error::msg(format!("unrecognized cloud provider: {}", name)))
    }

    pub fn account_noun(&self) -> &'static str {
        match self {
            Provider::Aws => "profile",
            Provider::Azure => "subscription",
            Provider::Gcp => "project",
        }
    }

    pub fn qualifier_noun(&self) -> &'static str {
        match self {
            Provider::Aws => "region",
            Provider::Azure => "resource-group",
            Provider::Gcp => "location",
        }
    }

    pub fn cloud(
        &self,
        environment: &KcloudEnvironment,
        matches: &ArgMatches,
        runner: Arc<dyn CommandRunner>,
    ) -> Box<dyn Cloud> {
        match self {
            Provider::Aws => Box::new(Aws::new(
                runner,
                path_arg(matches, "credentials-file")
                    .unwrap_or_else(|| environment.aws_dir().join("credentials")),
                path_arg(matches, "config-file")
                    .unwrap_or_else(|| environment.aws_dir().join("config")),
                matches
                    .get_many::<String>("region")
                    .map(|regions| regions.cloned().collect())
                    .unwrap_or_default(),
            )),
            Provider::Azure => Box::new(Azure::new(runner)),
            Provider::Gcp => Box::new(Gcp::new(runner)),
        }
    }
}

fn path_arg(matches: &ArgMatches, name: &str) -> Option<Utf8PathBuf> {
    matches
        .get_one::<String>(name)
        .map(|path| Utf8PathBuf::from(shellexpand::tilde(path).into_owned()))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    ListAccounts,
    ListClusters {
        account: String,
    },
    UpdateKubeconfig {
        account: String,
        target: QualifiedCluster,
    },
}

impl Operation {
    pub fn parse<S: AsRef<str>>(account: Option<&str>, cluster: &[S]) -> Result<Self, Error> {
        match (account, cluster) {
            (None, []) => Ok(Operation::ListAccounts),
            (None, _) => Err(Error::msg("a cluster was given without an account")),
            (Some(account), []) => Ok(Operation::ListClusters {
                account: account.to_string(),
            }),
            (Some(account), cluster) => Ok(Operation::UpdateKubeconfig {
                account: account.to_string(),
                target: parse_qualifier_cluster(cluster)?,
            }),
        }
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Self, Error> {
        let cluster: Vec<&String> = matches
            .get_many::<String>("cluster")
            .map(|values| values.collect())
            .unwrap_or_default();
        Operation::parse(
            matches.get_one::<String>("account").map(String::as_str),
            &cluster,
        )
    }

    /// Runs the operation, returning the lines to print.
    pub async fn run(&self, cloud: &dyn Cloud) -> Result<Vec<String>, Error> {
        match self {
            Operation::ListAccounts => cloud.list_accounts().await,
            Operation::ListClusters { account } => Ok(cloud
                .list_clusters(account)
                .await?
                .iter()
                .map(ToString::to_string)
                .collect()),
            Operation::UpdateKubeconfig { account, target } => {
                let output = cloud.update_kubeconfig(account, target).await?;
                Ok(output
                    .combined()
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(str::to_string)
                    .collect())
            }
        }
    }
}

pub async fn execute(
    environment: &KcloudEnvironment,
    runner: Arc<dyn CommandRunner>,
    provider: Provider,
    matches: &ArgMatches,
) -> Result<(), Error> {
    let operation = Operation::from_matches(matches)?;
    debug!("{}: {:?}", provider, operation);

    let cloud = provider.cloud(environment, matches, runner);
    for line in operation.run(cloud.as_ref()).await? {
        println!("{}", line);
    }

    if let Operation::UpdateKubeconfig { .. } = operation {
        report_current_context(&environment.kubeconfig_path());
    }
    Ok(())
}

fn report_current_context(kubeconfig: &Utf8Path) {
    if let Some(context) = current_context(kubeconfig) {
        info!("current context: {}", context);
    }
}

/// A missing or unreadable kubeconfig only rates a debug line.
fn current_context(kubeconfig: &Utf8Path) -> Option<String> {
    match Kubeconfig::read_from(kubeconfig) {
        Ok(Kubeconfig {
            current_context: Some(context),
        }) => Some(context),
        Ok(_) => {
            debug!("{} has no current context", kubeconfig);
            None
        }
        Err(err) => {
            debug!("unable to read {}: {:#}", kubeconfig, err);
            None
        }
    }
}
