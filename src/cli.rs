use crate::operation::Provider;
use anyhow::Error;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{crate_version, value_parser, Arg, Command};
use clap_complete::Shell;
use std::env;
use std::ffi::OsString;

pub fn command() -> Command {
    clap::command!()
        .name("kcloud")
        .version(crate_version!())
        .about("Retrieve kubernetes configuration from cloud providers")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            provider_command(Provider::Aws, "Amazon EKS clusters via the aws CLI")
                .visible_alias("amazon")
                .arg(
                    Arg::new("region")
                        .long("region")
                        .short('r')
                        .env("KCLOUD_AWS_REGIONS")
                        .value_delimiter(',')
                        .action(clap::ArgAction::Append)
                        .help("Regions to search for clusters (default: us-east-1, us-east-2, us-west-2 and the profile's region)"),
                )
                .arg(
                    Arg::new("credentials-file")
                        .long("credentials-file")
                        .env("AWS_SHARED_CREDENTIALS_FILE")
                        .help("The AWS shared credentials file (default: ~/.aws/credentials)"),
                )
                .arg(
                    Arg::new("config-file")
                        .long("config-file")
                        .env("AWS_CONFIG_FILE")
                        .help("The AWS config file (default: ~/.aws/config)"),
                ),
        )
        .subcommand(
            provider_command(Provider::Azure, "Azure AKS clusters via the az CLI")
                .visible_alias("azr"),
        )
        .subcommand(
            provider_command(Provider::Gcp, "Google GKE clusters via the gcloud CLI")
                .visible_alias("google"),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg_required_else_help(true)
                .arg(Arg::new("generator").value_parser(value_parser!(Shell))),
        )
        .arg(
            Arg::new("verbosity")
                .help("Increases logging verbosity level")
                .long("verbose")
                .short('v')
                .action(clap::ArgAction::Count)
                .global(true),
        )
}

fn provider_command(provider: Provider, about: &'static str) -> Command {
    let account = provider.account_noun();
    let qualifier = provider.qualifier_noun();
    Command::new(provider.to_string())
        .about(about)
        .arg(
            Arg::new("account")
                .value_name(account.to_uppercase())
                .required(false)
                .help(format!(
                    "The {} to use; lists the available {}s when omitted",
                    account, account
                )),
        )
        .arg(
            Arg::new("cluster")
                .value_name(format!("{}/CLUSTER", qualifier.to_uppercase()))
                .num_args(1..=2)
                .required(false)
                .requires("account")
                .help(format!(
                    "The cluster to add to your kubeconfig, as {q}/cluster or {q} cluster; lists the clusters when omitted",
                    q = qualifier
                )),
        )
}

#[derive(Debug, Clone)]
pub struct KcloudEnvironment {
    pub aws_dir: Utf8PathBuf,
    pub kube_dir: Utf8PathBuf,
}

impl KcloudEnvironment {
    pub fn init() -> Result<Self, Error> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| Error::msg("Unable to obtain home directory path"))?;
        let home_dir = Utf8PathBuf::from_path_buf(home_dir)
            .map_err(|path| Error::msg(format!("Home directory is not utf-8: {}", path.display())))?;
        Ok(Self::with_home(home_dir))
    }

    pub fn with_home(home_dir: Utf8PathBuf) -> Self {
        Self {
            aws_dir: home_dir.join(".aws"),
            kube_dir: home_dir.join(".kube"),
        }
    }

    pub fn aws_dir(&self) -> &Utf8Path {
        self.aws_dir.as_path()
    }

    pub fn kube_dir(&self) -> &Utf8Path {
        self.kube_dir.as_path()
    }

    /// The kubeconfig the provider CLIs write to: the first `KUBECONFIG` entry,
    /// else `~/.kube/config`.
    pub fn kubeconfig_path(&self) -> Utf8PathBuf {
        self.kubeconfig_path_from(env::var_os("KUBECONFIG"))
    }

    pub fn kubeconfig_path_from(&self, kubeconfig: Option<OsString>) -> Utf8PathBuf {
        kubeconfig
            .and_then(|paths| env::split_paths(&paths).find(|path| !path.as_os_str().is_empty()))
            .and_then(|path| Utf8PathBuf::from_path_buf(path).ok())
            .unwrap_or_else(|| self.kube_dir().join("config"))
    }
}
