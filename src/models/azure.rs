use serde::Deserialize;
use std::fmt::{self, Display, Formatter};
use strum_macros::EnumString;

#[derive(Eq, PartialEq, Debug, Clone, Copy, EnumString)]
pub enum AzureAccountState {
    Enabled,
    Disabled,
    Warned,
    PastDue,
}

/// A row of `az account list --output tsv`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AzureSubscription {
    pub id: String,
    pub name: String,
    pub state: Option<AzureAccountState>,
}

impl AzureSubscription {
    pub fn is_enabled(&self) -> bool {
        self.state != Some(AzureAccountState::Disabled)
    }
}

impl Display for AzureSubscription {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}\t{}", self.id, self.name)
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AzureAksCluster {
    pub name: String,
    pub resource_group: String,
}

impl Display for AzureAksCluster {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "AKS Cluster: {}({})", self.name, self.resource_group)
    }
}
