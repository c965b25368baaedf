use serde::Deserialize;
use std::fmt::{self, Debug, Formatter};

#[derive(Deserialize)]
pub struct AwsEksListClustersResponse {
    pub clusters: Vec<String>,
}

/// One `[profile]` section of the shared credentials file.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AwsCredentials {
    pub profile: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl Debug for AwsCredentials {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("profile", &self.profile)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// A profile section of `~/.aws/config`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsProfileConfig {
    pub name: String,
    pub region: Option<String>,
}
