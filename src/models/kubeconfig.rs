use anyhow::{Context, Error};
use camino::Utf8Path;
use serde::Deserialize;
use std::fs;

/// The part of a kubeconfig file kcloud reports on.
#[derive(Deserialize, Debug, Default)]
pub struct Kubeconfig {
    #[serde(rename = "current-context")]
    pub current_context: Option<String>,
}

impl Kubeconfig {
    pub fn from_yaml(contents: &str) -> Result<Self, Error> {
        serde_yaml::from_str(contents).context("invalid kubeconfig yaml")
    }

    pub fn read_from(path: &Utf8Path) -> Result<Self, Error> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("unable to read {}", path))?;
        Self::from_yaml(&contents)
    }
}
