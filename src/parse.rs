use anyhow::Error;
use std::fmt::{self, Display, Formatter};

pub const CLUSTER_NAME_SEP: &str = "/";

/// A cluster name together with the region, resource group or location that
/// scopes it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct QualifiedCluster {
    pub qualifier: String,
    pub name: String,
}

impl QualifiedCluster {
    pub fn new(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: qualifier.into(),
            name: name.into(),
        }
    }
}

impl Display for QualifiedCluster {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.qualifier, CLUSTER_NAME_SEP, self.name)
    }
}

// The qualifier and cluster can either be two separate args, or a single arg
// separated by a slash.
pub fn parse_qualifier_cluster<S: AsRef<str>>(args: &[S]) -> Result<QualifiedCluster, Error> {
    match args {
        [] => Err(Error::msg(
            "invalid cluster specifier, requires at least 1 arg, received 0",
        )),
        [single] => {
            let single = single.as_ref();
            match single.split_once(CLUSTER_NAME_SEP) {
                Some((qualifier, name)) if !qualifier.is_empty() && !name.is_empty() => {
                    Ok(QualifiedCluster::new(qualifier, name))
                }
                _ => Err(Error::msg(format!(
                    "invalid cluster specifier '{}', must be in the form qualifier{}clusterName",
                    single, CLUSTER_NAME_SEP
                ))),
            }
        }
        [qualifier, name, ..] => Ok(QualifiedCluster::new(qualifier.as_ref(), name.as_ref())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_is_an_error() {
        let err = parse_qualifier_cluster::<&str>(&[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid cluster specifier, requires at least 1 arg, received 0"
        );
    }

    #[test]
    fn test_single_arg_splits_on_first_separator() {
        let cluster = parse_qualifier_cluster(&["us-east-1/prod"]).unwrap();
        assert_eq!(cluster, QualifiedCluster::new("us-east-1", "prod"));

        let cluster = parse_qualifier_cluster(&["rg/team/prod"]).unwrap();
        assert_eq!(cluster, QualifiedCluster::new("rg", "team/prod"));
    }

    #[test]
    fn test_single_arg_without_both_halves_is_an_error() {
        for arg in ["prod", "us-east-1/", "/prod"] {
            let err = parse_qualifier_cluster(&[arg]).unwrap_err();
            assert!(err.to_string().contains(&format!("'{}'", arg)), "{}", arg);
        }
    }

    #[test]
    fn test_two_args_are_qualifier_and_name() {
        let cluster = parse_qualifier_cluster(&["westeurope-rg", "aks-1"]).unwrap();
        assert_eq!(cluster.to_string(), "westeurope-rg/aks-1");
    }
}
