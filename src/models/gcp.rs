/// A row of `gcloud container clusters list`. Only the leading columns are
/// kept; the rest of the table (versions, node counts, status) is ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GkeCluster {
    pub name: String,
    pub location: String,
}
