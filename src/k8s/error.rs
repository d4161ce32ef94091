use super::cluster_config::ClusterConfigError;
use super::store::StoreError;

#[derive(thiserror::Error, Debug)]
pub enum K8sError {
    #[error("no kubernetes configuration available: `{0}`")]
    ConfigurationUnavailable(String),

    #[error("the provided cluster config could not be applied: `{0}`")]
    ExplicitConfigInvalid(String),

    #[error("invalid client type provided '{client_type}', must be one of {valid}")]
    InvalidClientType { client_type: String, valid: String },

    #[error("in-cluster configuration failed: `{0}`")]
    InCluster(String),

    #[error("it is not possible to create a k8s client: {0}")]
    UnableToSetupClient(String),

    #[error("the kube client returned an error: `{0}`")]
    Generic(#[from] kube::Error),

    #[error("invalid cluster config: `{0}`")]
    ClusterConfig(#[from] ClusterConfigError),

    #[error("credentials store error: `{0}`")]
    Store(#[from] StoreError),
}
