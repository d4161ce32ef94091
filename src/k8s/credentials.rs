use super::client::{ResourceClient, ScopedClient};
use super::cluster_config::ClusterConfig;
use super::error::K8sError;
use super::provider::ClientProvider;
use super::store::CredentialsStore;
use kube::Config;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Credentials for generating configured Kubernetes API clients.
///
/// The optional cluster config pins a specific kubeconfig context. Without it clients are
/// configured from the in-cluster service account or the local kubeconfig.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KubernetesCredentials {
    #[serde(default)]
    cluster_config: Option<ClusterConfig>,
}

impl KubernetesCredentials {
    pub fn new(cluster_config: Option<ClusterConfig>) -> Self {
        Self { cluster_config }
    }

    /// Loads the credentials stored under `name`.
    pub fn load<S>(store: &S, name: &str) -> Result<Self, K8sError>
    where
        S: CredentialsStore + ?Sized,
    {
        Ok(store.load(name)?)
    }

    pub fn cluster_config(&self) -> Option<&ClusterConfig> {
        self.cluster_config.as_ref()
    }

    /// Acquires an authenticated client for `client_type` (`apps`, `batch` or `core`).
    pub async fn get_client(
        &self,
        client_type: &str,
        configuration: Option<Config>,
    ) -> Result<ScopedClient, K8sError> {
        ClientProvider::default()
            .acquire_client(self, client_type, configuration)
            .await
    }

    /// Same as [KubernetesCredentials::get_client] but limiting the client to the scope of `f`.
    pub async fn with_client<F, Fut, R, E>(
        &self,
        client_type: &str,
        configuration: Option<Config>,
        f: F,
    ) -> Result<R, E>
    where
        F: FnOnce(ResourceClient) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: From<K8sError>,
    {
        ClientProvider::default()
            .with_client(self, client_type, configuration, f)
            .await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::k8s::cluster_config::test::KUBECONFIG;
    use crate::k8s::store::{MockCredentialsStore, StoreError};
    use assert_matches::assert_matches;
    use mockall::predicate;

    #[test]
    fn test_load_from_store() {
        let mut store = MockCredentialsStore::new();
        store
            .expect_load()
            .once()
            .with(predicate::eq("my-k8s-credentials"))
            .returning(|_| {
                Ok(KubernetesCredentials::new(Some(
                    ClusterConfig::from_yaml(KUBECONFIG, None).unwrap(),
                )))
            });

        let credentials = KubernetesCredentials::load(&store, "my-k8s-credentials").unwrap();
        assert_eq!(
            credentials.cluster_config().unwrap().context_name(),
            "test-context"
        );
    }

    #[test]
    fn test_load_missing_from_store() {
        let mut store = MockCredentialsStore::new();
        store
            .expect_load()
            .once()
            .returning(|name| Err(StoreError::NotFound(name.to_string())));

        let result = KubernetesCredentials::load(&store, "missing");
        assert_matches!(result, Err(K8sError::Store(StoreError::NotFound(_))));
    }

    #[test]
    fn test_deserialize_without_cluster_config() {
        let credentials: KubernetesCredentials = serde_yaml::from_str("{}").unwrap();
        assert!(credentials.cluster_config().is_none());
    }

    #[tokio::test]
    async fn test_get_client_invalid_type() {
        let result = KubernetesCredentials::default()
            .get_client("widgets", None)
            .await;
        assert_matches!(result, Err(K8sError::InvalidClientType { client_type, .. }) => {
            assert_eq!(client_type, "widgets");
        });
    }

    #[tokio::test]
    async fn test_with_client_invalid_configuration() {
        let credentials = KubernetesCredentials::new(Some(
            ClusterConfig::from_yaml(KUBECONFIG, Some("broken-context")).unwrap(),
        ));
        let result: Result<(), K8sError> = credentials
            .with_client("core", None, |_| async { Ok(()) })
            .await;
        assert_matches!(result, Err(K8sError::ExplicitConfigInvalid(_)));
    }
}
