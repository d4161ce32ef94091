use super::error::K8sError;
use super::transport::Transport;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Pod, Secret, Service};
use kube::api::ListParams;
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use std::fmt::{self, Debug, Display};
use std::ops::Deref;
use std::str::FromStr;
use tracing::debug;

/// The Kubernetes API group a [ResourceClient] is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientType {
    Apps,
    Batch,
    Core,
}

impl ClientType {
    pub const ALL: [ClientType; 3] = [ClientType::Apps, ClientType::Batch, ClientType::Core];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Apps => "apps",
            ClientType::Batch => "batch",
            ClientType::Core => "core",
        }
    }

    fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(|client_type| format!("'{}'", client_type))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for ClientType {
    type Err = K8sError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apps" => Ok(ClientType::Apps),
            "batch" => Ok(ClientType::Batch),
            "core" => Ok(ClientType::Core),
            other => Err(K8sError::InvalidClientType {
                client_type: other.to_string(),
                valid: Self::valid_values(),
            }),
        }
    }
}

impl Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client for the workload resources of the `apps/v1` group.
#[derive(Clone)]
pub struct AppsClient {
    client: Client,
}

impl AppsClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn deployments(&self, namespace: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), namespace)
    }

    pub fn stateful_sets(&self, namespace: &str) -> Api<StatefulSet> {
        Api::namespaced(self.client.clone(), namespace)
    }

    pub fn daemon_sets(&self, namespace: &str) -> Api<DaemonSet> {
        Api::namespaced(self.client.clone(), namespace)
    }

    pub fn replica_sets(&self, namespace: &str) -> Api<ReplicaSet> {
        Api::namespaced(self.client.clone(), namespace)
    }

    pub async fn deployment_names(&self, namespace: &str) -> Result<Vec<String>, K8sError> {
        list_names(&self.deployments(namespace)).await
    }
}

/// Client for the `batch/v1` group.
#[derive(Clone)]
pub struct BatchClient {
    client: Client,
}

impl BatchClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn jobs(&self, namespace: &str) -> Api<Job> {
        Api::namespaced(self.client.clone(), namespace)
    }

    pub fn cron_jobs(&self, namespace: &str) -> Api<CronJob> {
        Api::namespaced(self.client.clone(), namespace)
    }

    pub async fn job_names(&self, namespace: &str) -> Result<Vec<String>, K8sError> {
        list_names(&self.jobs(namespace)).await
    }
}

/// Client for the core (`v1`) resources such as pods and services.
#[derive(Clone)]
pub struct CoreClient {
    client: Client,
}

impl CoreClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }

    pub fn services(&self, namespace: &str) -> Api<Service> {
        Api::namespaced(self.client.clone(), namespace)
    }

    pub fn config_maps(&self, namespace: &str) -> Api<ConfigMap> {
        Api::namespaced(self.client.clone(), namespace)
    }

    pub fn secrets(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }

    pub fn namespaces(&self) -> Api<Namespace> {
        Api::all(self.client.clone())
    }

    pub async fn pod_names(&self, namespace: &str) -> Result<Vec<String>, K8sError> {
        list_names(&self.pods(namespace)).await
    }
}

macro_rules! impl_debug_for_client {
    ($($client:ident),*) => {
        $(
            impl Debug for $client {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_struct(stringify!($client))
                        .field("default_namespace", &self.client.default_namespace())
                        .finish()
                }
            }
        )*
    };
}

impl_debug_for_client!(AppsClient, BatchClient, CoreClient);

async fn list_names<K>(api: &Api<K>) -> Result<Vec<String>, K8sError>
where
    K: Resource + Clone + DeserializeOwned + Debug,
{
    let list = api.list(&ListParams::default()).await?;
    Ok(list
        .items
        .into_iter()
        .filter_map(|obj| obj.meta().name.clone())
        .collect())
}

/// An API client scoped to one Kubernetes API group.
#[derive(Clone, Debug)]
pub enum ResourceClient {
    Apps(AppsClient),
    Batch(BatchClient),
    Core(CoreClient),
}

impl ResourceClient {
    pub fn new(client_type: ClientType, client: Client) -> Self {
        match client_type {
            ClientType::Apps => ResourceClient::Apps(AppsClient::new(client)),
            ClientType::Batch => ResourceClient::Batch(BatchClient::new(client)),
            ClientType::Core => ResourceClient::Core(CoreClient::new(client)),
        }
    }

    pub fn client_type(&self) -> ClientType {
        match self {
            ResourceClient::Apps(_) => ClientType::Apps,
            ResourceClient::Batch(_) => ClientType::Batch,
            ResourceClient::Core(_) => ClientType::Core,
        }
    }

    pub fn inner(&self) -> &Client {
        match self {
            ResourceClient::Apps(apps) => &apps.client,
            ResourceClient::Batch(batch) => &batch.client,
            ResourceClient::Core(core) => &core.client,
        }
    }

    pub fn as_apps(&self) -> Option<&AppsClient> {
        match self {
            ResourceClient::Apps(apps) => Some(apps),
            _ => None,
        }
    }

    pub fn as_batch(&self) -> Option<&BatchClient> {
        match self {
            ResourceClient::Batch(batch) => Some(batch),
            _ => None,
        }
    }

    pub fn as_core(&self) -> Option<&CoreClient> {
        match self {
            ResourceClient::Core(core) => Some(core),
            _ => None,
        }
    }

    /// Lists the names of the main resource of the group: deployments, jobs or pods.
    pub async fn list_names(&self, namespace: &str) -> Result<Vec<String>, K8sError> {
        match self {
            ResourceClient::Apps(apps) => apps.deployment_names(namespace).await,
            ResourceClient::Batch(batch) => batch.job_names(namespace).await,
            ResourceClient::Core(core) => core.pod_names(namespace).await,
        }
    }
}

/// A [ResourceClient] holding the transport it was built from.
///
/// The transport is released when the guard is dropped, whichever way the scope is left.
pub struct ScopedClient {
    client: ResourceClient,
    transport: Option<Box<dyn Transport>>,
}

impl ScopedClient {
    pub(crate) fn new(client_type: ClientType, transport: Box<dyn Transport>) -> Self {
        Self {
            client: ResourceClient::new(client_type, transport.client()),
            transport: Some(transport),
        }
    }

    pub fn client(&self) -> &ResourceClient {
        &self.client
    }
}

impl Deref for ScopedClient {
    type Target = ResourceClient;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl Drop for ScopedClient {
    fn drop(&mut self) {
        if let Some(transport) = self.transport.take() {
            debug!("releasing transport of {} client", self.client.client_type());
            transport.release();
        }
    }
}

impl Debug for ScopedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedClient")
            .field("client", &self.client)
            .field("released", &self.transport.is_none())
            .finish()
    }
}
