use super::client::{ClientType, ResourceClient, ScopedClient};
use super::config::ClientProviderConfig;
use super::credentials::KubernetesCredentials;
use super::error::K8sError;
use super::resolver::{ConfigLoader, ConfigResolver, DefaultConfigLoader};
use super::transport::{HttpTransportFactory, TransportFactory};
use kube::Config;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{debug, info};

/// Hands out resource-specific clients whose transport is released when their scope ends.
///
/// Nothing is cached: each acquisition resolves its configuration and opens its own transport.
pub struct ClientProvider<L = DefaultConfigLoader, T = HttpTransportFactory> {
    resolver: ConfigResolver<L>,
    transport_factory: T,
    config: ClientProviderConfig,
}

impl Default for ClientProvider {
    fn default() -> Self {
        Self::new(ClientProviderConfig::default())
    }
}

impl ClientProvider {
    pub fn new(config: ClientProviderConfig) -> Self {
        Self::with_parts(DefaultConfigLoader::default(), HttpTransportFactory, config)
    }
}

impl<L, T> ClientProvider<L, T>
where
    L: ConfigLoader,
    T: TransportFactory,
{
    pub fn with_parts(loader: L, transport_factory: T, config: ClientProviderConfig) -> Self {
        Self {
            resolver: ConfigResolver::new(loader),
            transport_factory,
            config,
        }
    }

    /// Acquires a client of `client_type` for the given credentials.
    ///
    /// When `configuration` is provided it is used as is, timeouts included. Otherwise it is
    /// resolved using the credentials cluster config as the explicit input of the resolution
    /// chain, and the provider timeouts are applied to the result.
    /// An invalid `client_type` fails before anything is resolved or opened.
    pub async fn acquire_client(
        &self,
        credentials: &KubernetesCredentials,
        client_type: &str,
        configuration: Option<Config>,
    ) -> Result<ScopedClient, K8sError> {
        let client_type = client_type.parse::<ClientType>()?;

        let config = match configuration {
            Some(config) => {
                debug!("using provided configuration for {} client", client_type);
                config
            }
            None => {
                let resolved = self.resolver.resolve(credentials.cluster_config()).await?;
                info!(
                    "k8s configuration for {} client loaded from {}",
                    client_type, resolved.source
                );
                let mut config = resolved.config;
                self.config.apply(&mut config);
                config
            }
        };

        let transport = self.transport_factory.open(config)?;
        debug!("{} client creation succeeded", client_type);
        Ok(ScopedClient::new(client_type, transport))
    }

    /// Runs `f` with a freshly acquired client and releases its transport once `f` completes.
    ///
    /// The result of `f` is returned untouched, errors included. `f` receives a handle sharing
    /// the transport's connection pool; returning that handle out of `f` keeps the pool alive
    /// past the release, so results should not carry the client itself.
    pub async fn with_client<F, Fut, R, E>(
        &self,
        credentials: &KubernetesCredentials,
        client_type: &str,
        configuration: Option<Config>,
        f: F,
    ) -> Result<R, E>
    where
        F: FnOnce(ResourceClient) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: From<K8sError>,
    {
        let scoped = self
            .acquire_client(credentials, client_type, configuration)
            .await?;
        let result = f(scoped.client().clone()).await;
        drop(scoped);
        result
    }
}

/// Provides a _sync_ implementation of [ClientProvider].
///
/// Each call is run through `runtime.block_on` on the held runtime, so it must not be used from
/// within an async context.
pub struct SyncClientProvider<L = DefaultConfigLoader, T = HttpTransportFactory> {
    provider: ClientProvider<L, T>,
    runtime: Arc<Runtime>,
}

impl SyncClientProvider {
    pub fn new(runtime: Arc<Runtime>, config: ClientProviderConfig) -> Self {
        Self {
            provider: ClientProvider::new(config),
            runtime,
        }
    }
}

impl<L, T> SyncClientProvider<L, T>
where
    L: ConfigLoader,
    T: TransportFactory,
{
    pub fn from_provider(runtime: Arc<Runtime>, provider: ClientProvider<L, T>) -> Self {
        Self { provider, runtime }
    }

    pub fn acquire_client(
        &self,
        credentials: &KubernetesCredentials,
        client_type: &str,
        configuration: Option<Config>,
    ) -> Result<ScopedClient, K8sError> {
        self.runtime.block_on(
            self.provider
                .acquire_client(credentials, client_type, configuration),
        )
    }

    pub fn with_client<F, R, E>(
        &self,
        credentials: &KubernetesCredentials,
        client_type: &str,
        configuration: Option<Config>,
        f: F,
    ) -> Result<R, E>
    where
        F: FnOnce(&ResourceClient) -> Result<R, E>,
        E: From<K8sError>,
    {
        let scoped = self.acquire_client(credentials, client_type, configuration)?;
        f(&scoped)
    }

    /// Blocks on a request made through a client of this provider.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}
