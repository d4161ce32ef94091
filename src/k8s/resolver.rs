use super::cluster_config::ClusterConfig;
use super::error::K8sError;
use async_trait::async_trait;
use kube::config::{KubeConfigOptions, KubeconfigError};
use kube::Config;
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SERVICE_HOST_ENV: &str = "KUBERNETES_SERVICE_HOST";
pub const SERVICE_PORT_ENV: &str = "KUBERNETES_SERVICE_PORT";
pub const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";
const SERVICE_ACCOUNT_TOKEN: &str = "token";
const SERVICE_ACCOUNT_CA: &str = "ca.crt";

#[derive(thiserror::Error, Debug)]
pub enum InClusterError {
    #[error("not running inside a cluster: {0}")]
    NotInCluster(String),

    #[error("unable to read `{path}`: {source}")]
    ReadServiceAccount {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Load(#[from] kube::config::InClusterError),
}

/// Loads connection configurations from the environment the process runs in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// Loads the service account credentials mounted into the pod.
    fn in_cluster(&self) -> Result<Config, InClusterError>;

    /// Loads the current context of the local kubeconfig.
    async fn kubeconfig(&self) -> Result<Config, KubeconfigError>;
}

pub struct DefaultConfigLoader {
    service_account_dir: PathBuf,
}

impl Default for DefaultConfigLoader {
    fn default() -> Self {
        Self {
            service_account_dir: PathBuf::from(SERVICE_ACCOUNT_DIR),
        }
    }
}

#[async_trait]
impl ConfigLoader for DefaultConfigLoader {
    fn in_cluster(&self) -> Result<Config, InClusterError> {
        check_service_env(|name| std::env::var(name).ok())?;
        check_service_account_files(&self.service_account_dir)?;
        Ok(Config::incluster()?)
    }

    /// This will respect the `$KUBECONFIG` envvar, but otherwise default to `~/.kube/config`.
    async fn kubeconfig(&self) -> Result<Config, KubeconfigError> {
        Config::from_kubeconfig(&KubeConfigOptions::default()).await
    }
}

/// The service host and port are injected by the kubelet in every pod.
fn check_service_env<F>(lookup: F) -> Result<(), InClusterError>
where
    F: Fn(&str) -> Option<String>,
{
    for name in [SERVICE_HOST_ENV, SERVICE_PORT_ENV] {
        if lookup(name).map_or(true, |value| value.is_empty()) {
            return Err(InClusterError::NotInCluster(format!(
                "`{}` is not set",
                name
            )));
        }
    }
    Ok(())
}

/// A missing or empty service account file means no credentials were mounted.
/// Any other failure reading them is a real misconfiguration.
fn check_service_account_files(dir: &Path) -> Result<(), InClusterError> {
    for file in [SERVICE_ACCOUNT_TOKEN, SERVICE_ACCOUNT_CA] {
        let path = dir.join(file);
        match std::fs::metadata(&path) {
            Ok(metadata) if metadata.len() > 0 => {}
            Ok(_) => {
                return Err(InClusterError::NotInCluster(format!(
                    "`{}` is empty",
                    path.display()
                )))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(InClusterError::NotInCluster(format!(
                    "`{}` does not exist",
                    path.display()
                )))
            }
            Err(source) => return Err(InClusterError::ReadServiceAccount { path, source }),
        }
    }
    Ok(())
}

/// Which mechanism of the resolution chain produced a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit,
    InCluster,
    Kubeconfig,
}

impl Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit => f.write_str("explicit cluster config"),
            ConfigSource::InCluster => f.write_str("inClusterConfig"),
            ConfigSource::Kubeconfig => f.write_str("kubeconfig"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

/// Resolves the connection configuration trying, in order and stopping at the first success:
/// - the explicit cluster config, whose failure is final.
/// - the in-cluster service account, falling through only when not running in a cluster.
/// - the local kubeconfig.
pub struct ConfigResolver<L = DefaultConfigLoader> {
    loader: L,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new(DefaultConfigLoader::default())
    }
}

impl<L> ConfigResolver<L>
where
    L: ConfigLoader,
{
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    pub async fn resolve(
        &self,
        explicit: Option<&ClusterConfig>,
    ) -> Result<ResolvedConfig, K8sError> {
        if let Some(cluster_config) = explicit {
            debug!(
                "using explicit cluster config, context {}",
                cluster_config.context_name()
            );
            let config = cluster_config
                .configure_client()
                .await
                .map_err(|err| K8sError::ExplicitConfigInvalid(err.to_string()))?;
            return Ok(ResolvedConfig {
                config,
                source: ConfigSource::Explicit,
            });
        }

        debug!("trying inClusterConfig for k8s client");
        match self.loader.in_cluster() {
            Ok(config) => {
                return Ok(ResolvedConfig {
                    config,
                    source: ConfigSource::InCluster,
                })
            }
            Err(InClusterError::NotInCluster(reason)) => {
                debug!(
                    "inClusterConfig failed {}, trying kubeconfig for k8s client",
                    reason
                );
            }
            Err(err) => return Err(K8sError::InCluster(err.to_string())),
        }

        let config = self
            .loader
            .kubeconfig()
            .await
            .map_err(|err| K8sError::ConfigurationUnavailable(err.to_string()))?;
        Ok(ResolvedConfig {
            config,
            source: ConfigSource::Kubeconfig,
        })
    }
}
