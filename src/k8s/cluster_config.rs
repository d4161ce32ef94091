use kube::config::{KubeConfigOptions, Kubeconfig, KubeconfigError};
use kube::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(thiserror::Error, Debug)]
pub enum ClusterConfigError {
    #[error("it is not possible to read kubeconfig: `{0}`")]
    Kubeconfig(#[from] KubeconfigError),

    #[error("no context name provided and the kubeconfig has no current-context")]
    MissingContext,

    #[error("context `{0}` not found in kubeconfig")]
    UnknownContext(String),
}

/// A parsed kubeconfig pinned to one of its contexts.
///
/// It is the explicit input of the resolution chain: when present it is authoritative and
/// no other source is tried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    config: Kubeconfig,
    context_name: String,
}

impl ClusterConfig {
    /// Binds `config` to `context_name`, or to its `current-context` when no name is given.
    pub fn new(config: Kubeconfig, context_name: Option<&str>) -> Result<Self, ClusterConfigError> {
        let context_name = context_name
            .map(str::to_string)
            .or_else(|| config.current_context.clone())
            .ok_or(ClusterConfigError::MissingContext)?;

        if !config.contexts.iter().any(|ctx| ctx.name == context_name) {
            return Err(ClusterConfigError::UnknownContext(context_name));
        }

        Ok(Self {
            config,
            context_name,
        })
    }

    /// Reads the kubeconfig at `path`.
    /// Without a path this will respect the `$KUBECONFIG` envvar, but otherwise default to `~/.kube/config`.
    pub fn from_file(
        path: Option<&Path>,
        context_name: Option<&str>,
    ) -> Result<Self, ClusterConfigError> {
        let config = match path {
            Some(path) => {
                debug!("reading kubeconfig from {}", path.display());
                Kubeconfig::read_from(path)?
            }
            None => Kubeconfig::read()?,
        };
        Self::new(config, context_name)
    }

    pub fn from_yaml(text: &str, context_name: Option<&str>) -> Result<Self, ClusterConfigError> {
        Self::new(Kubeconfig::from_yaml(text)?, context_name)
    }

    pub fn context_name(&self) -> &str {
        &self.context_name
    }

    pub fn kubeconfig(&self) -> &Kubeconfig {
        &self.config
    }

    /// Builds the connection configuration described by the pinned context.
    pub async fn configure_client(&self) -> Result<Config, KubeconfigError> {
        debug!("configuring k8s client from context {}", self.context_name);
        let options = KubeConfigOptions {
            context: Some(self.context_name.clone()),
            ..Default::default()
        };
        Config::from_custom_kubeconfig(self.config.clone(), &options).await
    }
}
