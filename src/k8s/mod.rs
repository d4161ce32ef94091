pub use error::K8sError as Error;
pub mod client;
pub mod cluster_config;
pub mod config;
pub mod credentials;
pub mod error;
pub mod provider;
pub mod resolver;
pub mod store;
pub mod transport;
