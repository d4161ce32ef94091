use duration_str::deserialize_duration;
use kube::Config;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default connection timeout for kube clients
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default read timeout for kube clients
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(thiserror::Error, Debug)]
pub enum ClientProviderConfigError {
    #[error("error loading config: `{0}`")]
    IOError(#[from] std::io::Error),

    #[error("error loading config: `{0}`")]
    SerdeYamlError(#[from] serde_yaml::Error),
}

/// Settings applied to every connection configuration before a transport is opened.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ClientProviderConfig {
    #[serde(default)]
    pub connect_timeout: ConnectTimeout,
    #[serde(default)]
    pub read_timeout: ReadTimeout,
}

impl ClientProviderConfig {
    pub fn load(path: &Path) -> Result<Self, ClientProviderConfigError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }

    pub(crate) fn apply(&self, config: &mut Config) {
        config.connect_timeout = Some(self.connect_timeout.into());
        config.read_timeout = Some(self.read_timeout.into());
    }
}

#[derive(Debug, Clone, Deserialize, Copy, PartialEq)]
pub struct ConnectTimeout(#[serde(deserialize_with = "deserialize_duration")] Duration);

impl From<ConnectTimeout> for Duration {
    fn from(value: ConnectTimeout) -> Self {
        value.0
    }
}
impl From<Duration> for ConnectTimeout {
    fn from(value: Duration) -> Self {
        Self(value)
    }
}

impl Default for ConnectTimeout {
    fn default() -> Self {
        Self(DEFAULT_CONNECT_TIMEOUT)
    }
}

#[derive(Debug, Clone, Deserialize, Copy, PartialEq)]
pub struct ReadTimeout(#[serde(deserialize_with = "deserialize_duration")] Duration);

impl From<ReadTimeout> for Duration {
    fn from(value: ReadTimeout) -> Self {
        value.0
    }
}
impl From<Duration> for ReadTimeout {
    fn from(value: Duration) -> Self {
        Self(value)
    }
}

impl Default for ReadTimeout {
    fn default() -> Self {
        Self(DEFAULT_READ_TIMEOUT)
    }
}
