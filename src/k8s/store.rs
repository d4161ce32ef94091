use super::credentials::KubernetesCredentials;
use std::path::{Path, PathBuf};
use tracing::debug;

const RECORD_EXTENSION: &str = "yaml";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("credentials `{0}` not found")]
    NotFound(String),

    #[error("invalid credentials name `{0}`, only alphanumerics, `-` and `_` are allowed")]
    InvalidName(String),

    #[error("error accessing credentials: `{0}`")]
    IOError(#[from] std::io::Error),

    #[error("error parsing credentials: `{0}`")]
    SerdeYamlError(#[from] serde_yaml::Error),
}

/// Loads and saves named credential records.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialsStore {
    fn load(&self, name: &str) -> Result<KubernetesCredentials, StoreError>;
    fn save(&self, name: &str, credentials: &KubernetesCredentials) -> Result<(), StoreError>;
}

/// Stores each record as `<dir>/<name>.yaml`.
pub struct CredentialsStoreFile {
    dir: PathBuf,
}

impl CredentialsStoreFile {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    fn record_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(name).with_extension(RECORD_EXTENSION))
    }
}

impl CredentialsStore for CredentialsStoreFile {
    fn load(&self, name: &str) -> Result<KubernetesCredentials, StoreError> {
        let path = self.record_path(name)?;
        debug!("loading credentials from {}", path.display());

        let file = match std::fs::File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name.to_string()))
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_yaml::from_reader(file)?)
    }

    fn save(&self, name: &str, credentials: &KubernetesCredentials) -> Result<(), StoreError> {
        let path = self.record_path(name)?;
        debug!("storing credentials into {}", path.display());

        std::fs::create_dir_all(&self.dir)?;
        Ok(serde_yaml::to_writer(
            std::fs::File::create(path)?,
            credentials,
        )?)
    }
}
