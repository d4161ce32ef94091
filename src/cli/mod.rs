use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
pub struct Cli {
    /// Directory holding the stored credentials, one `<name>.yaml` per record.
    #[arg(long, default_value_t = String::from("./credentials"))]
    store_dir: String,

    /// Name of the stored credentials to use. Without it the in-cluster service account or the
    /// local kubeconfig is used.
    #[arg(long)]
    credentials: Option<String>,

    /// Resource-specific client to acquire: `apps`, `batch` or `core`.
    #[arg(long, default_value_t = String::from("core"))]
    client_type: String,

    #[arg(short, long, default_value_t = String::from("default"))]
    namespace: String,

    /// Optional client settings file (timeouts).
    #[arg(short, long)]
    config: Option<String>,

    #[arg(long, default_value_t = String::from("info"))]
    log_level: String,
}

impl Cli {
    /// Parses command line arguments
    pub fn init_cli() -> Self {
        Self::parse()
    }

    pub fn store_dir(&self) -> PathBuf {
        PathBuf::from(&self.store_dir)
    }

    pub fn credentials(&self) -> Option<&str> {
        self.credentials.as_deref()
    }

    pub fn client_type(&self) -> &str {
        &self.client_type
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn config(&self) -> Option<PathBuf> {
        self.config.as_ref().map(PathBuf::from)
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}
