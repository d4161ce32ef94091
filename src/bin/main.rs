use k8s_credentials::k8s::config::ClientProviderConfig;
use k8s_credentials::k8s::credentials::KubernetesCredentials;
use k8s_credentials::k8s::provider::ClientProvider;
use k8s_credentials::k8s::store::CredentialsStoreFile;
use k8s_credentials::{cli::Cli, logging::Logging};
use std::error::Error;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::init_cli();

    // init logging singleton
    Logging::try_init(cli.log_level())?;
    debug!("CLI: {:?}", cli);

    let provider_config = match cli.config() {
        Some(path) => ClientProviderConfig::load(&path)?,
        None => ClientProviderConfig::default(),
    };

    let credentials = match cli.credentials() {
        Some(name) => {
            info!("loading credentials {}", name);
            KubernetesCredentials::load(&CredentialsStoreFile::new(&cli.store_dir()), name)?
        }
        None => KubernetesCredentials::default(),
    };

    let namespace = cli.namespace().to_string();
    let names = ClientProvider::new(provider_config)
        .with_client(&credentials, cli.client_type(), None, |client| async move {
            client.list_names(&namespace).await
        })
        .await?;

    names.iter().for_each(|name| println!("{}", name));
    Ok(())
}
