use super::error::K8sError;
use kube::{Client, Config};
use tracing::debug;

/// A connection to the API server backed by a pooled HTTP client.
///
/// `release` consumes the transport, so a transport can be released at most once.
pub trait Transport: Send {
    /// Returns a handle to the underlying client, sharing its connection pool.
    fn client(&self) -> Client;

    /// Releases the pooled connections.
    fn release(self: Box<Self>);
}

/// Opens transports bound to a connection configuration.
#[cfg_attr(test, mockall::automock)]
pub trait TransportFactory: Send + Sync {
    fn open(&self, config: Config) -> Result<Box<dyn Transport>, K8sError>;
}

pub struct HttpTransport {
    client: Client,
}

impl Transport for HttpTransport {
    fn client(&self) -> Client {
        self.client.clone()
    }

    fn release(self: Box<Self>) {
        debug!(
            "releasing k8s client connections for namespace {}",
            self.client.default_namespace()
        );
    }
}

/// Builds the transport from the configuration through [Client::try_from].
///
/// It must be called from within a tokio runtime, since the client spawns its buffer worker.
#[derive(Clone, Default)]
pub struct HttpTransportFactory;

impl TransportFactory for HttpTransportFactory {
    fn open(&self, config: Config) -> Result<Box<dyn Transport>, K8sError> {
        debug!("opening k8s client for {}", config.cluster_url);
        let client = Client::try_from(config)
            .map_err(|err| K8sError::UnableToSetupClient(err.to_string()))?;
        Ok(Box::new(HttpTransport { client }))
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower_test::mock;

    /// Transport backed by a mocked service, counting its releases.
    pub(crate) struct FakeTransport {
        client: Client,
        releases: Arc<AtomicUsize>,
    }

    impl FakeTransport {
        pub(crate) fn new(config: &Config, releases: Arc<AtomicUsize>) -> Self {
            let (mock_service, _handle) = mock::pair::<
                http::Request<kube::client::Body>,
                http::Response<kube::client::Body>,
            >();
            Self {
                client: Client::new(mock_service, config.default_namespace.clone()),
                releases,
            }
        }
    }

    impl Transport for FakeTransport {
        fn client(&self) -> Client {
            self.client.clone()
        }

        fn release(self: Box<Self>) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Returns a factory expecting `times` opens and the counter of releases of its transports.
    pub(crate) fn counting_factory(times: usize) -> (MockTransportFactory, Arc<AtomicUsize>) {
        let releases = Arc::new(AtomicUsize::new(0));
        let mut factory = MockTransportFactory::new();
        let counter = releases.clone();
        factory.expect_open().times(times).returning(move |config| {
            Ok(Box::new(FakeTransport::new(&config, counter.clone())) as Box<dyn Transport>)
        });
        (factory, releases)
    }

    pub(crate) fn test_config(namespace: &str) -> Config {
        let mut config = Config::new("http://127.0.0.1:6443".parse().unwrap());
        config.default_namespace = namespace.to_string();
        config
    }

    #[tokio::test]
    async fn test_fake_transport_counts_releases() {
        let (factory, releases) = counting_factory(2);

        factory.open(test_config("a")).unwrap().release();
        factory.open(test_config("b")).unwrap().release();

        assert_eq!(releases.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_http_transport_factory_opens_client() {
        let transport = HttpTransportFactory.open(test_config("team-a")).unwrap();

        assert_eq!(transport.client().default_namespace(), "team-a");
        transport.release();
    }
}
