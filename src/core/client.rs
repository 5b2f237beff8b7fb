use crate::config::ClientConfig;
use crate::core::dispatcher::Dispatcher;
use crate::core::endpoint::{DescribeEndpointsDiscovery, EndpointResolver};
use crate::core::executor::{CallHandle, Executor};
use crate::core::protocol::{AwsJsonProtocol, RetryPolicy};
use crate::core::signing::RequestSigner;
use crate::core::transport::ReqwestTransport;
use crate::domain::model::Outcome;
use crate::domain::ports::{EndpointDiscovery, HttpTransport, Operation};
use crate::utils::error::Result;
use crate::utils::validation::{validate_url, Validate};
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use std::sync::Arc;
use std::time::Duration;

/// Timestream Query client.
///
/// Every operation can be invoked three ways, all backed by the same dispatch:
///
/// * [`Client::call`] blocks the calling thread until the outcome is ready.
/// * [`Client::call_async`] returns a [`CallHandle`] right away.
/// * [`Client::call_with_handler`] runs a handler with the outcome and a
///   caller-supplied context once the call completes.
///
/// Cloning is cheap; clones share the worker pool and the endpoint cache.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    dispatcher: Dispatcher,
    // Last field so it is dropped after the dispatcher.
    executor: Executor,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Unsigned client with the default transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    pub fn call<Op: Operation>(&self, operation: &Op) -> Outcome<Op::Output> {
        self.inner
            .executor
            .block_on(self.inner.dispatcher.dispatch(operation))?
    }

    pub fn call_async<Op: Operation>(&self, operation: Op) -> CallHandle<Op::Output> {
        let inner = Arc::clone(&self.inner);
        self.inner
            .executor
            .submit(async move { inner.dispatcher.dispatch(&operation).await })
    }

    pub fn call_with_handler<Op, C, H>(&self, operation: Op, context: C, handler: H)
    where
        Op: Operation,
        C: Send + 'static,
        H: FnOnce(&Op, Outcome<Op::Output>, C) + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        self.inner.executor.spawn(async move {
            let outcome = inner.dispatcher.dispatch(&operation).await;
            handler(&operation, outcome, context);
        });
    }

    /// Sends every subsequent call to `url`, bypassing discovery.
    pub fn set_endpoint_override(&self, url: impl Into<String>) -> Result<()> {
        let url = url.into();
        validate_url("endpoint_override", &url)?;
        tracing::info!("Endpoint override set to {}", url);
        self.inner
            .dispatcher
            .resolver()
            .set_override(Some(url.trim_end_matches('/').to_string()));
        Ok(())
    }

    pub fn clear_endpoint_override(&self) {
        self.inner.dispatcher.resolver().set_override(None);
    }

    /// Forgets the discovered endpoint; the next call discovers again.
    pub fn invalidate_endpoints(&self) {
        self.inner.dispatcher.resolver().invalidate();
    }

    pub fn endpoint_override(&self) -> Option<String> {
        self.inner.dispatcher.resolver().override_endpoint()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.inner.config)
            .field("endpoint_override", &self.endpoint_override())
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    credentials: Option<SharedCredentialsProvider>,
    transport: Option<Arc<dyn HttpTransport>>,
    discovery: Option<Arc<dyn EndpointDiscovery>>,
}

impl ClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.region = region.into();
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = Some(endpoint.into());
        self
    }

    pub fn endpoint_override(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint_override = Some(endpoint.into());
        self
    }

    pub fn endpoint_discovery(mut self, enabled: bool) -> Self {
        self.config.endpoint_discovery = enabled;
        self
    }

    pub fn worker_threads(mut self, worker_threads: usize) -> Self {
        self.config.worker_threads = worker_threads;
        self
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.config.max_attempts = max_attempts;
        self
    }

    /// Requests are SigV4-signed only when a provider is set.
    pub fn credentials_provider(mut self, provider: impl ProvideCredentials + 'static) -> Self {
        self.credentials = Some(SharedCredentialsProvider::new(provider));
        self
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replaces the default `DescribeEndpoints`-based discovery.
    pub fn discovery(mut self, discovery: Arc<dyn EndpointDiscovery>) -> Self {
        self.discovery = Some(discovery);
        self
    }

    /// Uses the credentials from the default AWS provider chain.
    #[cfg(feature = "aws-config")]
    pub async fn load_default_credentials(mut self) -> Self {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        if let Some(provider) = sdk_config.credentials_provider() {
            self.credentials = Some(provider);
        } else {
            tracing::warn!("No credentials found in the default provider chain");
        }
        self
    }

    pub fn build(self) -> Result<Client> {
        let config = self.config;
        config.validate()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(
                config.connect_timeout(),
                config.request_timeout(),
            )?),
        };
        let signer = self
            .credentials
            .map(|credentials| RequestSigner::new(credentials, config.region.clone()));
        let signed = signer.is_some();
        let retry = RetryPolicy::new(
            config.max_attempts,
            Duration::from_millis(config.retry_base_delay_ms),
            Duration::from_millis(config.max_backoff_ms),
        );
        let protocol = Arc::new(AwsJsonProtocol::new(transport, signer, retry));

        let static_endpoint = config.static_endpoint();
        let discovery = self.discovery.unwrap_or_else(|| {
            Arc::new(DescribeEndpointsDiscovery::new(
                Arc::clone(&protocol),
                static_endpoint.clone(),
            ))
        });
        let resolver = EndpointResolver::new(
            config.region.clone(),
            static_endpoint.clone(),
            config.endpoint_discovery,
            config
                .endpoint_override
                .as_deref()
                .map(|url| url.trim_end_matches('/').to_string()),
            discovery,
        );

        let executor = Executor::new(config.worker_threads)?;

        tracing::info!(
            "Timestream Query client ready: region={}, endpoint={}, discovery={}, workers={}, signed={}",
            config.region,
            static_endpoint,
            config.endpoint_discovery,
            config.worker_threads,
            signed
        );

        Ok(Client {
            inner: Arc::new(ClientInner {
                config,
                dispatcher: Dispatcher::new(protocol, resolver),
                executor,
            }),
        })
    }
}
