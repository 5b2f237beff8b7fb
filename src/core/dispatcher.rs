use crate::core::endpoint::EndpointResolver;
use crate::core::protocol::AwsJsonProtocol;
use crate::domain::model::Outcome;
use crate::domain::ports::Operation;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// The single async path behind every call mode.
pub struct Dispatcher {
    protocol: Arc<AwsJsonProtocol>,
    resolver: EndpointResolver,
}

impl Dispatcher {
    pub fn new(protocol: Arc<AwsJsonProtocol>, resolver: EndpointResolver) -> Self {
        Self { protocol, resolver }
    }

    pub fn resolver(&self) -> &EndpointResolver {
        &self.resolver
    }

    pub async fn dispatch<Op: Operation>(&self, operation: &Op) -> Outcome<Op::Output> {
        let invocation_id = Uuid::new_v4().to_string();
        let span = tracing::debug_span!(
            "dispatch",
            operation = Op::NAME,
            invocation_id = %invocation_id
        );
        self.dispatch_inner(operation, &invocation_id)
            .instrument(span)
            .await
    }

    async fn dispatch_inner<Op: Operation>(
        &self,
        operation: &Op,
        invocation_id: &str,
    ) -> Outcome<Op::Output> {
        operation.validate()?;

        let endpoint = self.resolver.resolve(Op::USES_ENDPOINT_DISCOVERY).await?;
        let result = self.protocol.invoke(&endpoint, operation, invocation_id).await;

        // A discovered endpoint that the service no longer accepts: drop it,
        // discover again and retry once.
        match result {
            Err(err)
                if err.is_invalid_endpoint()
                    && Op::USES_ENDPOINT_DISCOVERY
                    && self.resolver.discovery_active() =>
            {
                tracing::warn!("Endpoint {} rejected, rediscovering: {}", endpoint, err);
                self.resolver.invalidate_endpoint(&endpoint);
                let endpoint = self.resolver.resolve(true).await?;
                self.protocol.invoke(&endpoint, operation, invocation_id).await
            }
            other => {
                if let Err(err) = &other {
                    tracing::debug!("{} failed: {}", Op::NAME, err);
                }
                other
            }
        }
    }
}
