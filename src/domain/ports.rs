use crate::domain::model::{Endpoint, HttpRequest, HttpResponse, Outcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// A service operation: the request value plus the type it decodes into.
///
/// One generic invocation path serves every implementor; there are no
/// per-operation client methods.
pub trait Operation: Serialize + Debug + Send + Sync + 'static {
    /// Wire name, used in the `X-Amz-Target` header.
    const NAME: &'static str;

    /// Whether the call goes to a discovered endpoint. `DescribeEndpoints` opts out.
    const USES_ENDPOINT_DISCOVERY: bool = true;

    type Output: DeserializeOwned + Debug + Send + 'static;

    /// Client-side checks run before anything is sent.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Transport failures come back as `Err`; any HTTP status is an `Ok` response.
    async fn send(&self, request: HttpRequest) -> Outcome<HttpResponse>;
}

#[async_trait]
pub trait EndpointDiscovery: Send + Sync {
    async fn discover(&self) -> Outcome<Vec<Endpoint>>;
}
