//! awsJson 1.0 wire protocol: every operation is a `POST /` with the
//! operation named in `X-Amz-Target`.

use crate::core::signing::RequestSigner;
use crate::domain::model::{HttpRequest, HttpResponse, Outcome};
use crate::domain::ports::{HttpTransport, Operation};
use crate::utils::error::ClientError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const TARGET_PREFIX: &str = "Timestream_20181101";
pub const CONTENT_TYPE: &str = "application/x-amz-json-1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_backoff,
        }
    }

    /// Delay before retrying after the given (1-based) failed attempt.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100), Duration::from_secs(20))
    }
}

pub struct AwsJsonProtocol {
    transport: Arc<dyn HttpTransport>,
    signer: Option<RequestSigner>,
    retry: RetryPolicy,
    user_agent: String,
}

impl AwsJsonProtocol {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        signer: Option<RequestSigner>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            signer,
            retry,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }

    /// Serializes, sends (with retries) and decodes one operation against `endpoint`.
    pub async fn invoke<Op: Operation>(
        &self,
        endpoint: &str,
        operation: &Op,
        invocation_id: &str,
    ) -> Outcome<Op::Output> {
        let body = serde_json::to_vec(operation).map_err(ClientError::serialization)?;

        let mut attempt = 1;
        loop {
            let result = self
                .send_once(endpoint, Op::NAME, &body, invocation_id, attempt)
                .await;
            match result {
                Err(err) if err.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.backoff(attempt);
                    tracing::warn!(
                        "{} attempt {}/{} failed: {}; retrying in {:?}",
                        Op::NAME,
                        attempt,
                        self.retry.max_attempts,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
                Ok(response) => return decode_output(&response),
            }
        }
    }

    async fn send_once(
        &self,
        endpoint: &str,
        operation_name: &str,
        body: &[u8],
        invocation_id: &str,
        attempt: u32,
    ) -> Outcome<HttpResponse> {
        let mut request = HttpRequest::post(format!("{}/", endpoint.trim_end_matches('/')), body.to_vec());
        request.set_header("content-type", CONTENT_TYPE);
        request.set_header("x-amz-target", format!("{}.{}", TARGET_PREFIX, operation_name));
        request.set_header("user-agent", self.user_agent.as_str());
        request.set_header("amz-sdk-invocation-id", invocation_id);
        request.set_header(
            "amz-sdk-request",
            format!("attempt={}; max={}", attempt, self.retry.max_attempts),
        );

        if let Some(signer) = &self.signer {
            signer.sign(&mut request).await?;
        }

        tracing::debug!(attempt, "{} -> {}", operation_name, request.url);
        let response = self.transport.send(request).await?;

        if response.is_success() {
            Ok(response)
        } else {
            Err(parse_service_error(&response))
        }
    }
}

fn decode_output<T: DeserializeOwned>(response: &HttpResponse) -> Outcome<T> {
    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        &response.body
    };
    serde_json::from_slice(body).map_err(ClientError::serialization)
}

pub fn parse_service_error(response: &HttpResponse) -> ClientError {
    let body: Value = serde_json::from_slice(&response.body).unwrap_or(Value::Null);

    let code = response
        .header("x-amzn-errortype")
        .map(str::to_string)
        .or_else(|| body_str(&body, &["__type", "code"]))
        .map(|raw| sanitize_error_code(&raw))
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| format!("Http{}", response.status));

    let message = body_str(&body, &["message", "Message", "errorMessage"]).unwrap_or_default();

    ClientError::ServiceError {
        code,
        message,
        status: response.status,
        request_id: response.header("x-amzn-requestid").map(str::to_string),
    }
}

fn body_str(body: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// `aws.protocoltests#FooError:http://...` -> `FooError`
fn sanitize_error_code(raw: &str) -> String {
    let without_uri = raw.split(':').next().unwrap_or(raw);
    without_uri
        .rsplit('#')
        .next()
        .unwrap_or(without_uri)
        .trim()
        .to_string()
}
