use crate::domain::model::{HttpRequest, HttpResponse, Outcome};
use crate::domain::ports::HttpTransport;
use crate::utils::error::{ClientError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Outcome<HttpResponse> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes()).map_err(|e| {
            ClientError::validation("method", format!("{}: {}", request.method, e))
        })?;

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        tracing::debug!("Sending {} {}", request.method, request.url);
        let response = builder.body(request.body).send().await?;

        let status = response.status().as_u16();
        tracing::debug!("Response status: {}", status);

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(Duration::from_secs(1), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_send_returns_non_success_status_as_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/").header("x-test", "1").body("{}");
            then.status(400)
                .header("x-amzn-RequestId", "req-1")
                .body(r#"{"__type":"ValidationException"}"#);
        });

        let mut request = HttpRequest::post(server.url("/"), b"{}".to_vec());
        request.set_header("x-test", "1");
        let response = transport().send(request).await.unwrap();

        mock.assert();
        assert_eq!(response.status, 400);
        assert_eq!(response.header("X-Amzn-RequestId"), Some("req-1"));
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_connection_failure_is_a_network_error() {
        // Nothing listens on port 1.
        let request = HttpRequest::post("http://127.0.0.1:1/", Vec::new());
        let err = transport().send(request).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::NetworkError { .. } | ClientError::TimeoutError { .. }
        ));
    }
}
