use crate::domain::model::HttpRequest;
use crate::utils::error::{ClientError, Result};
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use std::time::SystemTime;

pub const SIGNING_NAME: &str = "timestream";

/// SigV4 signer. Credentials are fetched per request so a refreshing
/// provider is honoured.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: SharedCredentialsProvider,
    region: String,
}

impl RequestSigner {
    pub fn new(credentials: SharedCredentialsProvider, region: impl Into<String>) -> Self {
        Self {
            credentials,
            region: region.into(),
        }
    }

    pub async fn sign(&self, request: &mut HttpRequest) -> Result<()> {
        let credentials = self
            .credentials
            .provide_credentials()
            .await
            .map_err(|e| ClientError::CredentialsError {
                message: e.to_string(),
            })?;
        self.sign_at(request, credentials.into(), SystemTime::now())
    }

    fn sign_at(&self, request: &mut HttpRequest, identity: Identity, time: SystemTime) -> Result<()> {
        let signing_error = |e: &dyn std::fmt::Display| ClientError::SigningError {
            message: e.to_string(),
        };

        let params: aws_sigv4::http_request::SigningParams<'_> = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(SIGNING_NAME)
            .time(time)
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| signing_error(&e))?
            .into();

        let signable = SignableRequest::new(
            &request.method,
            request.url.as_str(),
            request
                .headers
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
            SignableBody::Bytes(&request.body),
        )
        .map_err(|e| signing_error(&e))?;

        let (instructions, _signature) = sign(signable, &params)
            .map_err(|e| signing_error(&e))?
            .into_parts();

        let signed_headers: Vec<(String, String)> = instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        for (name, value) in signed_headers {
            request.set_header(name, value);
        }
        Ok(())
    }
}
