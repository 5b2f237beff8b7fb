use crate::utils::error::ClientError;
use serde::{Deserialize, Serialize};

/// Result of one API call: the operation output or a single error, never both.
pub type Outcome<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn post(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: "POST".to_string(),
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Replaces any existing header with the same (case-insensitive) name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// An endpoint returned by `DescribeEndpoints`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Endpoint {
    pub address: String,
    pub cache_period_in_minutes: i64,
}

impl Endpoint {
    /// Addresses come back as bare host names; anything carrying a scheme is used as-is.
    pub fn url(&self) -> String {
        if self.address.contains("://") {
            self.address.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", self.address.trim_end_matches('/'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut request = HttpRequest::post("https://example.com", Vec::new());
        request.set_header("X-Amz-Target", "Timestream_20181101.Query");
        request.set_header("x-amz-target", "Timestream_20181101.CancelQuery");

        assert_eq!(request.headers.len(), 1);
        assert_eq!(
            request.header("X-AMZ-TARGET"),
            Some("Timestream_20181101.CancelQuery")
        );
    }

    #[test]
    fn test_endpoint_url() {
        let bare = Endpoint {
            address: "query-cell1.timestream.us-east-1.amazonaws.com".to_string(),
            cache_period_in_minutes: 1440,
        };
        assert_eq!(
            bare.url(),
            "https://query-cell1.timestream.us-east-1.amazonaws.com"
        );

        let with_scheme = Endpoint {
            address: "http://127.0.0.1:8080/".to_string(),
            cache_period_in_minutes: 1,
        };
        assert_eq!(with_scheme.url(), "http://127.0.0.1:8080");
    }
}
