use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;
use timestream_query::operations::{CancelQuery, DescribeAccountSettings, DescribeEndpoints};
use timestream_query::{Client, ClientError};

const DESCRIBE_ENDPOINTS: &str = "Timestream_20181101.DescribeEndpoints";

fn discovery_body(address: String) -> serde_json::Value {
    json!({"Endpoints": [{"Address": address, "CachePeriodInMinutes": 1440}]})
}

fn discovering_client(discovery: &MockServer) -> Client {
    Client::builder()
        .endpoint(discovery.base_url())
        .worker_threads(4)
        .max_attempts(1)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_concurrent_calls_share_one_discovery() {
    let discovery = MockServer::start();
    let cell = MockServer::start();

    let describe_mock = discovery.mock(|when, then| {
        when.method(POST).path("/").header("x-amz-target", DESCRIBE_ENDPOINTS);
        then.status(200)
            .delay(Duration::from_millis(300))
            .json_body(discovery_body(cell.base_url()));
    });
    let cancel_mock = cell.mock(|when, then| {
        when.method(POST)
            .path("/")
            .header("x-amz-target", "Timestream_20181101.CancelQuery");
        then.status(200).json_body(json!({"CancellationMessage": "ok"}));
    });

    let client = discovering_client(&discovery);
    let handles: Vec<_> = (0..8)
        .map(|i| client.call_async(CancelQuery::new(format!("q-{}", i))))
        .collect();

    for handle in handles {
        let output = handle.await.unwrap();
        assert_eq!(output.cancellation_message.as_deref(), Some("ok"));
    }

    describe_mock.assert_hits(1);
    cancel_mock.assert_hits(8);
}

#[test]
fn test_describe_endpoints_goes_to_static_endpoint() {
    let discovery = MockServer::start();
    let describe_mock = discovery.mock(|when, then| {
        when.method(POST).path("/").header("x-amz-target", DESCRIBE_ENDPOINTS);
        then.status(200)
            .json_body(discovery_body("query-cell1.timestream.us-east-1.amazonaws.com".to_string()));
    });

    let client = discovering_client(&discovery);
    let output = client.call(&DescribeEndpoints::default()).unwrap();

    assert_eq!(output.endpoints.len(), 1);
    assert_eq!(output.endpoints[0].cache_period_in_minutes, 1440);
    describe_mock.assert_hits(1);
}

#[test]
fn test_discovery_disabled_uses_static_endpoint() {
    let server = MockServer::start();
    let describe_mock = server.mock(|when, then| {
        when.method(POST).path("/").header("x-amz-target", DESCRIBE_ENDPOINTS);
        then.status(200).json_body(discovery_body("unused.example.com".to_string()));
    });
    let settings_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/")
            .header("x-amz-target", "Timestream_20181101.DescribeAccountSettings");
        then.status(200).json_body(json!({"MaxQueryTCU": 4}));
    });

    let client = Client::builder()
        .endpoint(server.base_url())
        .endpoint_discovery(false)
        .build()
        .unwrap();

    let output = client.call(&DescribeAccountSettings::default()).unwrap();
    assert_eq!(output.max_query_tcu, Some(4));
    describe_mock.assert_hits(0);
    settings_mock.assert_hits(1);
}

#[test]
fn test_override_bypasses_discovery() {
    let discovery = MockServer::start();
    let local = MockServer::start();

    let describe_mock = discovery.mock(|when, then| {
        when.method(POST).path("/");
        then.status(200).json_body(discovery_body("unused.example.com".to_string()));
    });
    let local_mock = local.mock(|when, then| {
        when.method(POST).path("/");
        then.status(200).json_body(json!({"CancellationMessage": "local"}));
    });

    let client = discovering_client(&discovery);
    client.set_endpoint_override(local.base_url()).unwrap();

    client.call(&CancelQuery::new("q-1")).unwrap();
    client.call_async(CancelQuery::new("q-2")).wait().unwrap();

    describe_mock.assert_hits(0);
    local_mock.assert_hits(2);
}

#[test]
fn test_invalid_endpoint_evicts_and_rediscovers() {
    let discovery = MockServer::start();
    let old_cell = MockServer::start();
    let new_cell = MockServer::start();

    let mut first_describe = discovery.mock(|when, then| {
        when.method(POST).path("/").header("x-amz-target", DESCRIBE_ENDPOINTS);
        then.status(200).json_body(discovery_body(old_cell.base_url()));
    });
    old_cell.mock(|when, then| {
        when.method(POST)
            .path("/")
            .header("x-amz-target", "Timestream_20181101.DescribeAccountSettings");
        then.status(200).json_body(json!({}));
    });
    let rejected = old_cell.mock(|when, then| {
        when.method(POST)
            .path("/")
            .header("x-amz-target", "Timestream_20181101.CancelQuery");
        then.status(421).json_body(json!({
            "__type": "InvalidEndpointException",
            "message": "The requested endpoint was not valid"
        }));
    });
    let accepted = new_cell.mock(|when, then| {
        when.method(POST)
            .path("/")
            .header("x-amz-target", "Timestream_20181101.CancelQuery");
        then.status(200).json_body(json!({"CancellationMessage": "moved"}));
    });

    let client = discovering_client(&discovery);
    client.call(&DescribeAccountSettings::default()).unwrap();
    first_describe.assert_hits(1);

    // The service now hands out the new cell.
    first_describe.delete();
    let second_describe = discovery.mock(|when, then| {
        when.method(POST).path("/").header("x-amz-target", DESCRIBE_ENDPOINTS);
        then.status(200).json_body(discovery_body(new_cell.base_url()));
    });

    let output = client.call(&CancelQuery::new("q-1")).unwrap();
    assert_eq!(output.cancellation_message.as_deref(), Some("moved"));
    rejected.assert_hits(1);
    second_describe.assert_hits(1);
    accepted.assert_hits(1);
}

#[test]
fn test_failed_discovery_is_retried_on_next_call() {
    let discovery = MockServer::start();
    let cell = MockServer::start();

    let mut failing = discovery.mock(|when, then| {
        when.method(POST).path("/").header("x-amz-target", DESCRIBE_ENDPOINTS);
        then.status(400)
            .json_body(json!({"__type": "AccessDeniedException", "message": "denied"}));
    });

    let client = discovering_client(&discovery);
    let err = client.call(&CancelQuery::new("q-1")).unwrap_err();
    match &err {
        ClientError::EndpointDiscoveryError {
            source: Some(source),
            ..
        } => assert_eq!(source.code(), Some("AccessDeniedException")),
        other => panic!("unexpected error: {other:?}"),
    }
    failing.assert_hits(1);
    failing.delete();

    let working = discovery.mock(|when, then| {
        when.method(POST).path("/").header("x-amz-target", DESCRIBE_ENDPOINTS);
        then.status(200).json_body(discovery_body(cell.base_url()));
    });
    cell.mock(|when, then| {
        when.method(POST).path("/");
        then.status(200).json_body(json!({"CancellationMessage": "ok"}));
    });

    client.call(&CancelQuery::new("q-1")).unwrap();
    working.assert_hits(1);
}
