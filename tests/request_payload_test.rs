use aws_credential_types::Credentials;
use httpmock::prelude::*;
use serde_json::json;
use timestream_query::operations::{
    ListScheduledQueries, ListScheduledQueriesOutput, Tag, TagResource,
};
use timestream_query::Client;

fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .endpoint(server.base_url())
        .endpoint_discovery(false)
        .max_attempts(1)
        .build()
        .unwrap()
}

#[test]
fn test_unset_fields_are_omitted_and_empty_fields_are_sent() {
    let server = MockServer::start();
    let bare = server.mock(|when, then| {
        when.method(POST).path("/").json_body(json!({}));
        then.status(200).json_body(json!({"ScheduledQueries": []}));
    });
    let empty_token = server.mock(|when, then| {
        when.method(POST).path("/").json_body(json!({"NextToken": ""}));
        then.status(200).json_body(json!({"ScheduledQueries": []}));
    });

    let client = client_for(&server);

    let output: ListScheduledQueriesOutput =
        client.call(&ListScheduledQueries::default()).unwrap();
    assert!(output.scheduled_queries.is_empty());

    client
        .call(&ListScheduledQueries {
            max_results: None,
            next_token: Some(String::new()),
        })
        .unwrap();

    bare.assert_hits(1);
    empty_token.assert_hits(1);
}

#[test]
fn test_required_collections_are_sent_even_when_empty() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/")
            .header("x-amz-target", "Timestream_20181101.TagResource")
            .json_body(json!({
                "ResourceARN": "arn:aws:timestream:us-east-1:123456789012:scheduled-query/sq-1",
                "Tags": []
            }));
        then.status(200).body("");
    });

    let client = client_for(&server);
    client
        .call(&TagResource {
            resource_arn: "arn:aws:timestream:us-east-1:123456789012:scheduled-query/sq-1"
                .to_string(),
            tags: Vec::new(),
        })
        .unwrap();

    mock.assert();
}

#[test]
fn test_requests_are_signed_when_credentials_are_configured() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/")
            .header_exists("authorization")
            .header_exists("x-amz-date")
            .header("x-amz-security-token", "session-token")
            .header_exists("amz-sdk-invocation-id");
        then.status(200).json_body(json!({}));
    });

    let client = Client::builder()
        .endpoint(server.base_url())
        .endpoint_discovery(false)
        .credentials_provider(Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            Some("session-token".to_string()),
            None,
            "test",
        ))
        .build()
        .unwrap();

    client
        .call(&TagResource {
            resource_arn: "arn:aws:timestream:us-east-1:123456789012:database/db".to_string(),
            tags: vec![Tag::new("team", "metrics")],
        })
        .unwrap();

    mock.assert();
}
