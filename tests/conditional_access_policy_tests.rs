//! Integration tests for the conditional access policy client.
//!
//! These tests run the client against a mock Graph server and verify URI
//! construction, expected status codes, consistency retries, paging and
//! error propagation.

use std::time::Duration;

use msgraph_api::odata::{ConsistencyLevel, Query};
use msgraph_api::resources::identity::{
    ConditionalAccessPolicy, ConditionalAccessPolicyClient, ConditionalAccessPolicyState,
};
use msgraph_api::{
    AccessToken, ApiVersion, EndpointUrl, GraphConfig, GraphError, HttpError, ResourceError,
    TenantId,
};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{
    body_partial_json, header, header_exists, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POLICIES_PATH: &str = "/beta/contoso/identity/conditionalAccess/policies";
const POLICY_ID: &str = "35e3e3bf-3c6f-4e5b-b4c4-5a5c6e3a8e2d";

fn config_for(server: &MockServer) -> GraphConfig {
    GraphConfig::builder()
        .tenant_id(TenantId::new("contoso").unwrap())
        .endpoint(EndpointUrl::new(server.uri()).unwrap())
        .consistency_retries(2)
        .consistency_retry_delay(Duration::from_millis(10))
        .build()
        .unwrap()
}

fn client_for(server: &MockServer) -> ConditionalAccessPolicyClient {
    ConditionalAccessPolicyClient::new(&AccessToken::new("test-token"), &config_for(server))
        .unwrap()
}

fn policy_path() -> String {
    format!("{POLICIES_PATH}/{POLICY_ID}")
}

fn policy_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "displayName": name,
        "state": "enabled",
        "createdDateTime": "2024-03-01T10:15:30Z",
        "conditions": {
            "clientAppTypes": ["all"],
            "applications": {"includeApplications": ["All"]},
            "users": {"includeUsers": ["All"]}
        },
        "grantControls": {"operator": "OR", "builtInControls": ["mfa"]}
    })
}

// ============================================================================
// List
// ============================================================================

#[tokio::test]
async fn test_list_sends_get_to_collection_uri() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POLICIES_PATH))
        .and(header("Authorization", "Bearer test-token"))
        .and(header_exists("client-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [policy_json(POLICY_ID, "Require MFA"), policy_json("p2", "Block legacy auth")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let policies = assert_ok!(client_for(&server).list(&Query::default()).await);

    assert_eq!(policies.status(), 200);
    assert_eq!(policies.len(), 2);
    assert_eq!(policies[0].id.as_deref(), Some(POLICY_ID));
    assert_eq!(policies[1].display_name.as_deref(), Some("Block legacy auth"));
}

#[tokio::test]
async fn test_list_follows_next_link() {
    let server = MockServer::start().await;
    let next_link = format!("{}{POLICIES_PATH}?$skiptoken=page2", server.uri());

    Mock::given(method("GET"))
        .and(path(POLICIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [policy_json("p1", "First")],
            "@odata.nextLink": next_link
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(POLICIES_PATH))
        .and(query_param("$skiptoken", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [policy_json("p2", "Second"), policy_json("p3", "Third")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let policies = assert_ok!(client_for(&server).list(&Query::default()).await);

    let ids: Vec<_> = policies.iter().filter_map(|p| p.id.as_deref()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);
}

#[tokio::test]
async fn test_list_with_top_returns_single_page() {
    let server = MockServer::start().await;
    let next_link = format!("{}{POLICIES_PATH}?$skiptoken=page2", server.uri());

    Mock::given(method("GET"))
        .and(path(POLICIES_PATH))
        .and(query_param("$top", "1"))
        .and(query_param("$filter", "state eq 'enabled'"))
        .and(query_param("$select", "id,displayName"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [policy_json("p1", "First")],
            "@odata.nextLink": next_link
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("$skiptoken", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .expect(0)
        .mount(&server)
        .await;

    let query = Query {
        filter: Some("state eq 'enabled'".to_string()),
        select: vec!["id".to_string(), "displayName".to_string()],
        top: Some(1),
        ..Query::default()
    };

    let policies = assert_ok!(client_for(&server).list(&query).await);
    assert_eq!(policies.len(), 1);
}

#[tokio::test]
async fn test_list_with_count_sends_consistency_level() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POLICIES_PATH))
        .and(query_param("$count", "true"))
        .and(header("ConsistencyLevel", "eventual"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@odata.count": 1,
            "value": [policy_json("p1", "Only")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = Query {
        count: true,
        consistency_level: Some(ConsistencyLevel::Eventual),
        ..Query::default()
    };

    let policies = assert_ok!(client_for(&server).list(&query).await);
    assert_eq!(policies.count(), Some(1));
}

#[tokio::test]
async fn test_list_does_not_retry_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POLICIES_PATH))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let error = assert_err!(client_for(&server).list(&Query::default()).await);
    assert!(error.is_not_found());
}

#[tokio::test]
async fn test_list_rejects_body_that_is_not_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(POLICIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("garbage"))
        .expect(1)
        .mount(&server)
        .await;

    let error = assert_err!(client_for(&server).list(&Query::default()).await);

    assert!(matches!(error, ResourceError::Deserialize { status: 200, .. }));
    assert_eq!(error.status(), Some(200));
}

#[tokio::test]
async fn test_list_rejects_follow_up_page_without_value() {
    let server = MockServer::start().await;
    let next_link = format!("{}{POLICIES_PATH}?$skiptoken=page2", server.uri());

    Mock::given(method("GET"))
        .and(path(POLICIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [policy_json("p1", "First")],
            "@odata.nextLink": next_link
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(POLICIES_PATH))
        .and(query_param("$skiptoken", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let error = assert_err!(client_for(&server).list(&Query::default()).await);

    assert!(matches!(
        error,
        ResourceError::Graph(GraphError::InvalidPage { status: 200, .. })
    ));
}

#[tokio::test]
async fn test_list_does_not_follow_next_link_to_another_host() {
    let server = MockServer::start().await;
    let elsewhere = MockServer::start().await;
    let next_link = format!("{}{POLICIES_PATH}?$skiptoken=page2", elsewhere.uri());

    Mock::given(method("GET"))
        .and(path(POLICIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [policy_json("p1", "First")],
            "@odata.nextLink": next_link
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .expect(0)
        .mount(&elsewhere)
        .await;

    let error = assert_err!(client_for(&server).list(&Query::default()).await);

    match error {
        ResourceError::Graph(GraphError::UntrustedNextLink { link }) => {
            assert_eq!(link, next_link);
        }
        other => panic!("Expected UntrustedNextLink, got {other:?}"),
    }
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_posts_policy_and_expects_created() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(POLICIES_PATH))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "displayName": "Require MFA",
            "state": "enabledForReportingButNotEnforced"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(policy_json(POLICY_ID, "Require MFA")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let policy = ConditionalAccessPolicy {
        display_name: Some("Require MFA".to_string()),
        state: Some(ConditionalAccessPolicyState::EnabledForReportingButNotEnforced),
        ..Default::default()
    };

    let created = assert_ok!(client_for(&server).create(&policy).await);

    assert_eq!(created.status(), 201);
    assert_eq!(created.id.as_deref(), Some(POLICY_ID));
    assert!(created.created_date_time.is_some());
}

#[tokio::test]
async fn test_create_rejects_unexpected_success_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(POLICIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(policy_json(POLICY_ID, "x")))
        .expect(1)
        .mount(&server)
        .await;

    let error = assert_err!(
        client_for(&server)
            .create(&ConditionalAccessPolicy::default())
            .await
    );
    assert_eq!(error.status(), Some(200));
}

#[tokio::test]
async fn test_create_does_not_retry_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(POLICIES_PATH))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let error = assert_err!(
        client_for(&server)
            .create(&ConditionalAccessPolicy::default())
            .await
    );
    assert!(error.is_not_found());
}

#[tokio::test]
async fn test_create_rejects_body_that_is_not_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(POLICIES_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&server)
        .await;

    let policy = ConditionalAccessPolicy {
        display_name: Some("Require MFA".to_string()),
        ..Default::default()
    };
    let error = assert_err!(client_for(&server).create(&policy).await);

    assert!(matches!(error, ResourceError::Deserialize { status: 201, .. }));
}

// ============================================================================
// Get
// ============================================================================

#[tokio::test]
async fn test_get_fetches_item_uri() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(policy_path()))
        .and(query_param("$select", "displayName"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("request-id", "req-get-1")
                .set_body_json(policy_json(POLICY_ID, "Require MFA")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let query = Query {
        select: vec!["displayName".to_string()],
        ..Query::default()
    };

    let policy = assert_ok!(client_for(&server).get(POLICY_ID, &query).await);

    assert_eq!(policy.status(), 200);
    assert_eq!(policy.request_id(), Some("req-get-1"));
    assert_eq!(policy.display_name.as_deref(), Some("Require MFA"));
    assert_eq!(
        policy.grant_controls.as_ref().and_then(|g| g.operator.as_deref()),
        Some("OR")
    );
}

#[tokio::test]
async fn test_get_retries_not_found_until_replicated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(policy_path()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "ResourceNotFound", "message": "Policy not found"}
        })))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(policy_path()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(policy_json(POLICY_ID, "Require MFA")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let policy = assert_ok!(client_for(&server).get(POLICY_ID, &Query::default()).await);
    assert_eq!(policy.id.as_deref(), Some(POLICY_ID));
}

#[tokio::test]
async fn test_get_surfaces_not_found_after_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(policy_path()))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("request-id", "req-404")
                .set_body_json(json!({
                    "error": {"code": "ResourceNotFound", "message": "Policy not found"}
                })),
        )
        // Initial attempt plus two consistency retries
        .expect(3)
        .mount(&server)
        .await;

    let error = assert_err!(client_for(&server).get(POLICY_ID, &Query::default()).await);

    assert!(error.is_not_found());
    assert_eq!(error.request_id(), Some("req-404"));
    assert!(error.to_string().contains("ResourceNotFound"));
}

#[tokio::test]
async fn test_get_rejects_body_that_is_not_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(policy_path()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let error = assert_err!(
        client_for(&server)
            .get(POLICY_ID, &Query::default())
            .await
    );

    assert!(matches!(error, ResourceError::Deserialize { status: 200, .. }));
}

#[tokio::test]
async fn test_get_decode_error_carries_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(policy_path()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": POLICY_ID, "displayName": 42})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let error = assert_err!(
        client_for(&server)
            .get(POLICY_ID, &Query::default())
            .await
    );

    assert_eq!(error.status(), Some(200));
    assert!(!error.is_not_found());
    assert!(error.to_string().contains("ConditionalAccessPolicy"));
}

#[tokio::test]
async fn test_get_accepts_unknown_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(policy_path()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": POLICY_ID, "state": "enabledForTesting"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let policy = assert_ok!(
        client_for(&server)
            .get(POLICY_ID, &Query::default())
            .await
    );

    assert_eq!(
        policy.state,
        Some(ConditionalAccessPolicyState::Other(
            "enabledForTesting".to_string()
        ))
    );
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_patches_item_uri() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(policy_path()))
        .and(body_partial_json(json!({"state": "disabled"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let policy = ConditionalAccessPolicy {
        id: Some(POLICY_ID.to_string()),
        state: Some(ConditionalAccessPolicyState::Disabled),
        ..Default::default()
    };

    let status = assert_ok!(client_for(&server).update(&policy).await);
    assert_eq!(status, 204);
}

#[tokio::test]
async fn test_update_without_id_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let policy = ConditionalAccessPolicy {
        display_name: Some("No ID".to_string()),
        ..Default::default()
    };

    let error = assert_err!(client_for(&server).update(&policy).await);

    assert!(matches!(error, ResourceError::MissingId { .. }));
    assert_eq!(
        error.to_string(),
        "cannot update ConditionalAccessPolicy with nil ID"
    );
    assert!(error.status().is_none());
}

#[tokio::test]
async fn test_update_retries_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(policy_path()))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(policy_path()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let policy = ConditionalAccessPolicy {
        id: Some(POLICY_ID.to_string()),
        display_name: Some("Renamed".to_string()),
        ..Default::default()
    };

    let status = assert_ok!(client_for(&server).update(&policy).await);
    assert_eq!(status, 204);
}

#[tokio::test]
async fn test_update_rejects_ok_instead_of_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(policy_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let policy = ConditionalAccessPolicy {
        id: Some(POLICY_ID.to_string()),
        ..Default::default()
    };

    let error = assert_err!(client_for(&server).update(&policy).await);
    assert_eq!(error.status(), Some(200));
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_sends_delete_to_item_uri() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(policy_path()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let status = assert_ok!(client_for(&server).delete(POLICY_ID).await);
    assert_eq!(status, 204);
}

#[tokio::test]
async fn test_delete_retries_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(policy_path()))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(policy_path()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let status = assert_ok!(client_for(&server).delete(POLICY_ID).await);
    assert_eq!(status, 204);
}

#[tokio::test]
async fn test_delete_forbidden_carries_odata_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(policy_path()))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": "AccessDenied",
                "message": "You cannot perform the requested operation, required scopes are missing in the token.",
                "innerError": {
                    "date": "2024-03-01T10:15:30",
                    "request-id": "req-403",
                    "client-request-id": "c-1"
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let error = assert_err!(client_for(&server).delete(POLICY_ID).await);

    assert_eq!(error.status(), Some(403));
    assert_eq!(error.request_id(), Some("req-403"));
    match error {
        ResourceError::Graph(GraphError::Http(HttpError::Response(e))) => {
            let odata = e.odata.unwrap();
            assert!(odata.has_code("AccessDenied"));
        }
        other => panic!("Expected HTTP response error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_with_empty_id_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let error = assert_err!(client_for(&server).delete("").await);

    assert!(matches!(error, ResourceError::MissingId { .. }));
    assert_eq!(
        error.to_string(),
        "cannot delete ConditionalAccessPolicy with nil ID"
    );
    assert!(error.status().is_none());
}

// ============================================================================
// Client binding
// ============================================================================

#[tokio::test]
async fn test_client_uses_beta_even_when_config_defaults_to_stable() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    assert_eq!(config.api_version(), ApiVersion::V1_0);

    let client = ConditionalAccessPolicyClient::new(&AccessToken::new("t"), &config).unwrap();
    assert_eq!(client.base_client().api_version(), ApiVersion::Beta);
}
