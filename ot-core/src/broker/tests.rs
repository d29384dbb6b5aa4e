use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};

use assertables::*;
use httpmock::prelude::*;
use rstest::*;
use tracing_test::traced_test;

use super::*;

const TRUCK_ID: &str = "urn:ngsi-ld:vehicle:banana-truck-id";
const TRIP_ID: &str = "urn:ngsi-ld:trip:transport-trip-id";

#[fixture]
fn entities() -> Vec<Entity> {
    let mut truck = Entity::new("vehicle", TRUCK_ID);
    truck.put_property("name", "Banana Truck");
    let mut trip = Entity::new("trip", TRIP_ID);
    trip.put_property("name", "Banana Company to Port Storage");
    vec![truck, trip]
}

fn client_for(server: &MockServer) -> BrokerClient {
    BrokerClient::new(&server.base_url(), Duration::from_secs(2)).unwrap()
}

#[rstest]
#[case::root("http://orion:1026", "http://orion:1026/ngsi-ld/v1/entities")]
#[case::trailing_slash("http://orion:1026/", "http://orion:1026/ngsi-ld/v1/entities")]
#[case::prefixed("http://gateway/orion", "http://gateway/orion/ngsi-ld/v1/entities")]
fn test_entities_url(#[case] base: &str, #[case] expected: &str) {
    let client = BrokerClient::new(base, DEFAULT_REQUEST_TIMEOUT).unwrap();
    assert_eq!(client.entities_url(None).as_str(), expected);
    assert_eq!(client.entities_url(Some(TRIP_ID)).as_str(), format!("{expected}/{TRIP_ID}"));
}

#[rstest]
#[case::garbage("not a url")]
#[case::no_base("mailto:orion@example.com")]
fn test_invalid_base_url(#[case] base: &str) {
    assert!(matches!(BrokerClient::new(base, DEFAULT_REQUEST_TIMEOUT), Err(BrokerError::InvalidUrl(_))));
}

#[rstest]
#[tokio::test]
async fn test_create_entity_posts_ld_json(entities: Vec<Entity>) {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/ngsi-ld/v1/entities")
                .header("content-type", "application/ld+json")
                .json_body_partial(format!(r#"{{"id": "{TRUCK_ID}", "type": "vehicle"}}"#));
            then.status(201);
        })
        .await;

    client_for(&server).create_entity(&entities[0]).await.unwrap();
    mock.assert_async().await;
}

#[rstest]
#[case::conflict(409)]
#[case::server_error(500)]
#[tokio::test]
async fn test_create_entity_error_status(entities: Vec<Entity>, #[case] status: u16) {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/ngsi-ld/v1/entities");
            then.status(status);
        })
        .await;

    let err = client_for(&server).create_entity(&entities[0]).await.unwrap_err();
    match (status, err) {
        (409, BrokerError::Conflict(id)) => assert_eq!(id, TRUCK_ID),
        (500, BrokerError::UnexpectedStatus { id, status }) => {
            assert_eq!(id, TRUCK_ID);
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        },
        (_, err) => panic!("unexpected error {err:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn test_publish_creates_everything(entities: Vec<Entity>) {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/ngsi-ld/v1/entities");
            then.status(201);
        })
        .await;

    let summary = client_for(&server).publish(&entities).await;

    assert_eq!(summary, PublishSummary { created: 2, recreated: 0, failed: 0 });
    create.assert_hits_async(2).await;
}

#[rstest]
#[tokio::test]
#[traced_test]
async fn test_publish_conflict_deletes_then_recreates(entities: Vec<Entity>) {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/ngsi-ld/v1/entities");
            then.status(409);
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path(format!("/ngsi-ld/v1/entities/{TRUCK_ID}"));
            then.status(204);
        })
        .await;

    let summary = client_for(&server).publish(&entities[..1]).await;

    // the mock keeps answering 409, so the rewrite fails too
    assert_eq!(summary, PublishSummary { created: 0, recreated: 0, failed: 1 });
    create.assert_hits_async(2).await;
    delete.assert_hits_async(1).await;
    assert!(logs_contain("already exists"));
}

#[rstest]
#[tokio::test]
async fn test_publish_conflict_recreate_succeeds(entities: Vec<Entity>) {
    static POSTS: AtomicUsize = AtomicUsize::new(0);

    let server = MockServer::start_async().await;
    // only the first POST conflicts
    let conflict = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/ngsi-ld/v1/entities")
                .matches(|req| req.method == "POST" && POSTS.fetch_add(1, Ordering::SeqCst) == 0);
            then.status(409);
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/ngsi-ld/v1/entities");
            then.status(201);
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path(format!("/ngsi-ld/v1/entities/{TRUCK_ID}"));
            then.status(204);
        })
        .await;

    let summary = client_for(&server).publish(&entities[..1]).await;

    assert_eq!(summary, PublishSummary { created: 0, recreated: 1, failed: 0 });
    conflict.assert_hits_async(1).await;
    delete.assert_hits_async(1).await;
    create.assert_hits_async(1).await;
}

#[rstest]
#[tokio::test]
async fn test_publish_continues_after_failure(entities: Vec<Entity>) {
    let server = MockServer::start_async().await;
    let failing = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/ngsi-ld/v1/entities")
                .json_body_partial(format!(r#"{{"id": "{TRUCK_ID}"}}"#));
            then.status(500);
        })
        .await;
    let ok = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/ngsi-ld/v1/entities")
                .json_body_partial(format!(r#"{{"id": "{TRIP_ID}"}}"#));
            then.status(201);
        })
        .await;

    let summary = client_for(&server).publish(&entities).await;

    assert_eq!(summary, PublishSummary { created: 1, recreated: 0, failed: 1 });
    failing.assert_hits_async(1).await;
    ok.assert_hits_async(1).await;
}

#[rstest]
#[tokio::test]
async fn test_publish_unreachable_broker(entities: Vec<Entity>) {
    // nothing listens on port 1
    let client = BrokerClient::new("http://127.0.0.1:1", Duration::from_millis(500)).unwrap();

    let summary = client.publish(&entities).await;
    assert_eq!(summary.failed, entities.len());
    assert_eq!(summary.created + summary.recreated, 0);
}

#[rstest]
#[tokio::test]
async fn test_delete_all_swallows_errors(entities: Vec<Entity>) {
    let server = MockServer::start_async().await;
    let gone = server
        .mock_async(|when, then| {
            when.method(DELETE).path(format!("/ngsi-ld/v1/entities/{TRUCK_ID}"));
            then.status(204);
        })
        .await;
    let missing = server
        .mock_async(|when, then| {
            when.method(DELETE).path(format!("/ngsi-ld/v1/entities/{TRIP_ID}"));
            then.status(404);
        })
        .await;

    let summary = client_for(&server).delete_all(&entities).await;

    assert_eq!(summary, DeleteSummary { deleted: 1, failed: 1 });
    gone.assert_hits_async(1).await;
    missing.assert_hits_async(1).await;
}

#[rstest]
#[tokio::test]
async fn test_delete_entity_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path_contains("/ngsi-ld/v1/entities/");
            then.status(404);
        })
        .await;

    let err = client_for(&server).delete_entity(TRIP_ID).await.unwrap_err();
    assert_contains!(err.to_string(), "404");
}
