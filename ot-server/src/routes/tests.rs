use std::time::Duration;

use httpmock::prelude::*;
use rocket::http::Status;
use rocket::local::asynchronous::Client;
use rstest::*;
use serde_json::Value;

use super::*;

async fn client_with_broker(broker_url: &str) -> Client {
    let broker = BrokerClient::new(broker_url, Duration::from_secs(2)).unwrap();
    Client::tracked(crate::build(broker, rocket::Config::debug_default()))
        .await
        .expect("valid rocket instance")
}

fn phase_of(entities: &Value, id: &str) -> Value {
    entities
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["id"] == id)
        .map(|e| e["lifeCyclePhase"]["value"].clone())
        .unwrap()
}

#[rocket::async_test]
async fn test_health() {
    let client = client_with_broker("http://127.0.0.1:1").await;
    let response = client.get("/health").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.into_string().await.as_deref(), Some("ok"));
}

#[rocket::async_test]
async fn test_get_trip_default_reference() {
    let client = client_with_broker("http://127.0.0.1:1").await;
    let response = client.get("/trip").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let entities: Value = response.into_json().await.unwrap();
    assert_eq!(entities.as_array().unwrap().len(), 11);
    assert_eq!(entities[0]["@context"], "https://fiware.github.io/data-models/context.jsonld");
    assert_eq!(phase_of(&entities, "urn:ngsi-ld:event:loading-event-id"), "ACTUAL");
    assert_eq!(phase_of(&entities, "urn:ngsi-ld:event:unloading-event-id"), "PLANNED");
}

#[rstest]
#[case::hour_offset("/trip?hourOffset=1", "REALIZED", "PLANNED")]
#[case::after_arrival("/trip?hourOffset=48", "REALIZED", "REALIZED")]
#[case::before_start("/trip?hourOffset=-1", "PLANNED", "PLANNED")]
#[case::epoch_seconds("/trip?time=1607860800", "REALIZED", "ACTUAL")]
#[case::time_wins("/trip?hourOffset=48&time=1607774400", "PLANNED", "PLANNED")]
#[tokio::test]
async fn test_get_trip_reference_time(#[case] uri: &str, #[case] start_driving: &str, #[case] stop_driving: &str) {
    let client = client_with_broker("http://127.0.0.1:1").await;
    let response = client.get(uri.to_owned()).dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let entities: Value = response.into_json().await.unwrap();
    assert_eq!(phase_of(&entities, "urn:ngsi-ld:event:start-driving-event"), start_driving);
    assert_eq!(phase_of(&entities, "urn:ngsi-ld:event:stop-driving-event"), stop_driving);
}

#[rocket::async_test]
async fn test_get_trip_out_of_range() {
    let client = client_with_broker("http://127.0.0.1:1").await;
    let response = client.get(format!("/trip?time={}", i64::MAX)).dispatch().await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn test_create_trip_publishes_every_entity() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/ngsi-ld/v1/entities");
            then.status(201);
        })
        .await;

    let client = client_with_broker(&server.base_url()).await;
    let response = client.post("/trip?hourOffset=1").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let summary: Value = response.into_json().await.unwrap();
    assert_eq!(summary, serde_json::json!({"created": 11, "recreated": 0, "failed": 0}));
    create.assert_hits_async(11).await;
}

#[rocket::async_test]
async fn test_delete_trip_unreachable_broker() {
    let client = client_with_broker("http://127.0.0.1:1").await;
    let response = client.delete("/trip").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let summary: Value = response.into_json().await.unwrap();
    assert_eq!(summary, serde_json::json!({"deleted": 0, "failed": 11}));
}

#[rocket::async_test]
async fn test_delete_trip_hits_every_id() {
    let server = MockServer::start_async().await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path_contains("/ngsi-ld/v1/entities/urn:ngsi-ld:");
            then.status(204);
        })
        .await;

    let client = client_with_broker(&server.base_url()).await;
    let response = client.delete("/trip").dispatch().await;

    let summary: Value = response.into_json().await.unwrap();
    assert_eq!(summary["deleted"], 11);
    delete.assert_hits_async(11).await;
}
