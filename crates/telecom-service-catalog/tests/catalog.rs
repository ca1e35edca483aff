use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{Value, json};

use telecom_service_catalog::app;
use telecom_service_shared::AppState;
use telecom_service_shared::test_utils::{FixtureDb, fixture_objects, test_state};

fn server() -> TestServer {
    TestServer::new(app(test_state())).unwrap()
}

fn object_ids(objects: &Value) -> Vec<&str> {
    objects
        .as_array()
        .unwrap()
        .iter()
        .map(|object| object["object_id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn map_data_serves_active_objects_and_routes() {
    let response = server().get("/api/map-data/").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["infrastructure_objects"].as_array().unwrap().len(), 4);
    assert_eq!(body["cable_routes"].as_array().unwrap().len(), 1);
    assert_eq!(body["cable_routes"][0]["from_object_name"], "Central OLT");
    assert_eq!(body["cable_routes"][0]["to_object_name"], "North switch");
}

#[tokio::test]
async fn map_data_filters_by_type_but_keeps_routes() {
    let response = server()
        .get("/api/map-data/")
        .add_query_param("object_type", "switch")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        object_ids(&body["infrastructure_objects"]),
        vec![fixture_objects::SWITCH]
    );
    assert_eq!(body["infrastructure_objects"][0]["parent_name"], "Central OLT");
    assert_eq!(body["cable_routes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn map_data_rejects_unknown_technology() {
    let response = server()
        .get("/api/map-data/")
        .add_query_param("technology", "wimax")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.header("content-type"),
        HeaderValue::from_static("application/problem+json")
    );
}

#[tokio::test]
async fn search_is_case_insensitive_across_objects_and_routes() {
    let response = server()
        .get("/api/search/")
        .add_query_param("q", "RUDAKI")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        object_ids(&body["infrastructure_objects"]),
        vec![fixture_objects::OLT, fixture_objects::SPLICE_BOX]
    );
    assert_eq!(body["cable_routes"][0]["name"], "Backbone OLT-SW");
    assert_eq!(body["total_results"], 3);
}

#[tokio::test]
async fn search_requires_two_characters() {
    let server = server();

    let response = server.get("/api/search/").add_query_param("q", "o").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("at least 2"));

    server
        .get("/api/search/")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_is_ordered_and_filterable() {
    let server = server();

    let response = server.get("/api/infrastructure/").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 4);
    assert_eq!(
        object_ids(&body["results"]),
        vec![
            fixture_objects::ATS,
            fixture_objects::OLT,
            fixture_objects::SPLICE_BOX,
            fixture_objects::SWITCH,
        ]
    );

    let response = server
        .get("/api/infrastructure/")
        .add_query_param("technology", "gpon")
        .await;
    let body: Value = response.json();
    assert_eq!(object_ids(&body["results"]), vec![fixture_objects::OLT]);
    assert_eq!(body["results"][0]["children_count"], 2);

    let response = server
        .get("/api/infrastructure/")
        .add_query_param("search", "exchange")
        .await;
    let body: Value = response.json();
    assert_eq!(object_ids(&body["results"]), vec![fixture_objects::ATS]);
}

#[tokio::test]
async fn stats_aggregate_every_object() {
    let response = server().get("/api/infrastructure/stats/").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_objects"], 4);
    assert_eq!(body["active_objects"], 4);
    assert_eq!(body["total_capacity"], 212);
    assert_eq!(body["total_free_ports"], 22);
    assert_eq!(body["utilization_rate"], 10.38);
    assert_eq!(
        body["objects_by_technology"],
        json!({"adsl": 1, "ethernet": 1, "gpon": 1, "none": 1})
    );
    assert_eq!(body["objects_by_type"]["splice_box"], 1);
}

#[tokio::test]
async fn connected_routes_for_known_and_unknown_objects() {
    let server = server();

    let response = server
        .get(&format!(
            "/api/infrastructure/{}/connected-routes/",
            fixture_objects::OLT_ID
        ))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["cable_routes"][0]["installation_notes"], "Crosses Rudaki avenue");

    let response = server.get("/api/infrastructure/2/connected-routes/").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["count"], 0);

    let response = server.get("/api/infrastructure/99/connected-routes/").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "object-not-found");

    server
        .get("/api/infrastructure/olt/connected-routes/")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sqlite_backed_catalog_serves_stats() {
    let fixture = FixtureDb::new();
    let server = TestServer::new(app(AppState::load(fixture.path()).unwrap())).unwrap();

    let response = server.get("/api/infrastructure/stats/").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_objects"], 4);
    assert_eq!(body["total_free_ports"], 22);
}

#[tokio::test]
async fn health_endpoints_name_the_catalog_service() {
    let server = server();

    let live = server.get("/health/live").await;
    live.assert_status_ok();
    let body: Value = live.json();
    assert_eq!(body["service"], "telecom-service-catalog");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    let ready = server.get("/health/ready").await;
    ready.assert_status_ok();
    let body: Value = ready.json();
    assert_eq!(body["service"], "telecom-service-catalog");
    assert_eq!(body["objects_loaded"], 4);
}

#[tokio::test]
async fn object_history_is_newest_first() {
    let server = server();

    let response = server
        .get(&format!(
            "/api/infrastructure/{}/history/",
            fixture_objects::OLT_ID
        ))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 2);
    assert_eq!(body["history"][0]["action"], "maintenance");
    assert_eq!(body["history"][0]["performed_date"], "2024-02-10T09:30:00");
    assert_eq!(body["history"][1]["action_display"], "Created");

    let response = server.get("/api/infrastructure/3/history/").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["count"], 0);

    for missing in ["99", "olt"] {
        let response = server
            .get(&format!("/api/infrastructure/{missing}/history/"))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "object-not-found");
    }
}

#[tokio::test]
async fn cable_route_listing_filters_and_keeps_inactive_routes() {
    let server = server();

    let response = server.get("/api/cable-routes/").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"][0]["name"], "Backbone OLT-SW");
    assert_eq!(body["results"][0]["tested_date"], "2024-04-02");
    assert_eq!(body["results"][0]["test_results"], "OTDR: 0.21 dB/km");
    assert_eq!(body["results"][1]["name"], "Old copper ATS-SB");
    assert_eq!(body["results"][1]["is_active"], false);

    let response = server
        .get("/api/cable-routes/")
        .add_query_param("cable_type", "copper")
        .add_query_param("route_type", "aerial")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["cable_type_display"], "Copper cable");

    let response = server
        .get("/api/cable-routes/")
        .add_query_param("is_active", "true")
        .await;
    assert_eq!(response.json::<Value>()["count"], 1);

    let response = server
        .get("/api/cable-routes/")
        .add_query_param("cable_type", "wireless")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "invalid-request");
}
