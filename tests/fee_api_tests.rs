//! Tests de la API de frete contra proveedores simulados con mockito

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

use delivery_fee::config::environment::EnvironmentConfig;
use delivery_fee::routes::create_app;
use delivery_fee::state::AppState;

const NOMINATIM_CANOAS: &str = r#"[{"lat":"-29.9177","lon":"-51.1839"}]"#;

fn config(server: &ServerGuard, ors_key: Option<&str>) -> EnvironmentConfig {
    EnvironmentConfig {
        ors_api_key: ors_key.map(str::to_string),
        ors_base_url: format!("{}/ors", server.url()),
        nominatim_base_url: format!("{}/nominatim", server.url()),
        osrm_base_url: format!("{}/osrm", server.url()),
        ..EnvironmentConfig::default()
    }
}

fn app(config: EnvironmentConfig) -> Router {
    create_app(AppState::new(config).unwrap())
}

async fn post_json(app: Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn nominatim_mock(server: &mut ServerGuard, status: usize, body: &str) -> Mock {
    server
        .mock("GET", "/nominatim/search")
        .match_query(Matcher::Any)
        .with_status(status)
        .with_body(body)
}

fn osrm_mock(server: &mut ServerGuard, status: usize, body: &str) -> Mock {
    server
        .mock("GET", Matcher::Regex(r"^/osrm/route/v1/driving/".to_string()))
        .match_query(Matcher::Any)
        .with_status(status)
        .with_body(body)
}

fn trace(body: &Value) -> Vec<String> {
    body["trace"]
        .as_array()
        .or_else(|| body["details"]["trace"].as_array())
        .map(|steps| {
            steps
                .iter()
                .filter_map(|s| s.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_primary_provider_resolves_and_prices() {
    let mut server = Server::new_async().await;
    let geocode = server
        .mock("GET", "/ors/geocode/search")
        .match_query(Matcher::Any)
        .match_header("authorization", "secret")
        .with_status(200)
        .with_body(r#"{"features":[{"geometry":{"coordinates":[-51.1839,-29.9177]}}]}"#)
        .create_async()
        .await;
    let route = server
        .mock("POST", "/ors/v2/directions/driving-car/geojson")
        .with_status(200)
        .with_body(r#"{"features":[{"properties":{"segments":[{"distance":2000.0,"duration":900.0}]}}]}"#)
        .create_async()
        .await;

    let (status, body) = post_json(
        app(config(&server, Some("secret"))),
        "/api/delivery-fee",
        json!({"destinationAddress": "Rua Tiradentes, 100, Canoas", "orderItemTotal": 80}),
    )
    .await;

    geocode.assert_async().await;
    route.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["resolvedBy"], "ors");
    assert_eq!(body["estimated"], false);
    assert_eq!(body["distanceKm"].as_f64(), Some(2.0));
    assert_eq!(body["durationMin"], 15);
    assert_eq!(body["baseFee"].as_f64(), Some(20.0));
    assert_eq!(body["payableFee"].as_f64(), Some(20.0));
    assert_eq!(body["waived"], false);
    assert_eq!(body["normalizedAddress"], "Rua Tiradentes, 100, Canoas");
    assert_eq!(trace(&body), vec!["try:ors", "ors_ok"]);
}

#[tokio::test]
async fn test_primary_outage_falls_back_to_free_providers() {
    let mut server = Server::new_async().await;
    let _ors = server
        .mock("GET", "/ors/geocode/search")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("service unavailable")
        .create_async()
        .await;
    let _nominatim = nominatim_mock(&mut server, 200, NOMINATIM_CANOAS).create_async().await;
    let _osrm = osrm_mock(
        &mut server,
        200,
        r#"{"code":"Ok","routes":[{"distance":4000.0,"duration":1500.0}]}"#,
    )
    .create_async()
    .await;

    let (status, body) = post_json(
        app(config(&server, Some("secret"))),
        "/api/delivery-fee",
        json!({"destinationAddress": "Rua A, 10, Canoas", "orderItemTotal": 0}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resolvedBy"], "osm");
    assert_eq!(body["durationMin"], 25);
    assert_eq!(body["baseFee"].as_f64(), Some(30.0));
    assert_eq!(
        trace(&body),
        vec!["try:ors", "ors_fail:transport_503", "fallback:osm", "try:osm", "osm_ok"]
    );
}

#[tokio::test]
async fn test_router_outage_uses_great_circle_estimate() {
    let mut server = Server::new_async().await;
    let _nominatim = nominatim_mock(&mut server, 200, NOMINATIM_CANOAS).create_async().await;
    let _osrm = osrm_mock(&mut server, 500, "boom").create_async().await;

    let (status, body) = post_json(
        app(config(&server, None)),
        "/api/delivery-fee",
        json!({"destinationAddress": "Rua A, 10, Canoas"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resolvedBy"], "estimate");
    assert_eq!(body["estimated"], true);
    let steps = trace(&body);
    assert_eq!(steps[0], "skip:ors(no_key)");
    assert!(steps.contains(&"osm_fail:transport_500".to_string()));
    assert!(steps.contains(&"estimate_reuse_destination".to_string()));
    assert_eq!(steps.last().map(String::as_str), Some("estimate_ok"));
}

#[tokio::test]
async fn test_legacy_path_and_field_names_apply_waiver() {
    let mut server = Server::new_async().await;
    let _nominatim = nominatim_mock(&mut server, 200, NOMINATIM_CANOAS).create_async().await;
    let _osrm = osrm_mock(
        &mut server,
        200,
        r#"{"code":"Ok","routes":[{"distance":2500.0,"duration":600.0}]}"#,
    )
    .create_async()
    .await;

    let (status, body) = post_json(
        app(config(&server, None)),
        "/api/calcular-entrega",
        json!({"enderecoTexto": "Rua A, 10, Canoas", "totalItens": 300}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["baseFee"].as_f64(), Some(20.0));
    assert_eq!(body["payableFee"].as_f64(), Some(0.0));
    assert_eq!(body["waived"], true);
    assert!(body["waiverLabel"].is_string());
}

#[tokio::test]
async fn test_far_destination_is_out_of_area() {
    let mut server = Server::new_async().await;
    let _nominatim = nominatim_mock(&mut server, 200, NOMINATIM_CANOAS).create_async().await;
    let _osrm = osrm_mock(
        &mut server,
        200,
        r#"{"code":"Ok","routes":[{"distance":32000.0,"duration":2700.0}]}"#,
    )
    .create_async()
    .await;

    let (status, body) = post_json(
        app(config(&server, None)),
        "/api/delivery-fee",
        json!({"destinationAddress": "Rua A, 10, Canoas", "orderItemTotal": 1000}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OUT_OF_AREA");
    assert!(body["baseFee"].is_null());
    assert!(body["payableFee"].is_null());
    assert_eq!(body["waived"], false);
}

#[tokio::test]
async fn test_total_outage_is_bad_gateway_with_trace() {
    let mut server = Server::new_async().await;
    let _nominatim = nominatim_mock(&mut server, 500, "down").create_async().await;

    let (status, body) = post_json(
        app(config(&server, None)),
        "/api/delivery-fee",
        json!({"destinationAddress": "Rua A, 10, Canoas"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "RESOLUTION_FAILED");
    let steps = trace(&body);
    assert!(steps.contains(&"osm_fail:transport_500".to_string()));
    assert!(steps.contains(&"estimate_fail:transport_500".to_string()));
}

#[tokio::test]
async fn test_blank_destination_is_rejected_before_any_provider_call() {
    let mut server = Server::new_async().await;
    let nominatim = nominatim_mock(&mut server, 200, NOMINATIM_CANOAS)
        .expect(0)
        .create_async()
        .await;

    let (status, body) = post_json(
        app(config(&server, None)),
        "/api/delivery-fee",
        json!({"destinationAddress": "   ", "orderItemTotal": 10}),
    )
    .await;

    nominatim.assert_async().await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let server = Server::new_async().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/delivery-fee")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app(config(&server, None)).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_repeated_request_is_served_from_cache() {
    let mut server = Server::new_async().await;
    let nominatim = nominatim_mock(&mut server, 200, NOMINATIM_CANOAS)
        .expect(1)
        .create_async()
        .await;
    let osrm = osrm_mock(
        &mut server,
        200,
        r#"{"code":"Ok","routes":[{"distance":2000.0,"duration":600.0}]}"#,
    )
    .expect(1)
    .create_async()
    .await;

    let app = app(config(&server, None));
    for _ in 0..2 {
        let (status, _) = post_json(
            app.clone(),
            "/api/delivery-fee",
            json!({"destinationAddress": "Rua A, 10, Canoas"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    nominatim.assert_async().await;
    osrm.assert_async().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["primaryEnabled"], false);
    assert_eq!(health["geocodeCache"]["hits"], 1);
    assert_eq!(health["routeCache"]["hits"], 1);
}

#[tokio::test]
async fn test_router_timeout_falls_back_to_estimate() {
    let mut server = Server::new_async().await;
    let _nominatim = nominatim_mock(&mut server, 200, NOMINATIM_CANOAS).create_async().await;

    // acepta conexiones y nunca responde
    let silent = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let silent_addr = silent.local_addr().unwrap();
    let _silent = tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = silent.accept().await {
            open.push(socket);
        }
    });

    let config = EnvironmentConfig {
        osrm_base_url: format!("http://{}", silent_addr),
        provider_timeout: Duration::from_secs(1),
        ..config(&server, None)
    };

    let (status, body) = post_json(
        app(config),
        "/api/delivery-fee",
        json!({"destinationAddress": "Rua A, 10, Canoas"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resolvedBy"], "estimate");
    assert_eq!(body["estimated"], true);
    assert_eq!(
        trace(&body),
        vec![
            "skip:ors(no_key)",
            "try:osm",
            "osm_fail:transport",
            "fallback:estimate",
            "try:estimate",
            "estimate_reuse_destination",
            "estimate_ok",
        ]
    );
}

#[tokio::test]
async fn test_null_item_total_is_priced_without_waiver() {
    let mut server = Server::new_async().await;
    let _nominatim = nominatim_mock(&mut server, 200, NOMINATIM_CANOAS).create_async().await;
    let _osrm = osrm_mock(
        &mut server,
        200,
        r#"{"code":"Ok","routes":[{"distance":2500.0,"duration":600.0}]}"#,
    )
    .create_async()
    .await;

    let (status, body) = post_json(
        app(config(&server, None)),
        "/api/calcular-entrega",
        json!({"enderecoTexto": "Rua A, 10, Canoas", "totalItens": null}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payableFee"].as_f64(), Some(20.0));
    assert_eq!(body["waived"], false);
}
