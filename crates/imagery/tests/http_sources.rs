use std::collections::HashMap;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::NaiveDate;
use foundation::time::FixedClock;
use image::{ImageFormat, Rgba, RgbaImage};
use imagery::{
    BASE_YEAR, DateResolver, FailureKind, ImageryError, ImagerySource, ImageryFetcher,
    PlaceholderSet, Provenance, ProxyClient, ProxyEndpoints, SliderPosition, UpstreamClient,
    UpstreamEndpoints,
};

const RECORDS: &str = r#"[{
    "identifier": "20210307003633",
    "image": "epic_1b_20210307003633",
    "date": "2021-03-07 00:31:45",
    "centroid_coordinates": {"lat": -5.29, "lon": 165.74}
}]"#;

fn png() -> Vec<u8> {
    let img = RgbaImage::from_pixel(6, 6, Rgba([10, 20, 30, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

async fn epic_api(Query(q): Query<HashMap<String, String>>) -> Response {
    if q.get("apiKey").map(String::as_str) != Some("TEST") {
        return (StatusCode::FORBIDDEN, "bad key").into_response();
    }
    match q.get("date").map(String::as_str) {
        Some("2021-03-07") => RECORDS.into_response(),
        Some("2023-01-01") => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => "[]".into_response(),
    }
}

async fn epic_image(Query(q): Query<HashMap<String, String>>) -> Response {
    let expected = [
        ("year", "2021"),
        ("month", "03"),
        ("day", "07"),
        ("imageName", "epic_1b_20210307003633"),
    ];
    if expected
        .iter()
        .all(|(k, v)| q.get(*k).map(String::as_str) == Some(*v))
    {
        png().into_response()
    } else {
        (StatusCode::NOT_FOUND, "no such image").into_response()
    }
}

async fn upstream_metadata() -> Response {
    RECORDS.into_response()
}

async fn spawn_stub() -> SocketAddr {
    let app = Router::new()
        .route("/epic-api", get(epic_api))
        .route("/epic-image", get(epic_image))
        .route("/EPIC/api/natural/date/:date", get(upstream_metadata));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn proxy_client(addr: SocketAddr, key: &str) -> ProxyClient {
    ProxyClient::new(
        reqwest::Client::new(),
        ProxyEndpoints::new(format!("http://{addr}"), key),
    )
}

fn fetcher(source: ProxyClient, today: NaiveDate) -> ImageryFetcher {
    ImageryFetcher::new(
        Arc::new(source),
        DateResolver::new(BASE_YEAR, Arc::new(FixedClock(today))),
        Arc::new(PlaceholderSet::generate(12)),
    )
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn proxy_client_round_trip() {
    let addr = spawn_stub().await;
    let client = proxy_client(addr, "TEST");

    let records = client.metadata(day(2021, 3, 7)).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].image, "epic_1b_20210307003633");

    let bytes = client
        .image(day(2021, 3, 7), "epic_1b_20210307003633")
        .await
        .unwrap();
    assert!(image::load_from_memory(&bytes).is_ok());

    let missing = client.image(day(2021, 3, 8), "nope").await;
    assert!(matches!(missing, Err(ImageryError::Status(404))));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let addr = spawn_stub().await;
    let err = proxy_client(addr, "WRONG")
        .metadata(day(2021, 3, 7))
        .await
        .unwrap_err();
    assert!(matches!(err, ImageryError::Status(403)));
}

#[tokio::test]
async fn fetcher_loads_real_image_through_proxy() {
    let addr = spawn_stub().await;
    let f = fetcher(proxy_client(addr, "TEST"), day(2030, 1, 1));
    let res = f.resolve(SliderPosition::new(5).unwrap()).await;
    assert_eq!(res.record.provenance, Provenance::Real);
    assert_eq!(res.record.pixels.dimensions(), (6, 6));
    assert_eq!(res.metrics.co2_ppm, 415.0);
}

#[tokio::test]
async fn fetcher_degrades_on_server_error_and_empty_day() {
    let addr = spawn_stub().await;

    // Slider 9 resolves to the fallback date, which the stub answers with a 500.
    let f = fetcher(proxy_client(addr, "TEST"), day(2022, 6, 15));
    let res = f.resolve(SliderPosition::new(9).unwrap()).await;
    assert_eq!(res.record.provenance, Provenance::FullFallback);
    assert_eq!(res.degraded, Some(FailureKind::Network));

    let res = f.resolve(SliderPosition::new(1).unwrap()).await;
    assert_eq!(res.record.provenance, Provenance::FullFallback);
    assert_eq!(res.degraded, Some(FailureKind::EmptyResult));
}

#[tokio::test]
async fn unreachable_proxy_still_yields_a_record() {
    // Bind then drop so nothing is listening on the port.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let f = fetcher(proxy_client(addr, "TEST"), day(2030, 1, 1));
    let res = f.resolve(SliderPosition::new(4).unwrap()).await;
    assert_eq!(res.record.provenance, Provenance::FullFallback);
    assert_eq!(res.record.pixels.dimensions(), (12, 12));
}

#[tokio::test]
async fn upstream_client_hits_direct_endpoint() {
    let addr = spawn_stub().await;
    let client = UpstreamClient::new(
        reqwest::Client::new(),
        UpstreamEndpoints::new(format!("http://{addr}"), "TEST"),
    );
    let outcome = imagery::probe(&client, day(2021, 3, 7)).await;
    assert!(outcome.is_success());
}
