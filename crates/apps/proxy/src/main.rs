use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::NaiveDate;
use imagery::{valid_image_name, ImageryConfig, UpstreamEndpoints};
use reqwest::Url;
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
struct AppState {
    upstream_url: Arc<str>,
    default_api_key: Arc<str>,
    http: reqwest::Client,
}

impl AppState {
    fn endpoints(&self, api_key: Option<&str>) -> UpstreamEndpoints {
        let key = api_key
            .filter(|k| !k.is_empty())
            .unwrap_or(self.default_api_key.as_ref());
        UpstreamEndpoints::new(self.upstream_url.to_string(), key)
    }
}

#[derive(Debug, Deserialize)]
struct MetadataQuery {
    date: String,
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageQuery {
    year: String,
    month: String,
    day: String,
    #[serde(rename = "imageName")]
    image_name: String,
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ImageryConfig::from_env();
    let addr: SocketAddr = env::var("PROXY_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()
        .expect("invalid PROXY_ADDR");

    let state = AppState {
        upstream_url: Arc::from(config.upstream_url.as_str()),
        default_api_key: Arc::from(config.api_key.as_str()),
        http: reqwest::Client::new(),
    };

    let app = router(state);

    info!(
        "imagery proxy listening on http://{addr} (upstream {})",
        config.upstream_url
    );
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("bind {addr} failed: {err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = axum::serve(listener, app).await {
        error!("server exited: {err}");
        std::process::exit(1);
    }
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::OPTIONS]);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/epic-api", get(get_metadata))
        .route("/epic-image", get(get_image))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn get_metadata(State(state): State<AppState>, Query(q): Query<MetadataQuery>) -> Response {
    let Some(date) = parse_date(&q.date) else {
        return (StatusCode::BAD_REQUEST, "date must be YYYY-MM-DD").into_response();
    };
    match state.endpoints(q.api_key.as_deref()).metadata_url(date) {
        Ok(url) => proxy_get(&state, url, "application/json").await,
        Err(err) => {
            error!("metadata url: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "bad upstream url").into_response()
        }
    }
}

async fn get_image(State(state): State<AppState>, Query(q): Query<ImageQuery>) -> Response {
    let Some(day) = parse_image_day(&q.year, &q.month, &q.day) else {
        return (StatusCode::BAD_REQUEST, "invalid year/month/day").into_response();
    };
    if !valid_image_name(&q.image_name) {
        return (StatusCode::BAD_REQUEST, "invalid imageName").into_response();
    }
    match state
        .endpoints(q.api_key.as_deref())
        .image_url(day, &q.image_name)
    {
        Ok(url) => proxy_get(&state, url, "image/png").await,
        Err(err) => {
            error!("image url: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "bad upstream url").into_response()
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn parse_image_day(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

async fn proxy_get(state: &AppState, url: Url, fallback_type: &'static str) -> Response {
    let path = url.path().to_string();
    match state.http.get(url).send().await {
        Ok(resp) => map_proxy_response(resp, fallback_type).await,
        Err(err) => {
            error!("upstream GET {path} failed: {err}");
            (StatusCode::BAD_GATEWAY, "imagery upstream unavailable").into_response()
        }
    }
}

async fn map_proxy_response(resp: reqwest::Response, fallback_type: &'static str) -> Response {
    let status = StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = resp
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(fallback_type)
        .to_string();

    match resp.bytes().await {
        Ok(bytes) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_str(&content_type)
                    .unwrap_or_else(|_| HeaderValue::from_static(fallback_type)),
            );
            (status, headers, Body::from(bytes)).into_response()
        }
        Err(err) => {
            error!("upstream response read failed: {err}");
            (StatusCode::BAD_GATEWAY, "imagery upstream unavailable").into_response()
        }
    }
}
