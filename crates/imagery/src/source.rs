//! Imagery source abstraction.
//!
//! The pipeline only needs two calls: list the records for a day, and fetch the
//! bytes of one image. `ProxyClient` talks to the local CORS proxy,
//! `UpstreamClient` talks to the EPIC API directly (diagnostics and the proxy
//! itself).

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use chrono::NaiveDate;
use reqwest::{Client, Url};
use tracing::debug;

use crate::config::ImageryConfig;
use crate::error::{ImageryError, ImageryResult};
use crate::protocol::{EpicRecord, ProxyEndpoints, UpstreamEndpoints};

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A provider of EPIC-style metadata and image bytes.
///
/// Implementations must be `Send + Sync` for use across async tasks.
/// Methods return boxed futures for dyn-compatibility.
pub trait ImagerySource: Send + Sync {
    /// All records for one calendar day. An empty list is not an error here.
    fn metadata<'a>(&'a self, date: NaiveDate) -> BoxFuture<'a, ImageryResult<Vec<EpicRecord>>>;

    /// Raw (still encoded) image bytes.
    fn image<'a>(
        &'a self,
        day: NaiveDate,
        image_name: &'a str,
    ) -> BoxFuture<'a, ImageryResult<Bytes>>;
}

async fn get_bytes(http: &Client, url: Url) -> ImageryResult<Bytes> {
    debug!("GET {}", redact(&url));
    let resp = http.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ImageryError::Status(status.as_u16()));
    }
    Ok(resp.bytes().await?)
}

async fn get_records(http: &Client, url: Url) -> ImageryResult<Vec<EpicRecord>> {
    let body = get_bytes(http, url).await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Strip credentials from a URL before it reaches the logs.
fn redact(url: &Url) -> String {
    let mut clean = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k.eq_ignore_ascii_case("api_key") || k.eq_ignore_ascii_case("apikey") {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        clean.set_query(None);
    } else {
        clean.query_pairs_mut().clear().extend_pairs(pairs);
    }
    clean.to_string()
}

/// Client for the local proxy (`/epic-api`, `/epic-image`).
#[derive(Clone, Debug)]
pub struct ProxyClient {
    http: Client,
    endpoints: ProxyEndpoints,
}

impl ProxyClient {
    pub fn new(http: Client, endpoints: ProxyEndpoints) -> Self {
        Self { http, endpoints }
    }

    pub fn from_config(http: Client, config: &ImageryConfig) -> Self {
        Self::new(
            http,
            ProxyEndpoints::new(config.proxy_url.clone(), config.api_key.clone()),
        )
    }

    pub fn endpoints(&self) -> &ProxyEndpoints {
        &self.endpoints
    }
}

impl ImagerySource for ProxyClient {
    fn metadata<'a>(&'a self, date: NaiveDate) -> BoxFuture<'a, ImageryResult<Vec<EpicRecord>>> {
        Box::pin(async move {
            let url = self.endpoints.metadata_url(date)?;
            get_records(&self.http, url).await
        })
    }

    fn image<'a>(
        &'a self,
        day: NaiveDate,
        image_name: &'a str,
    ) -> BoxFuture<'a, ImageryResult<Bytes>> {
        Box::pin(async move {
            let url = self.endpoints.image_url(day, image_name)?;
            get_bytes(&self.http, url).await
        })
    }
}

/// Client for the upstream EPIC API.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    http: Client,
    endpoints: UpstreamEndpoints,
}

impl UpstreamClient {
    pub fn new(http: Client, endpoints: UpstreamEndpoints) -> Self {
        Self { http, endpoints }
    }

    pub fn from_config(http: Client, config: &ImageryConfig) -> Self {
        Self::new(
            http,
            UpstreamEndpoints::new(config.upstream_url.clone(), config.api_key.clone()),
        )
    }

    pub fn endpoints(&self) -> &UpstreamEndpoints {
        &self.endpoints
    }
}

impl ImagerySource for UpstreamClient {
    fn metadata<'a>(&'a self, date: NaiveDate) -> BoxFuture<'a, ImageryResult<Vec<EpicRecord>>> {
        Box::pin(async move {
            let url = self.endpoints.metadata_url(date)?;
            get_records(&self.http, url).await
        })
    }

    fn image<'a>(
        &'a self,
        day: NaiveDate,
        image_name: &'a str,
    ) -> BoxFuture<'a, ImageryResult<Bytes>> {
        Box::pin(async move {
            let url = self.endpoints.image_url(day, image_name)?;
            get_bytes(&self.http, url).await
        })
    }
}
