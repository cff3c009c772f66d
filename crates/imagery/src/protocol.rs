//! Wire types and URL layout for EPIC-style imagery.
//!
//! Two HTTP surfaces share the same metadata shape:
//! - the upstream EPIC API (`/EPIC/api/natural/date/{date}`, `/EPIC/archive/...`)
//! - the local proxy (`/epic-api`, `/epic-image`) that forwards to it with CORS headers

use chrono::{Datelike, NaiveDate};
use foundation::geo::Centroid;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{ImageryError, ImageryResult};

/// One full-disk image as listed by the metadata endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpicRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Image name without extension, e.g. `epic_1b_20210307003633`.
    pub image: String,
    /// Acquisition timestamp, `YYYY-MM-DD hh:mm:ss`.
    pub date: String,
    /// Sub-satellite point; some archive records omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centroid_coordinates: Option<Centroid>,
}

impl EpicRecord {
    /// The acquisition day, taken from the first ten characters of `date`.
    pub fn day(&self) -> ImageryResult<NaiveDate> {
        let day = self
            .date
            .get(..10)
            .ok_or_else(|| ImageryError::MalformedRecord(format!("short date {:?}", self.date)))?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|err| ImageryError::MalformedRecord(format!("date {day:?}: {err}")))
    }

    /// Label used by diagnostics: the identifier when present, else the image name.
    pub fn label(&self) -> &str {
        self.identifier.as_deref().unwrap_or(&self.image)
    }
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Image names are opaque identifiers; anything outside `[A-Za-z0-9_-]` is
/// rejected before it reaches a URL path.
pub fn valid_image_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn parse_url(raw: &str, params: &[(&str, &str)]) -> ImageryResult<Url> {
    Url::parse_with_params(raw, params)
        .map_err(|err| ImageryError::InvalidUrl(format!("{raw}: {err}")))
}

/// URL layout of the local proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoints {
    pub base_url: String,
    pub api_key: String,
}

impl ProxyEndpoints {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// `GET /epic-api?date=YYYY-MM-DD&apiKey=...`
    pub fn metadata_url(&self, date: NaiveDate) -> ImageryResult<Url> {
        let date = iso_date(date);
        parse_url(
            &join(&self.base_url, "epic-api"),
            &[("date", date.as_str()), ("apiKey", self.api_key.as_str())],
        )
    }

    /// `GET /epic-image?year=&month=&day=&imageName=`
    pub fn image_url(&self, day: NaiveDate, image_name: &str) -> ImageryResult<Url> {
        let year = format!("{:04}", day.year());
        let month = format!("{:02}", day.month());
        let dom = format!("{:02}", day.day());
        parse_url(
            &join(&self.base_url, "epic-image"),
            &[
                ("year", year.as_str()),
                ("month", month.as_str()),
                ("day", dom.as_str()),
                ("imageName", image_name),
            ],
        )
    }
}

/// URL layout of the upstream EPIC API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamEndpoints {
    pub base_url: String,
    pub api_key: String,
}

impl UpstreamEndpoints {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// `GET /EPIC/api/natural/date/{date}?api_key=...`
    pub fn metadata_url(&self, date: NaiveDate) -> ImageryResult<Url> {
        let path = format!("EPIC/api/natural/date/{}", iso_date(date));
        parse_url(
            &join(&self.base_url, &path),
            &[("api_key", self.api_key.as_str())],
        )
    }

    /// `GET /EPIC/archive/natural/{yyyy}/{mm}/{dd}/png/{image}.png?api_key=...`
    pub fn image_url(&self, day: NaiveDate, image_name: &str) -> ImageryResult<Url> {
        if !valid_image_name(image_name) {
            return Err(ImageryError::MalformedRecord(format!(
                "image name {image_name:?}"
            )));
        }
        let path = format!(
            "EPIC/archive/natural/{:04}/{:02}/{:02}/png/{image_name}.png",
            day.year(),
            day.month(),
            day.day()
        );
        parse_url(
            &join(&self.base_url, &path),
            &[("api_key", self.api_key.as_str())],
        )
    }
}
