//! Connectivity probe against the imagery service.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::protocol::iso_date;
use crate::source::ImagerySource;

/// Years the probe samples from; EPIC coverage is dense across them.
const PROBE_YEARS: std::ops::RangeInclusive<i32> = 2019..=2022;
/// Days are drawn from 1..=27 so every month is valid.
const PROBE_MAX_DAY: u32 = 27;

/// A pseudo-random day in 2019..=2022 derived from `seed`.
pub fn probe_date(seed: u64) -> NaiveDate {
    let mut rng = StdRng::seed_from_u64(seed);
    let year = rng.gen_range(PROBE_YEARS);
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=PROBE_MAX_DAY);
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Result of one connectivity probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success {
        date: NaiveDate,
        count: usize,
        first_image: String,
        /// Day of the first record, usable to open the gallery.
        response_date: Option<NaiveDate>,
    },
    NoImages {
        date: NaiveDate,
    },
    Failed {
        date: NaiveDate,
        message: String,
    },
}

impl ProbeOutcome {
    pub fn date(&self) -> NaiveDate {
        match self {
            ProbeOutcome::Success { date, .. }
            | ProbeOutcome::NoImages { date }
            | ProbeOutcome::Failed { date, .. } => *date,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }

    /// Human-readable report, one line per fact.
    pub fn report(&self) -> Vec<String> {
        match self {
            ProbeOutcome::Success {
                date,
                count,
                first_image,
                response_date,
            } => {
                let mut lines = vec![
                    "API test successful!".to_string(),
                    "Connected to NASA EPIC API".to_string(),
                    format!("Retrieved {count} images for {}", iso_date(*date)),
                    format!("First image: {first_image}"),
                ];
                if let Some(day) = response_date {
                    lines.push(format!("Image date: {}", iso_date(*day)));
                }
                lines
            }
            ProbeOutcome::NoImages { date } => vec![format!(
                "API connection successful, but no images found for {}",
                iso_date(*date)
            )],
            ProbeOutcome::Failed { message, .. } => vec![format!("API test failed: {message}")],
        }
    }
}

/// Query `source` for `date` once and classify the answer.
pub async fn probe(source: &dyn ImagerySource, date: NaiveDate) -> ProbeOutcome {
    match source.metadata(date).await {
        Ok(records) => match records.first() {
            Some(first) => {
                info!("probe {date}: {} records", records.len());
                ProbeOutcome::Success {
                    date,
                    count: records.len(),
                    first_image: first.label().to_string(),
                    response_date: first.day().ok(),
                }
            }
            None => ProbeOutcome::NoImages { date },
        },
        Err(err) => {
            warn!("probe {date} failed: {err}");
            ProbeOutcome::Failed {
                date,
                message: err.to_string(),
            }
        }
    }
}
