use std::sync::Arc;

use chrono::NaiveDate;
use foundation::geo::Centroid;
use image::RgbaImage;
use tracing::{info, warn};

use crate::date::{DateResolver, ResolvedDate, SliderPosition, fallback_date, sample_day};
use crate::error::{FailureKind, ImageryError, ImageryResult};
use crate::gallery::Gallery;
use crate::model::{EnvironmentalSample, compute_metrics};
use crate::placeholder::PlaceholderSet;
use crate::protocol::EpicRecord;
use crate::source::ImagerySource;

/// Where the pixels of an [`ImageRecord`] came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Metadata and pixels both from the imagery service.
    Real,
    /// Metadata from the service, pixels synthesized.
    Placeholder,
    /// Nothing usable from the service; everything synthesized.
    FullFallback,
}

/// A displayable image together with the metadata shown next to it.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub source_date: NaiveDate,
    pub centroid: Option<Centroid>,
    pub image_name: Option<String>,
    pub pixels: Arc<RgbaImage>,
    pub provenance: Provenance,
}

impl ImageRecord {
    pub fn is_real(&self) -> bool {
        self.provenance == Provenance::Real
    }
}

/// Output of one resolution cycle.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub slider: SliderPosition,
    pub date: ResolvedDate,
    pub record: ImageRecord,
    pub metrics: EnvironmentalSample,
    /// The failure that forced synthesized data, if any.
    pub degraded: Option<FailureKind>,
}

/// Turns slider positions into displayable imagery, degrading to placeholders
/// whenever the imagery source fails.
#[derive(Clone)]
pub struct ImageryFetcher {
    source: Arc<dyn ImagerySource>,
    resolver: DateResolver,
    placeholders: Arc<PlaceholderSet>,
}

impl std::fmt::Debug for ImageryFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageryFetcher")
            .field("resolver", &self.resolver)
            .field("placeholder_size", &self.placeholders.size())
            .finish()
    }
}

impl ImageryFetcher {
    pub fn new(
        source: Arc<dyn ImagerySource>,
        resolver: DateResolver,
        placeholders: Arc<PlaceholderSet>,
    ) -> Self {
        Self {
            source,
            resolver,
            placeholders,
        }
    }

    pub fn resolver(&self) -> &DateResolver {
        &self.resolver
    }

    pub fn placeholders(&self) -> &PlaceholderSet {
        &self.placeholders
    }

    /// Resolve a slider position to an image and metrics.
    ///
    /// Single attempt, no retry. Never fails: every error degrades to
    /// placeholder pixels and is logged.
    pub async fn resolve(&self, slider: SliderPosition) -> Resolution {
        let date = self.resolver.resolve(slider);
        let metrics = compute_metrics(date.target_year);

        let (record, degraded) = match self.first_record(date.date).await {
            Ok(first) => match self.load_real(&first).await {
                Ok(record) => (record, None),
                Err(err) => {
                    warn!("image load failed for {}: {err}", first.image);
                    (self.placeholder_record(slider, &first, date.date), Some(err.kind()))
                }
            },
            Err(err) => {
                warn!("imagery metadata unavailable for {date}: {err}");
                (self.full_fallback(slider, date.target_year), Some(err.kind()))
            }
        };

        info!(
            "resolved slider {} -> {} ({:?})",
            slider.value(),
            record.source_date,
            record.provenance
        );

        Resolution {
            slider,
            date,
            record,
            metrics,
            degraded,
        }
    }

    /// List every record for the slider's resolved date.
    ///
    /// Unlike [`resolve`](Self::resolve), errors are returned so the caller can
    /// show them.
    pub async fn gallery(&self, slider: SliderPosition) -> ImageryResult<Gallery> {
        let date = self.resolver.resolve(slider);
        self.gallery_for(date.date).await
    }

    pub async fn gallery_for(&self, date: NaiveDate) -> ImageryResult<Gallery> {
        let records = self.source.metadata(date).await?;
        Ok(Gallery::from_records(date, &records))
    }

    async fn first_record(&self, date: NaiveDate) -> ImageryResult<EpicRecord> {
        let records = self.source.metadata(date).await?;
        records
            .into_iter()
            .next()
            .ok_or_else(|| ImageryError::EmptyResult(date.to_string()))
    }

    async fn load_real(&self, record: &EpicRecord) -> ImageryResult<ImageRecord> {
        let day = record.day()?;
        let bytes = self.source.image(day, &record.image).await?;
        let pixels = image::load_from_memory(&bytes)?.to_rgba8();
        Ok(ImageRecord {
            source_date: day,
            centroid: record.centroid_coordinates,
            image_name: Some(record.image.clone()),
            pixels: Arc::new(pixels),
            provenance: Provenance::Real,
        })
    }

    fn placeholder_record(
        &self,
        slider: SliderPosition,
        record: &EpicRecord,
        queried: NaiveDate,
    ) -> ImageRecord {
        ImageRecord {
            source_date: record.day().unwrap_or(queried),
            centroid: record.centroid_coordinates,
            image_name: Some(record.image.clone()),
            pixels: self.placeholders.get(slider),
            provenance: Provenance::Placeholder,
        }
    }

    fn full_fallback(&self, slider: SliderPosition, target_year: i32) -> ImageRecord {
        ImageRecord {
            source_date: sample_day(target_year).unwrap_or_else(fallback_date),
            centroid: Some(Centroid::origin()),
            image_name: None,
            pixels: self.placeholders.get(slider),
            provenance: Provenance::FullFallback,
        }
    }
}
