use std::sync::Arc;

use chrono::NaiveDate;
use foundation::geo::Centroid;
use image::RgbaImage;
use imagery::{EnvironmentalSample, FailureKind, Provenance, Resolution, SliderPosition};
use tracing::debug;

/// Identifies one user-initiated resolution.
///
/// Issued in increasing order by [`DisplayStore::begin`]; a result is only
/// applied if no later generation has already been applied.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

/// Metadata drawn next to the planet.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayMetadata {
    pub date: NaiveDate,
    pub centroid: Option<Centroid>,
    pub provenance: Provenance,
    pub degraded: Option<FailureKind>,
}

/// Everything the renderer reads on a frame. Immutable once built.
#[derive(Debug, Clone)]
pub struct DisplayState {
    pub slider: SliderPosition,
    pub target_year: i32,
    pub image: Arc<RgbaImage>,
    pub metadata: DisplayMetadata,
    pub metrics: EnvironmentalSample,
}

impl From<&Resolution> for DisplayState {
    fn from(res: &Resolution) -> Self {
        Self {
            slider: res.slider,
            target_year: res.date.target_year,
            image: Arc::clone(&res.record.pixels),
            metadata: DisplayMetadata {
                date: res.record.source_date,
                centroid: res.record.centroid,
                provenance: res.record.provenance,
                degraded: res.degraded,
            },
            metrics: res.metrics,
        }
    }
}

/// Holds the latest [`DisplayState`] for the render loop.
///
/// Once a state has been applied the store never goes back to empty.
#[derive(Debug, Default)]
pub struct DisplayStore {
    next_generation: u64,
    applied: Option<Generation>,
    current: Option<Arc<DisplayState>>,
}

impl DisplayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new resolution request.
    pub fn begin(&mut self) -> Generation {
        self.next_generation += 1;
        Generation(self.next_generation)
    }

    /// Apply a finished resolution. Returns `false` (and keeps the current
    /// state) when a newer generation has already been applied.
    pub fn commit(&mut self, generation: Generation, resolution: &Resolution) -> bool {
        if self.applied.is_some_and(|applied| generation <= applied) {
            debug!(
                "dropping stale resolution {:?} (applied {:?})",
                generation, self.applied
            );
            return false;
        }
        self.applied = Some(generation);
        self.current = Some(Arc::new(DisplayState::from(resolution)));
        true
    }

    /// The state to draw this frame, if any resolution has completed.
    pub fn current(&self) -> Option<Arc<DisplayState>> {
        self.current.clone()
    }

    pub fn applied(&self) -> Option<Generation> {
        self.applied
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use foundation::geo::Centroid;
    use image::RgbaImage;
    use imagery::{
        ImageRecord, Provenance, ResolvedDate, Resolution, SliderPosition, compute_metrics,
    };

    use super::{DisplayStore, Generation};

    fn resolution(slider: u8) -> Resolution {
        let year = 2016 + slider as i32;
        let date = NaiveDate::from_ymd_opt(year, 3, 7).unwrap();
        Resolution {
            slider: SliderPosition::new(slider).unwrap(),
            date: ResolvedDate {
                target_year: year,
                date,
                clamped: false,
            },
            record: ImageRecord {
                source_date: date,
                centroid: Some(Centroid::origin()),
                image_name: None,
                pixels: Arc::new(RgbaImage::new(2, 2)),
                provenance: Provenance::FullFallback,
            },
            metrics: compute_metrics(year),
            degraded: None,
        }
    }

    #[test]
    fn empty_until_first_commit() {
        let mut store = DisplayStore::new();
        assert!(store.current().is_none());
        let g = store.begin();
        assert!(store.commit(g, &resolution(5)));
        let state = store.current().unwrap();
        assert_eq!(state.target_year, 2021);
        assert_eq!(state.metrics.co2_ppm, 415.0);
    }

    #[test]
    fn stale_generation_cannot_overwrite_newer() {
        let mut store = DisplayStore::new();
        let older = store.begin();
        let newer = store.begin();
        assert!(older < newer);

        assert!(store.commit(newer, &resolution(7)));
        assert!(!store.commit(older, &resolution(2)));
        assert_eq!(store.current().unwrap().slider.value(), 7);
        assert_eq!(store.applied(), Some(newer));
    }

    #[test]
    fn in_order_completion_applies_both() {
        let mut store = DisplayStore::new();
        let a = store.begin();
        let b = store.begin();
        assert!(store.commit(a, &resolution(1)));
        assert!(store.commit(b, &resolution(3)));
        assert_eq!(store.current().unwrap().slider.value(), 3);
        assert_eq!(store.applied(), Some(Generation(2)));
    }
}
