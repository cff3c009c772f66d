use std::sync::Arc;

use chrono::NaiveDate;
use foundation::time::{Clock, SystemClock};

use crate::protocol::iso_date;

/// First year selectable on the slider.
pub const BASE_YEAR: i32 = 2016;
/// Highest slider offset; positions span `0..=SLIDER_MAX`.
pub const SLIDER_MAX: u8 = 9;

/// Month/day used for every slider year.
const SAMPLE_MONTH: u32 = 3;
const SAMPLE_DAY: u32 = 7;

/// Substituted when the slider year's sample day has not happened yet.
pub const FALLBACK_YMD: (i32, u32, u32) = (2023, 1, 1);

/// Slider offset from the base year, always within `0..=SLIDER_MAX`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SliderPosition(u8);

impl SliderPosition {
    pub fn new(value: u8) -> Option<Self> {
        (value <= SLIDER_MAX).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = SliderPosition> {
        (0..=SLIDER_MAX).map(SliderPosition)
    }
}

impl Default for SliderPosition {
    /// The slider starts in the middle of its range.
    fn default() -> Self {
        Self(5)
    }
}

/// A slider position resolved to the calendar date that should be queried.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResolvedDate {
    pub target_year: i32,
    pub date: NaiveDate,
    /// True when the fallback date replaced a future candidate.
    pub clamped: bool,
}

impl ResolvedDate {
    pub fn iso(&self) -> String {
        iso_date(self.date)
    }
}

impl std::fmt::Display for ResolvedDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.iso())
    }
}

/// The sample day for `year`, or `None` for years chrono cannot represent.
pub fn sample_day(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, SAMPLE_MONTH, SAMPLE_DAY)
}

pub fn fallback_date() -> NaiveDate {
    let (y, m, d) = FALLBACK_YMD;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Maps slider positions to query dates, never past "today".
#[derive(Clone)]
pub struct DateResolver {
    base_year: i32,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for DateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DateResolver")
            .field("base_year", &self.base_year)
            .field("today", &self.clock.today())
            .finish()
    }
}

impl Default for DateResolver {
    fn default() -> Self {
        Self::new(BASE_YEAR, Arc::new(SystemClock))
    }
}

impl DateResolver {
    pub fn new(base_year: i32, clock: Arc<dyn Clock>) -> Self {
        Self { base_year, clock }
    }

    pub fn target_year(&self, slider: SliderPosition) -> i32 {
        self.base_year + slider.value() as i32
    }

    pub fn resolve(&self, slider: SliderPosition) -> ResolvedDate {
        let target_year = self.target_year(slider);
        let today = self.clock.today();
        match sample_day(target_year) {
            Some(candidate) if candidate <= today => ResolvedDate {
                target_year,
                date: candidate,
                clamped: false,
            },
            _ => ResolvedDate {
                target_year,
                date: fallback_date(),
                clamped: true,
            },
        }
    }
}
