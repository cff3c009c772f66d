use chrono::NaiveDate;
use foundation::geo::Centroid;
use reqwest::Url;
use tracing::warn;

use crate::error::ImageryResult;
use crate::protocol::{EpicRecord, ProxyEndpoints, iso_date};

/// One thumbnail in the image gallery overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryEntry {
    /// 1-based position, as shown to the user.
    pub index: usize,
    pub day: NaiveDate,
    pub image_name: String,
    pub centroid: Option<Centroid>,
}

impl GalleryEntry {
    pub fn image_url(&self, endpoints: &ProxyEndpoints) -> ImageryResult<Url> {
        endpoints.image_url(self.day, &self.image_name)
    }

    pub fn caption(&self) -> String {
        match self.centroid {
            Some(c) => format!("Image #{} (centroid {c})", self.index),
            None => format!("Image #{}", self.index),
        }
    }
}

/// Every image available for one date.
#[derive(Debug, Clone, PartialEq)]
pub struct Gallery {
    pub date: NaiveDate,
    pub entries: Vec<GalleryEntry>,
}

impl Gallery {
    /// Records with an unparseable date are skipped.
    pub fn from_records(date: NaiveDate, records: &[EpicRecord]) -> Self {
        let entries = records
            .iter()
            .filter_map(|rec| match rec.day() {
                Ok(day) => Some((day, rec)),
                Err(err) => {
                    warn!("skipping gallery record {}: {err}", rec.image);
                    None
                }
            })
            .enumerate()
            .map(|(i, (day, rec))| GalleryEntry {
                index: i + 1,
                day,
                image_name: rec.image.clone(),
                centroid: rec.centroid_coordinates,
            })
            .collect();
        Self { date, entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Header line for the overlay.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            "No images found for this date.".to_string()
        } else {
            format!("{} images available for {}", self.entries.len(), iso_date(self.date))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Gallery;
    use crate::protocol::{EpicRecord, ProxyEndpoints};
    use chrono::NaiveDate;
    use foundation::geo::Centroid;
    use pretty_assertions::assert_eq;

    fn rec(image: &str, date: &str, lat: f64) -> EpicRecord {
        EpicRecord {
            identifier: None,
            caption: None,
            image: image.into(),
            date: date.into(),
            centroid_coordinates: Some(Centroid::new(lat, 10.0)),
        }
    }

    #[test]
    fn numbers_entries_from_one_and_skips_bad_dates() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 7).unwrap();
        let records = vec![
            rec("a", "2021-03-07 00:01:00", 1.0),
            rec("broken", "yesterday", 2.0),
            rec("b", "2021-03-07 02:01:00", 3.0),
        ];
        let gallery = Gallery::from_records(date, &records);
        let names: Vec<(usize, &str)> = gallery
            .entries
            .iter()
            .map(|e| (e.index, e.image_name.as_str()))
            .collect();
        assert_eq!(names, vec![(1, "a"), (2, "b")]);
        assert_eq!(gallery.summary(), "2 images available for 2021-03-07");
        assert_eq!(gallery.entries[1].caption(), "Image #2 (centroid 3.00°, 10.00°)");
    }

    #[test]
    fn caption_omits_missing_centroid() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 7).unwrap();
        let mut bare = rec("a", "2021-03-07 00:01:00", 0.0);
        bare.centroid_coordinates = None;
        let gallery = Gallery::from_records(date, &[bare]);
        assert_eq!(gallery.entries[0].centroid, None);
        assert_eq!(gallery.entries[0].caption(), "Image #1");
    }

    #[test]
    fn entry_links_through_the_proxy() {
        let date = NaiveDate::from_ymd_opt(2020, 12, 1).unwrap();
        let gallery = Gallery::from_records(date, &[rec("epic_1b_x", "2020-12-01 10:00:00", 0.0)]);
        let ep = ProxyEndpoints::new("http://localhost:3000", "k");
        assert_eq!(
            gallery.entries[0].image_url(&ep).unwrap().as_str(),
            "http://localhost:3000/epic-image?year=2020&month=12&day=01&imageName=epic_1b_x"
        );
    }

    #[test]
    fn empty_gallery_says_so() {
        let date = NaiveDate::from_ymd_opt(2020, 12, 1).unwrap();
        let gallery = Gallery::from_records(date, &[]);
        assert!(gallery.is_empty());
        assert_eq!(gallery.summary(), "No images found for this date.");
    }
}
