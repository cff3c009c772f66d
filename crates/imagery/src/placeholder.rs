//! Procedurally drawn stand-in planets.
//!
//! Used whenever real imagery is unavailable. Each image is an ocean fill with
//! four flat continent silhouettes; vertices are fractions of the image size so
//! the shapes scale uniformly.

use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::date::SliderPosition;

pub const DEFAULT_PLACEHOLDER_SIZE: u32 = 540;
pub const PLACEHOLDER_COUNT: usize = 10;

/// Ocean and land colours for one placeholder variation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Palette {
    pub ocean: [u8; 3],
    pub land: [u8; 3],
}

impl Palette {
    const fn new(ocean: [u8; 3], land: [u8; 3]) -> Self {
        Self { ocean, land }
    }
}

/// The built-in variations, indexed by `slider mod PLACEHOLDER_COUNT`.
pub const PALETTES: [Palette; PLACEHOLDER_COUNT] = [
    Palette::new([0, 105, 148], [34, 139, 34]),    // blue / forest green
    Palette::new([0, 90, 130], [150, 113, 23]),    // deep blue / beige
    Palette::new([25, 25, 112], [46, 139, 87]),    // midnight / sea green
    Palette::new([70, 130, 180], [222, 184, 135]), // steel blue / tan
    Palette::new([0, 0, 128], [107, 142, 35]),     // navy / olive
    Palette::new([30, 144, 255], [85, 107, 47]),   // dodger blue / dark olive
    Palette::new([65, 105, 225], [143, 188, 143]), // royal blue / light green
    Palette::new([0, 119, 190], [160, 82, 45]),    // azure / sienna
    Palette::new([100, 149, 237], [189, 183, 107]), // cornflower / khaki
    Palette::new([0, 128, 128], [154, 205, 50]),   // teal / yellow green
];

type Outline = &'static [(f32, f32)];

const NORTH_AMERICA: Outline = &[(0.2, 0.2), (0.4, 0.2), (0.45, 0.4), (0.3, 0.5), (0.2, 0.4)];
const SOUTH_AMERICA: Outline = &[(0.35, 0.5), (0.4, 0.5), (0.38, 0.7), (0.3, 0.7)];
const EUROPE_AFRICA: Outline = &[
    (0.5, 0.25),
    (0.6, 0.2),
    (0.65, 0.4),
    (0.6, 0.6),
    (0.5, 0.55),
    (0.45, 0.4),
];
const ASIA: Outline = &[(0.6, 0.3), (0.8, 0.25), (0.85, 0.4), (0.75, 0.5), (0.65, 0.45)];

const LANDMASSES: [Outline; 4] = [NORTH_AMERICA, SOUTH_AMERICA, EUROPE_AFRICA, ASIA];

fn rgba([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

/// Draw one placeholder planet of `size × size` pixels.
pub fn render_planet(palette: &Palette, size: u32) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(size, size, rgba(palette.ocean));
    let land = rgba(palette.land);
    let scale = size as f32;
    for outline in LANDMASSES {
        let vertices: Vec<(f32, f32)> = outline
            .iter()
            .map(|&(x, y)| (x * scale, y * scale))
            .collect();
        fill_polygon(&mut img, &vertices, land);
    }
    img
}

/// Scanline fill, even-odd rule, sampled at pixel centres.
fn fill_polygon(img: &mut RgbaImage, vertices: &[(f32, f32)], color: Rgba<u8>) {
    if vertices.len() < 3 {
        return;
    }
    let (width, height) = img.dimensions();
    let mut crossings: Vec<f32> = Vec::with_capacity(vertices.len());

    for row in 0..height {
        let y = row as f32 + 0.5;
        crossings.clear();
        for (i, &(x0, y0)) in vertices.iter().enumerate() {
            let (x1, y1) = vertices[(i + 1) % vertices.len()];
            // Half-open in y so shared vertices are counted once.
            if (y0 <= y) != (y1 <= y) {
                crossings.push(x0 + (y - y0) / (y1 - y0) * (x1 - x0));
            }
        }
        crossings.sort_by(f32::total_cmp);

        for span in crossings.chunks_exact(2) {
            let start = (span[0] - 0.5).ceil().max(0.0) as u32;
            let end = (span[1] - 0.5).floor().min(width as f32 - 1.0);
            if end < 0.0 {
                continue;
            }
            for col in start..=end as u32 {
                img.put_pixel(col, row, color);
            }
        }
    }
}

/// The process-lifetime set of placeholder images.
#[derive(Debug, Clone)]
pub struct PlaceholderSet {
    size: u32,
    images: Vec<Arc<RgbaImage>>,
}

impl PlaceholderSet {
    pub fn generate(size: u32) -> Self {
        let images = PALETTES
            .iter()
            .map(|palette| Arc::new(render_planet(palette, size)))
            .collect();
        Self { size, images }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn index_for(slider: SliderPosition) -> usize {
        slider.value() as usize % PLACEHOLDER_COUNT
    }

    pub fn get(&self, slider: SliderPosition) -> Arc<RgbaImage> {
        Arc::clone(&self.images[Self::index_for(slider)])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<RgbaImage>> {
        self.images.iter()
    }
}

impl Default for PlaceholderSet {
    fn default() -> Self {
        Self::generate(DEFAULT_PLACEHOLDER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::{PALETTES, PLACEHOLDER_COUNT, PlaceholderSet, render_planet, rgba};
    use crate::date::SliderPosition;

    #[test]
    fn generates_ten_distinct_images_of_requested_size() {
        let set = PlaceholderSet::generate(64);
        assert_eq!(set.size(), 64);
        assert_eq!(set.iter().count(), PLACEHOLDER_COUNT);
        for img in set.iter() {
            assert_eq!(img.dimensions(), (64, 64));
        }
        for i in 0..PLACEHOLDER_COUNT {
            for j in (i + 1)..PLACEHOLDER_COUNT {
                assert_ne!(set.images[i].as_raw(), set.images[j].as_raw(), "{i} vs {j}");
            }
        }
    }

    #[test]
    fn corners_are_ocean_and_continents_are_land() {
        let palette = &PALETTES[0];
        let img = render_planet(palette, 100);
        assert_eq!(*img.get_pixel(0, 0), rgba(palette.ocean));
        assert_eq!(*img.get_pixel(99, 99), rgba(palette.ocean));
        // Interior of North America and of Europe/Africa.
        assert_eq!(*img.get_pixel(30, 35), rgba(palette.land));
        assert_eq!(*img.get_pixel(55, 40), rgba(palette.land));
        // Between the Americas' western edge and the frame.
        assert_eq!(*img.get_pixel(10, 60), rgba(palette.ocean));
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = render_planet(&PALETTES[3], 48);
        let b = render_planet(&PALETTES[3], 48);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn selection_wraps_by_slider() {
        let set = PlaceholderSet::generate(8);
        let s = SliderPosition::new(7).unwrap();
        assert_eq!(PlaceholderSet::index_for(s), 7);
        assert!(std::sync::Arc::ptr_eq(&set.get(s), &set.images[7]));
    }

    #[test]
    fn tiny_images_do_not_panic() {
        for size in [0, 1, 2, 3] {
            let img = render_planet(&PALETTES[9], size);
            assert_eq!(img.dimensions(), (size, size));
        }
    }
}
