use image::{GrayImage, Luma, RgbImage};
use imageproc::contrast::{ThresholdType, threshold as ip_threshold};

use crate::quantize::IndexImage;

const SET: u8 = 255;
const UNSET: u8 = 0;

/// Binary occupancy grid for one color class, stored as a 0/255 grayscale image.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    image: GrayImage,
}

impl Mask {
    /// Build a mask by evaluating `f` for every cell.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let image = GrayImage::from_fn(width, height, |x, y| {
            Luma([if f(x, y) { SET } else { UNSET }])
        });
        Self { image }
    }

    /// Mark every cell whose palette index equals `index`.
    pub fn for_index(indices: &IndexImage, index: u8) -> Self {
        Self::from_fn(indices.width(), indices.height(), |x, y| {
            indices.get(x, y) == index
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn is_set(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y)[0] == SET
    }

    /// Like [`Mask::is_set`] but treats everything outside the grid as unset.
    pub fn is_set_signed(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return false;
        }
        self.is_set(x as u32, y as u32)
    }

    /// Number of set cells.
    pub fn count(&self) -> usize {
        self.image.pixels().filter(|px| px[0] == SET).count()
    }

    pub fn is_empty(&self) -> bool {
        self.image.pixels().all(|px| px[0] == UNSET)
    }
}

/// The monochrome foreground: pixels whose luma is at or below `threshold`.
pub fn foreground_mask(rgb: &RgbImage, threshold: u8) -> Mask {
    let gray = image::imageops::grayscale(rgb);
    // Binary thresholding turns everything above `threshold` white.
    let binary = ip_threshold(&gray, threshold, ThresholdType::Binary);
    let (w, h) = binary.dimensions();
    Mask::from_fn(w, h, |x, y| binary.get_pixel(x, y)[0] == UNSET)
}
