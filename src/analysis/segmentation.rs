use image::RgbImage;

use crate::color::{HsvImage, ThresholdRange};
use crate::mask::Mask;

/// Mark every pixel whose HSV triple lies inside `range`
pub fn in_range(hsv: &HsvImage, range: &ThresholdRange) -> Mask {
    let (width, height) = hsv.dimensions();
    Mask::from_fn(width, height, |x, y| range.contains(hsv.get(x, y)))
}

/// Raw foreground: everything that does not look like the backdrop
pub fn raw_foreground(img: &RgbImage, background: &ThresholdRange) -> Mask {
    let hsv = HsvImage::from_rgb(img);
    in_range(&hsv, background).complement()
}

/// Opening first drops backdrop specks read as foreground, closing then
/// fills small gaps inside the silhouette.
pub fn clean_mask(mask: &Mask, kernel_size: u32) -> Mask {
    mask.open(kernel_size).close(kernel_size)
}

/// Separate the object from a uniform backdrop.
///
/// An all-backdrop frame yields an empty mask and a frame with no backdrop
/// a full one; deciding whether that is usable is left to later stages.
pub fn segment_foreground(img: &RgbImage, background: &ThresholdRange, kernel_size: u32) -> Mask {
    clean_mask(&raw_foreground(img, background), kernel_size)
}
