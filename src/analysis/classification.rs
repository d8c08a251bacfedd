use image::RgbImage;

use crate::color::{CorrosionClass, HsvImage};
use crate::config::CorrosionThresholds;
use crate::mask::Mask;

use super::segmentation::in_range;

/// Corrosion masks for one object, all restricted to its footprint.
///
/// Classes may overlap; `affected` is their union.
#[derive(Debug, Clone)]
pub struct CorrosionMasks {
    pub red: Mask,
    pub black: Mask,
    pub white: Mask,
    pub affected: Mask,
}

impl CorrosionMasks {
    pub fn get(&self, class: CorrosionClass) -> &Mask {
        match class {
            CorrosionClass::Red => &self.red,
            CorrosionClass::Black => &self.black,
            CorrosionClass::White => &self.white,
        }
    }
}

/// Apply the three corrosion rules to an isolated object.
///
/// Pixels zeroed during isolation read as black, so every mask is
/// intersected with `object_mask` before it is returned.
pub fn classify(
    isolated: &RgbImage,
    object_mask: &Mask,
    thresholds: &CorrosionThresholds,
) -> CorrosionMasks {
    let hsv = HsvImage::from_rgb(isolated);

    let [red, black, white] =
        thresholds.ranges().map(|(_, range)| in_range(&hsv, range).intersect(object_mask));

    let affected = red.union(&black).union(&white).intersect(object_mask);

    CorrosionMasks {
        red,
        black,
        white,
        affected,
    }
}
