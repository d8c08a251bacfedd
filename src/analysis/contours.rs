use image::RgbImage;

use crate::error::{AnalysisError, Result};
use crate::mask::Mask;
use crate::models::Contour;

/// The one region kept from the foreground
#[derive(Debug, Clone)]
pub struct IsolatedObject {
    /// Filled interior of the largest region
    pub mask: Mask,
    /// Input image with every pixel outside `mask` zeroed
    pub image: RgbImage,
    pub contour: Contour,
    /// Top-level regions found before picking the largest
    pub contour_count: usize,
}

/// Keep only the region with the largest enclosed area.
///
/// Smaller disconnected regions are discarded, never merged.
pub fn isolate_object(foreground: &Mask, img: &RgbImage) -> Result<IsolatedObject> {
    let largest = foreground
        .largest_component()
        .ok_or(AnalysisError::NoObjectDetected)?;

    let image = largest.mask.apply_to(img);

    Ok(IsolatedObject {
        mask: largest.mask,
        image,
        contour: largest.contour,
        contour_count: largest.candidates,
    })
}
