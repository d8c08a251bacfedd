use crate::color::CorrosionClass;
use crate::error::{AnalysisError, Result};
use crate::mask::Mask;
use crate::models::AnalysisResult;

use super::classification::CorrosionMasks;

/// Round to two decimals, halves away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part` as a percentage of `total`, unrounded
pub fn percentage(part: u64, total: u64) -> f64 {
    part as f64 / total as f64 * 100.0
}

/// Turn mask counts into the reported percentages.
///
/// The total uses the union mask, so pixels matching several classes are
/// counted once there and once in each matching class.
pub fn calculate(object_mask: &Mask, masks: &CorrosionMasks) -> Result<AnalysisResult> {
    let total = object_mask.count();
    if total == 0 {
        return Err(AnalysisError::EmptyObject);
    }

    let share = |mask: &Mask| round2(percentage(mask.count(), total));

    Ok(AnalysisResult {
        total_affected: share(&masks.affected),
        red: share(masks.get(CorrosionClass::Red)),
        black: share(masks.get(CorrosionClass::Black)),
        white: share(masks.get(CorrosionClass::White)),
        object_pixels: total,
    })
}
