use crate::analysis::{classification, contours, percentages, segmentation};
use crate::color::{CorrosionClass, ThresholdRange};
use crate::config::CorrosionThresholds;
use crate::error::Result;
use crate::models::AnalysisResult;
use crate::pipeline::{MetadataValue, PipelineContext, PipelineData, PipelineStep};
use image::DynamicImage;

/// Mask out the backdrop and clean the remaining foreground
pub struct BackgroundSegmentationStep {
    pub background: ThresholdRange,
    pub kernel_size: u32,
}

impl PipelineStep for BackgroundSegmentationStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let foreground =
            segmentation::segment_foreground(&data.image, &self.background, self.kernel_size);
        let count = foreground.count();
        log::debug!("foreground covers {} pixels", count);

        let mut new_data = data.with_metadata("foreground_pixels", MetadataValue::Count(count));
        new_data.foreground = Some(foreground);
        Ok(new_data)
    }

    fn name(&self) -> &str {
        "Background Segmentation"
    }

    fn debug_image(&self, data: &PipelineData) -> DynamicImage {
        match &data.foreground {
            Some(mask) => DynamicImage::ImageLuma8(mask.to_image()),
            None => DynamicImage::ImageRgb8(data.image.clone()),
        }
    }
}

/// Keep the largest foreground region and black out everything else
pub struct ObjectIsolationStep;

impl PipelineStep for ObjectIsolationStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let foreground = data
            .foreground
            .as_ref()
            .expect("object isolation runs after background segmentation");

        let isolated = contours::isolate_object(foreground, &data.original)?;
        let contour_count = isolated.contour_count as u64;
        let object_pixels = isolated.mask.count();
        let area = isolated.contour.area();
        if let Some((min_x, min_y, max_x, max_y)) = isolated.contour.bounding_box() {
            log::debug!(
                "kept 1 of {} regions at ({}, {})-({}, {}): contour area {:.1}, {} pixels",
                contour_count,
                min_x,
                min_y,
                max_x,
                max_y,
                area,
                object_pixels
            );
        }

        let mut new_data = data
            .with_metadata("contour_count", MetadataValue::Count(contour_count))
            .with_metadata("contour_area", MetadataValue::Float(area))
            .with_metadata("object_pixels", MetadataValue::Count(object_pixels));
        new_data.image = isolated.image;
        new_data.object_mask = Some(isolated.mask);
        Ok(new_data)
    }

    fn name(&self) -> &str {
        "Object Isolation"
    }
}

/// Sort object pixels into the corrosion classes
pub struct CorrosionClassificationStep {
    pub thresholds: CorrosionThresholds,
}

impl PipelineStep for CorrosionClassificationStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let object_mask = data
            .object_mask
            .as_ref()
            .expect("corrosion classification runs after object isolation");

        let masks = classification::classify(&data.image, object_mask, &self.thresholds);

        let mut new_data = data;
        for class in CorrosionClass::ALL {
            let count = masks.get(class).count();
            log::debug!("{} corrosion: {} pixels", class, count);
            new_data
                .metadata
                .insert(format!("{}_pixels", class), MetadataValue::Count(count));
        }
        new_data.metadata.insert(
            "affected_pixels".to_string(),
            MetadataValue::Count(masks.affected.count()),
        );
        new_data.corrosion = Some(masks);
        Ok(new_data)
    }

    fn name(&self) -> &str {
        "Corrosion Classification"
    }

    fn debug_image(&self, data: &PipelineData) -> DynamicImage {
        match &data.corrosion {
            Some(masks) => DynamicImage::ImageLuma8(masks.affected.to_image()),
            None => DynamicImage::ImageRgb8(data.image.clone()),
        }
    }
}

/// Compute the reported percentages from a fully classified run
pub fn percentages_of(data: &PipelineData) -> Result<AnalysisResult> {
    let object_mask = data
        .object_mask
        .as_ref()
        .expect("percentages are computed after object isolation");
    let masks = data
        .corrosion
        .as_ref()
        .expect("percentages are computed after corrosion classification");
    percentages::calculate(object_mask, masks)
}
