pub mod segmentation;
pub mod contours;
pub mod classification;
pub mod percentages;
pub mod steps;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, RgbImage};

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::models::AnalysisResult;
use crate::pipeline::{Pipeline, PipelineData};
use steps::*;

/// Main corrosion analysis orchestrator
///
/// Holds only configuration, so one analyzer can serve any number of
/// images, including from several threads at once.
#[derive(Debug, Clone)]
pub struct CorrosionAnalyzer {
    config: AnalyzerConfig,
    debug_dir: Option<PathBuf>,
}

impl CorrosionAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            debug_dir: None,
        })
    }

    /// Write per-stage images into `dir`, which must be empty or absent
    pub fn with_debug(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dir = Some(dir.into());
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Decode `bytes` (any format the `image` crate knows) and analyze them
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<AnalysisResult> {
        if bytes.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        let img = image::load_from_memory(bytes)?;
        self.analyze_image(&img)
    }

    pub fn analyze_path<P: AsRef<Path>>(&self, path: P) -> Result<AnalysisResult> {
        let bytes = std::fs::read(path.as_ref())?;
        log::debug!("read {} bytes from {}", bytes.len(), path.as_ref().display());
        self.analyze_bytes(&bytes)
    }

    pub fn analyze_image(&self, img: &DynamicImage) -> Result<AnalysisResult> {
        self.analyze_rgb(img.to_rgb8())
    }

    pub fn analyze_rgb(&self, img: RgbImage) -> Result<AnalysisResult> {
        let data = self.run_stages(img)?;
        let result = percentages_of(&data)?;
        log::info!(
            "corrosion: total {:.2}% (red {:.2}%, black {:.2}%, white {:.2}%) over {} pixels",
            result.total_affected,
            result.red,
            result.black,
            result.white,
            result.object_pixels
        );
        Ok(result)
    }

    /// Run segmentation, isolation and classification, keeping every
    /// intermediate mask for inspection
    pub fn run_stages(&self, img: RgbImage) -> Result<PipelineData> {
        log::debug!("analyzing {}x{} image", img.width(), img.height());
        let mut pipeline = build_pipeline(&self.config);
        if let Some(dir) = &self.debug_dir {
            pipeline = pipeline.with_debug(dir.clone())?;
        }
        pipeline.run(img)
    }
}

impl Default for CorrosionAnalyzer {
    fn default() -> Self {
        Self {
            config: AnalyzerConfig::default(),
            debug_dir: None,
        }
    }
}

/// Build the standard three-stage pipeline for `config`
pub fn build_pipeline(config: &AnalyzerConfig) -> Pipeline {
    Pipeline::new()
        .add_step(Arc::new(BackgroundSegmentationStep {
            background: config.background,
            kernel_size: config.kernel_size,
        }))
        .add_step(Arc::new(ObjectIsolationStep))
        .add_step(Arc::new(CorrosionClassificationStep {
            thresholds: config.corrosion.clone(),
        }))
}
