use image::{DynamicImage, RgbImage};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::analysis::classification::CorrosionMasks;
use crate::error::{AnalysisError, Result};
use crate::mask::Mask;

/// Data that flows through the pipeline
/// Each step fills in the next stage's artifacts; nothing is shared across runs
#[derive(Clone)]
pub struct PipelineData {
    /// The working image: the decoded input, later the isolated object
    pub image: RgbImage,

    /// Reference to the decoded input (shared efficiently via Arc)
    pub original: Arc<RgbImage>,

    /// Cleaned foreground from background segmentation
    pub foreground: Option<Mask>,

    /// Filled mask of the single isolated object
    pub object_mask: Option<Mask>,

    /// Per-class corrosion masks restricted to the object
    pub corrosion: Option<CorrosionMasks>,

    /// Metadata for tracking properties (e.g., "object_pixels", "contour_area")
    pub metadata: HashMap<String, MetadataValue>,
}

/// Metadata value types
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Float(f64),
    Count(u64),
}

impl PipelineData {
    /// Create PipelineData for a freshly decoded image
    pub fn from_image(image: RgbImage) -> Self {
        let original = Arc::new(image.clone());
        Self {
            image,
            original,
            foreground: None,
            object_mask: None,
            corrosion: None,
            metadata: HashMap::new(),
        }
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get metadata as float
    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.metadata.get(key) {
            Some(MetadataValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    /// Get metadata as pixel count
    pub fn get_count(&self, key: &str) -> Option<u64> {
        match self.metadata.get(key) {
            Some(MetadataValue::Count(v)) => Some(*v),
            _ => None,
        }
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Consume the previous stage's output and add this stage's artifacts
    fn process(&self, data: PipelineData, context: &PipelineContext) -> Result<PipelineData>;

    /// Human-readable name for this step (used in logs and debug file names)
    fn name(&self) -> &str;

    /// Image written to the debug directory after this step
    fn debug_image(&self, data: &PipelineData) -> DynamicImage {
        DynamicImage::ImageRgb8(data.image.clone())
    }
}

fn debug_file_name(index: usize, step_name: &str) -> String {
    format!("{:02}_{}.png", index, step_name.to_lowercase().replace(' ', "_"))
}

fn save_debug_image(config: &DebugConfig, file_name: &str, image: &DynamicImage) -> Result<()> {
    let output_path = config.output_dir.join(file_name);
    image
        .save(&output_path)
        .map_err(|e| AnalysisError::DebugOutput(format!("{}: {}", output_path.display(), e)))?;
    log::debug!("saved debug image {}", output_path.display());
    Ok(())
}

/// Composable pipeline builder
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext::default(),
        }
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                log::warn!("refusing to write debug output into {}", output_dir.display());
                return Err(AnalysisError::DebugOutput(format!(
                    "debug directory is not empty: {}",
                    output_dir.display()
                )));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step in order on one decoded image
    pub fn run(&self, input: RgbImage) -> Result<PipelineData> {
        if let Some(debug_config) = &self.context.debug {
            save_debug_image(debug_config, "00_input.png", &DynamicImage::ImageRgb8(input.clone()))?;
        }

        let mut data = PipelineData::from_image(input);

        for (step_idx, step) in self.steps.iter().enumerate() {
            log::debug!("running step: {}", step.name());
            data = step.process(data, &self.context)?;

            if let Some(debug_config) = &self.context.debug {
                let file_name = debug_file_name(step_idx + 1, step.name());
                save_debug_image(debug_config, &file_name, &step.debug_image(&data))?;
            }
        }

        Ok(data)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
