pub mod analysis;
pub mod color;
pub mod config;
pub mod error;
pub mod mask;
pub mod models;
pub mod pipeline;

pub use analysis::CorrosionAnalyzer;
pub use color::{CorrosionClass, Hsv, ThresholdRange};
pub use config::{AnalyzerConfig, CorrosionThresholds};
pub use error::{AnalysisError, Result};
pub use mask::Mask;
pub use models::{AnalysisResult, Contour};
pub use pipeline::{
    DebugConfig, MetadataValue, Pipeline, PipelineContext, PipelineData, PipelineStep,
};
