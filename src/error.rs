use thiserror::Error;

/// Everything that can stop an analysis before it produces percentages
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("input image data is empty")]
    EmptyInput,

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid analyzer configuration: {0}")]
    InvalidConfig(String),

    /// Background segmentation left no foreground region at all
    #[error("no object detected against the background")]
    NoObjectDetected,

    /// A region was found but its filled mask has no pixels
    #[error("detected object has no pixels")]
    EmptyObject,

    #[error("failed to write debug output: {0}")]
    DebugOutput(String),
}

impl AnalysisError {
    /// Errors caused by the submitted image rather than by the analyzer itself.
    ///
    /// A request layer should map these to a client error and not retry:
    /// the pipeline is deterministic, so the same input fails the same way.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::Decode(_) | Self::NoObjectDetected | Self::EmptyObject
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
