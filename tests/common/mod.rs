#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from corroscan for tests
pub use corroscan::{
    AnalysisError, AnalysisResult, AnalyzerConfig, CorrosionAnalyzer, CorrosionClass, Mask,
};
