use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::{CorrosionClass, ThresholdRange};
use crate::error::{AnalysisError, Result};
use crate::mask::MAX_KERNEL_SIZE;

/// Uniform green backdrop the fastener is photographed against
pub const DEFAULT_BACKGROUND: ThresholdRange = ThresholdRange::new([80, 85, 20], [90, 255, 255]);

pub const DEFAULT_RED: ThresholdRange = ThresholdRange::new([5, 80, 60], [16, 255, 255]);

// Hue bound exceeds 179 on purpose: dark pixels match whatever their hue.
pub const DEFAULT_BLACK: ThresholdRange = ThresholdRange::new([0, 0, 0], [200, 255, 60]);

pub const DEFAULT_WHITE: ThresholdRange = ThresholdRange::new([0, 0, 180], [50, 60, 255]);

pub const DEFAULT_KERNEL_SIZE: u32 = 5;

/// HSV rules for the three corrosion classes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrosionThresholds {
    pub red: ThresholdRange,
    pub black: ThresholdRange,
    pub white: ThresholdRange,
}

impl Default for CorrosionThresholds {
    fn default() -> Self {
        Self {
            red: DEFAULT_RED,
            black: DEFAULT_BLACK,
            white: DEFAULT_WHITE,
        }
    }
}

impl CorrosionThresholds {
    pub fn get(&self, class: CorrosionClass) -> &ThresholdRange {
        match class {
            CorrosionClass::Red => &self.red,
            CorrosionClass::Black => &self.black,
            CorrosionClass::White => &self.white,
        }
    }

    /// Class to range mapping, in reporting order
    pub fn ranges(&self) -> [(CorrosionClass, &ThresholdRange); 3] {
        CorrosionClass::ALL.map(|class| (class, self.get(class)))
    }
}

/// Tunables for one deployment (lighting, backdrop colour).
///
/// Missing keys in a config file fall back to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub background: ThresholdRange,
    pub corrosion: CorrosionThresholds,
    /// Side of the square structuring element used for mask cleanup
    pub kernel_size: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND,
            corrosion: CorrosionThresholds::default(),
            kernel_size: DEFAULT_KERNEL_SIZE,
        }
    }
}

impl AnalyzerConfig {
    /// Load and validate a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json(&contents).map_err(|e| match e {
            AnalysisError::InvalidConfig(msg) => {
                AnalysisError::InvalidConfig(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        log::debug!("loaded analyzer config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| AnalysisError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.kernel_size == 0 || self.kernel_size % 2 == 0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "kernel_size must be odd and positive, got {}",
                self.kernel_size
            )));
        }
        if self.kernel_size > MAX_KERNEL_SIZE {
            return Err(AnalysisError::InvalidConfig(format!(
                "kernel_size must be at most {}, got {}",
                MAX_KERNEL_SIZE, self.kernel_size
            )));
        }

        let named = std::iter::once(("background", &self.background)).chain(
            self.corrosion
                .ranges()
                .into_iter()
                .map(|(class, range)| (class.as_str(), range)),
        );
        for (name, range) in named {
            if let Some(channel) = range.inverted_channel() {
                return Err(AnalysisError::InvalidConfig(format!(
                    "{} range has lower > upper on channel {}",
                    name, channel
                )));
            }
        }

        Ok(())
    }
}
