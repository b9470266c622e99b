use crate::constants::{DEFAULT_DOWNSCALE_WEIGHT, DEFAULT_PAGE_SIZE, DEFAULT_TOLERANCE_PT};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Merge configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MergeOptions {
    // Target size selection
    pub size_mode: SizeMode,
    pub default_size: PageSize,
    /// Two sizes within this many points on both axes count as equal
    pub tolerance_pt: f32,
    /// Best-fit penalty per point a page must shrink
    pub downscale_weight: f32,

    // Page rendering
    pub transform_mode: TransformMode,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            size_mode: SizeMode::MostCommonExact,
            default_size: DEFAULT_PAGE_SIZE,
            tolerance_pt: DEFAULT_TOLERANCE_PT,
            downscale_weight: DEFAULT_DOWNSCALE_WEIGHT,
            transform_mode: TransformMode::FitCentered,
        }
    }
}

impl MergeOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: MergeOptions = serde_json::from_slice(&bytes)
            .map_err(|e| CollateError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CollateError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if !self.default_size.is_valid() {
            return Err(CollateError::Config(format!(
                "Default page size must be positive, got {}",
                self.default_size
            )));
        }

        if !self.tolerance_pt.is_finite() || self.tolerance_pt < 0.0 {
            return Err(CollateError::Config(
                "Size tolerance must be a non-negative number of points".to_string(),
            ));
        }

        if !self.downscale_weight.is_finite() || self.downscale_weight < 0.0 {
            return Err(CollateError::Config(
                "Down-scaling weight must be non-negative".to_string(),
            ));
        }

        Ok(())
    }
}
