use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::types::{ResampleFilter, ScaleRequest};

/// Rescaling parameters suitable for JSON presets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RescaleParams {
    pub target_scale: f64,
    /// Output width and height are rounded to a multiple of this
    pub divisor: u32,
    pub filter: ResampleFilter,
}

impl Default for RescaleParams {
    fn default() -> Self {
        Self {
            target_scale: ScaleRequest::DEFAULT_SCALE,
            divisor: ScaleRequest::DEFAULT_DIVISOR,
            filter: ResampleFilter::Area,
        }
    }
}

impl RescaleParams {
    pub fn scale_request(&self) -> ScaleRequest {
        ScaleRequest::new(self.target_scale, self.divisor)
    }

    /// Load a JSON preset. Missing fields fall back to the defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let params: RescaleParams = serde_json::from_str(&content)?;
        debug!("Loaded rescale preset from {:?}: {:?}", path, params);
        Ok(params)
    }
}
