use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::processing::rescale::RescalePlan;
use crate::error::Result;
use crate::io::writers::StagedFile;
use crate::types::{CameraParams, IntrinsicMatrix, ResampleFilter};

/// JSON sidecar describing one stereo rescale run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RescaleReport {
    pub tool: String,
    pub version: String,
    pub generated: String,
    pub inputs: ReportPaths,
    pub outputs: ReportPaths,
    pub target_scale: f64,
    pub filter: ResampleFilter,
    pub plan: RescalePlan,
    pub k_original: IntrinsicMatrix,
    pub k_rescaled: IntrinsicMatrix,
    pub baseline: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPaths {
    pub left: PathBuf,
    pub right: PathBuf,
    pub intrinsics: PathBuf,
}

impl RescaleReport {
    pub fn new(
        inputs: ReportPaths,
        outputs: ReportPaths,
        target_scale: f64,
        filter: ResampleFilter,
        plan: RescalePlan,
        original: &CameraParams,
        rescaled: &CameraParams,
    ) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated: chrono::Utc::now().to_rfc3339(),
            inputs,
            outputs,
            target_scale,
            filter,
            plan,
            k_original: original.k,
            k_rescaled: rescaled.k,
            baseline: rescaled.baseline,
        }
    }
}

/// Stage the report as pretty JSON at `path`.
pub fn stage_report(path: &Path, report: &RescaleReport) -> Result<StagedFile> {
    let staged = StagedFile::create(path, |w| {
        serde_json::to_writer_pretty(&mut *w, report)?;
        w.write_all(b"\n")?;
        Ok(())
    })?;
    info!("Prepared report sidecar: {:?}", path);
    Ok(staged)
}
