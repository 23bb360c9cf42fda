//! High-level library API: rescale a stereo pair from files to files, in
//! memory, or plan-only. Prefer these entrypoints over the low-level
//! processing modules when integrating stereoscale.
use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::info;

use crate::core::params::RescaleParams;
use crate::core::processing::rescale::{RescalePlan, rescale_camera};
use crate::core::processing::resize::resize_image;
use crate::error::{Error, Result};
use crate::io::camera_file::{load_camera_params, stage_camera_params};
use crate::io::images::{open_image, read_dimensions, stage_image};
use crate::io::writers::staged::commit_all;
use crate::io::writers::{ReportPaths, RescaleReport, stage_report};
use crate::types::{CameraParams, Dimensions, ScaleRequest};

/// `<dir>/<stem>_scaled<.ext>` next to `input`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}_scaled.{}", stem, ext.to_string_lossy()),
        None => format!("{}_scaled", stem),
    };
    input.with_file_name(name)
}

/// Input and output locations for one stereo pair.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoPairPaths {
    pub left: PathBuf,
    pub right: PathBuf,
    pub intrinsics: PathBuf,
    pub output_left: PathBuf,
    pub output_right: PathBuf,
    pub output_k: PathBuf,
    /// Optional JSON sidecar describing the run
    pub report: Option<PathBuf>,
}

impl StereoPairPaths {
    /// Inputs with outputs defaulted to `<stem>_scaled<ext>` beside each input.
    pub fn new(
        left: impl Into<PathBuf>,
        right: impl Into<PathBuf>,
        intrinsics: impl Into<PathBuf>,
    ) -> Self {
        let left = left.into();
        let right = right.into();
        let intrinsics = intrinsics.into();
        Self {
            output_left: default_output_path(&left),
            output_right: default_output_path(&right),
            output_k: default_output_path(&intrinsics),
            left,
            right,
            intrinsics,
            report: None,
        }
    }

    /// Fail with `MissingFile` for the first input that does not exist.
    pub fn check_inputs(&self) -> Result<()> {
        for path in [&self.left, &self.right, &self.intrinsics] {
            if !path.exists() {
                return Err(Error::MissingFile { path: path.clone() });
            }
        }
        Ok(())
    }

    fn report_inputs(&self) -> ReportPaths {
        ReportPaths {
            left: self.left.clone(),
            right: self.right.clone(),
            intrinsics: self.intrinsics.clone(),
        }
    }

    fn report_outputs(&self) -> ReportPaths {
        ReportPaths {
            left: self.output_left.clone(),
            right: self.output_right.clone(),
            intrinsics: self.output_k.clone(),
        }
    }
}

/// Check that both views share one size, then plan the rescale and apply it
/// to `camera`.
pub fn plan_stereo_rescale(
    left: Dimensions,
    right: Dimensions,
    camera: &CameraParams,
    request: &ScaleRequest,
) -> Result<(RescalePlan, CameraParams)> {
    ensure_same_size(left, right)?;
    rescale_camera(left, camera, request)
}

fn ensure_same_size(left: Dimensions, right: Dimensions) -> Result<()> {
    if left != right {
        return Err(Error::SizeMismatch { left, right });
    }
    Ok(())
}

/// Result of rescaling a stereo pair in memory
#[derive(Debug, Clone)]
pub struct RescaledPair {
    pub left: DynamicImage,
    pub right: DynamicImage,
    pub camera: CameraParams,
    pub plan: RescalePlan,
}

/// Rescale both views and the camera parameters without touching the disk.
pub fn rescale_stereo_pair(
    left: &DynamicImage,
    right: &DynamicImage,
    camera: &CameraParams,
    params: &RescaleParams,
) -> Result<RescaledPair> {
    let (plan, rescaled) = plan_stereo_rescale(
        Dimensions::new(left.width(), left.height()),
        Dimensions::new(right.width(), right.height()),
        camera,
        &params.scale_request(),
    )?;

    let left = resize_image(left, plan.output, params.filter)?;
    let right = resize_image(right, plan.output, params.filter)?;

    Ok(RescaledPair {
        left,
        right,
        camera: rescaled,
        plan,
    })
}

/// Outcome of a dry run: everything that would be written, nothing written.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoPlan {
    pub plan: RescalePlan,
    pub original: CameraParams,
    pub rescaled: CameraParams,
}

/// Validate the inputs and compute the plan from image headers only.
pub fn inspect_stereo_pair(
    paths: &StereoPairPaths,
    params: &RescaleParams,
) -> Result<StereoPlan> {
    paths.check_inputs()?;
    let left = read_dimensions(&paths.left)?;
    let right = read_dimensions(&paths.right)?;
    ensure_same_size(left, right)?;
    let original = load_camera_params(&paths.intrinsics)?;
    let (plan, rescaled) = rescale_camera(left, &original, &params.scale_request())?;
    log_camera(&original, &rescaled);
    Ok(StereoPlan {
        plan,
        original,
        rescaled,
    })
}

/// Files written by `process_stereo_pair`
#[derive(Debug, Clone)]
pub struct StereoRescaleOutcome {
    pub plan: RescalePlan,
    pub camera: CameraParams,
    pub written: Vec<PathBuf>,
}

/// Load, rescale and write a stereo pair and its camera parameters.
///
/// Inputs are validated and every output is encoded before the first file is
/// moved into place, so an error leaves no outputs behind. If a rename fails
/// part way through, outputs already renamed are deleted again; an output
/// that replaced an existing file leaves that file gone rather than restored.
pub fn process_stereo_pair(
    paths: &StereoPairPaths,
    params: &RescaleParams,
) -> Result<StereoRescaleOutcome> {
    paths.check_inputs()?;

    let left = open_image(&paths.left)?;
    let right = open_image(&paths.right)?;
    ensure_same_size(
        Dimensions::new(left.width(), left.height()),
        Dimensions::new(right.width(), right.height()),
    )?;
    let original = load_camera_params(&paths.intrinsics)?;

    let pair = rescale_stereo_pair(&left, &right, &original, params)?;
    log_camera(&original, &pair.camera);

    let mut staged = vec![
        stage_image(&paths.output_left, &pair.left)?,
        stage_image(&paths.output_right, &pair.right)?,
        stage_camera_params(&paths.output_k, &pair.camera)?,
    ];
    if let Some(report_path) = &paths.report {
        let report = RescaleReport::new(
            paths.report_inputs(),
            paths.report_outputs(),
            params.target_scale,
            params.filter,
            pair.plan,
            &original,
            &pair.camera,
        );
        staged.push(stage_report(report_path, &report)?);
    }

    let written = commit_all(staged)?;
    for path in &written {
        info!("Saved {:?}", path);
    }

    Ok(StereoRescaleOutcome {
        plan: pair.plan,
        camera: pair.camera,
        written,
    })
}

fn log_camera(original: &CameraParams, rescaled: &CameraParams) {
    info!("Original K matrix:\n{}", original.k);
    info!("Updated K matrix:\n{}", rescaled.k);
    match rescaled.baseline {
        Some(b) => info!("Baseline (unchanged): {}", b),
        None => info!("Baseline: none"),
    }
}
