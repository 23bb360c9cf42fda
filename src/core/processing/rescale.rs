use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::types::{CameraParams, Dimensions, IntrinsicMatrix, ScaleRequest};

/// Round `dimension` to the nearest multiple of `divisor`.
///
/// Halfway cases round away from zero (`f64::round`), so 336 with divisor 224
/// becomes 448. `divisor` must be non-zero. Returns `None` when the aligned
/// size does not fit in `u32`.
pub fn align_to_divisor(dimension: u32, divisor: u32) -> Option<u32> {
    let blocks = (dimension as f64 / divisor as f64).round() as u64;
    u32::try_from(blocks * divisor as u64).ok()
}

/// Truncating scale of a single dimension; `None` past `u32::MAX`.
fn truncate_scaled(dimension: u32, scale: f64) -> Option<u32> {
    let scaled = (dimension as f64 * scale).trunc();
    if scaled > u32::MAX as f64 {
        None
    } else {
        Some(scaled as u32)
    }
}

/// Result of planning a rescale for one image size.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct RescalePlan {
    pub original: Dimensions,
    /// Size after the nominal scale, before divisor alignment
    pub target: Dimensions,
    pub output: Dimensions,
    pub divisor: u32,
    /// output.width / original.width
    pub actual_scale_w: f64,
    /// output.height / original.height
    pub actual_scale_h: f64,
}

impl RescalePlan {
    /// Scale fx and cx by the achieved horizontal ratio and fy and cy by the
    /// vertical one. Skew and the bottom row are copied.
    pub fn rescale_intrinsics(&self, k: &IntrinsicMatrix) -> IntrinsicMatrix {
        let mut m = k.0;
        m[0][0] *= self.actual_scale_w;
        m[1][1] *= self.actual_scale_h;
        m[0][2] *= self.actual_scale_w;
        m[1][2] *= self.actual_scale_h;
        IntrinsicMatrix(m)
    }

    /// Rescaled camera; the baseline is a physical distance and stays as is.
    pub fn apply(&self, camera: &CameraParams) -> CameraParams {
        CameraParams {
            k: self.rescale_intrinsics(&camera.k),
            baseline: camera.baseline,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.original == self.output
    }
}

impl ScaleRequest {
    pub fn validate(&self) -> Result<()> {
        if self.divisor == 0 {
            return Err(Error::InvalidArgument {
                arg: "divisor",
                value: self.divisor.to_string(),
            });
        }
        if !self.target_scale.is_finite() || self.target_scale <= 0.0 {
            return Err(Error::InvalidArgument {
                arg: "scale",
                value: self.target_scale.to_string(),
            });
        }
        Ok(())
    }

    /// Compute the divisor-aligned output size for an image of `original` size.
    ///
    /// Fails with `DegenerateOutputSize` when either side rounds to zero blocks
    /// and with `InvalidArgument` when a side would exceed `u32::MAX`.
    pub fn plan(&self, original: Dimensions) -> Result<RescalePlan> {
        self.validate()?;
        if original.is_empty() {
            return Err(Error::InvalidArgument {
                arg: "image size",
                value: original.to_string(),
            });
        }

        let too_large = || Error::InvalidArgument {
            arg: "scale",
            value: format!(
                "{} (output of {} does not fit in u32 pixels)",
                self.target_scale, original
            ),
        };
        let target = Dimensions::new(
            truncate_scaled(original.width, self.target_scale).ok_or_else(too_large)?,
            truncate_scaled(original.height, self.target_scale).ok_or_else(too_large)?,
        );
        let output = Dimensions::new(
            align_to_divisor(target.width, self.divisor).ok_or_else(too_large)?,
            align_to_divisor(target.height, self.divisor).ok_or_else(too_large)?,
        );

        if output.is_empty() {
            return Err(Error::DegenerateOutputSize {
                width: output.width,
                height: output.height,
                divisor: self.divisor,
            });
        }

        let plan = RescalePlan {
            original,
            target,
            output,
            divisor: self.divisor,
            actual_scale_w: output.width as f64 / original.width as f64,
            actual_scale_h: output.height as f64 / original.height as f64,
        };

        info!("Original size: {}", original);
        info!("Target scale: {}", self.target_scale);
        info!("Target size (before rounding): {}", target);
        info!(
            "Final size (divisible by {}): {} ({} x {} blocks)",
            self.divisor,
            output,
            output.width / self.divisor,
            output.height / self.divisor
        );
        info!(
            "Actual scales: w={:.6}, h={:.6}",
            plan.actual_scale_w, plan.actual_scale_h
        );

        Ok(plan)
    }
}

/// Plan the rescale for `original` and apply it to `camera` in one step.
pub fn rescale_camera(
    original: Dimensions,
    camera: &CameraParams,
    request: &ScaleRequest,
) -> Result<(RescalePlan, CameraParams)> {
    let plan = request.plan(original)?;
    Ok((plan, plan.apply(camera)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{a} vs {b} (tol {tol})");
    }

    #[test]
    fn aligns_to_nearest_multiple() {
        assert_eq!(align_to_divisor(960, 224), Some(896));
        assert_eq!(align_to_divisor(540, 224), Some(448));
        assert_eq!(align_to_divisor(112, 224), Some(224));
        assert_eq!(align_to_divisor(111, 224), Some(0));
        assert_eq!(align_to_divisor(336, 224), Some(448));
        assert_eq!(align_to_divisor(57, 1), Some(57));
        // Just under 2^32 rounds up to 2 blocks of 2^31, which overflows u32
        assert_eq!(align_to_divisor(u32::MAX - 1, 1 << 31), None);
    }

    #[test]
    fn output_is_always_a_multiple_of_divisor() {
        for divisor in [1, 7, 14, 56, 224] {
            for (w, h) in [(1920, 1080), (640, 480), (4000, 3000), (1241, 376)] {
                let plan = ScaleRequest::new(0.5, divisor)
                    .plan(Dimensions::new(w, h))
                    .unwrap();
                assert_eq!(plan.output.width % divisor, 0);
                assert_eq!(plan.output.height % divisor, 0);
            }
        }
    }

    #[test]
    fn worked_example_uses_actual_per_axis_scales() {
        let camera = CameraParams::new(IntrinsicMatrix::new(1000.0, 1000.0, 960.0, 540.0), None);
        let (plan, scaled) = rescale_camera(
            Dimensions::new(1920, 1080),
            &camera,
            &ScaleRequest::new(0.5, 224),
        )
        .unwrap();

        assert_eq!(plan.target, Dimensions::new(960, 540));
        assert_eq!(plan.output, Dimensions::new(896, 448));
        assert_close(plan.actual_scale_w, 0.466667, 1e-6);
        assert_close(plan.actual_scale_h, 0.414815, 1e-6);

        assert_close(scaled.k.fx(), 466.667, 1e-3);
        assert_close(scaled.k.fy(), 414.815, 1e-3);
        assert_close(scaled.k.cx(), 448.0, 1e-9);
        assert_close(scaled.k.cy(), 224.0, 1e-9);
        // Not the nominal 0.5
        assert!((scaled.k.fx() - 500.0).abs() > 1.0);
        assert_eq!(scaled.k.0[2], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn identity_request_leaves_everything_unchanged() {
        let k = IntrinsicMatrix([[721.5, 0.3, 609.6], [0.0, 721.5, 172.9], [0.0, 0.0, 1.0]]);
        let camera = CameraParams::new(k, Some(0.54));
        let (plan, scaled) =
            rescale_camera(Dimensions::new(1241, 376), &camera, &ScaleRequest::new(1.0, 1))
                .unwrap();
        assert!(plan.is_identity());
        assert_eq!(scaled, camera);
    }

    #[test]
    fn rerunning_on_output_is_stable() {
        let camera = CameraParams::new(IntrinsicMatrix::new(1000.0, 1000.0, 960.0, 540.0), Some(0.12));
        let (plan, first) = rescale_camera(
            Dimensions::new(1920, 1080),
            &camera,
            &ScaleRequest::new(0.5, 224),
        )
        .unwrap();
        let (_, second) = rescale_camera(plan.output, &first, &ScaleRequest::new(1.0, 1)).unwrap();
        assert_eq!(second, first);
    }

    #[test]
    fn skew_and_baseline_are_not_scaled() {
        let k = IntrinsicMatrix([[800.0, 2.5, 320.0], [0.0, 810.0, 240.0], [0.0, 0.0, 1.0]]);
        let camera = CameraParams::new(k, Some(0.25));
        let (_, scaled) =
            rescale_camera(Dimensions::new(640, 480), &camera, &ScaleRequest::new(0.5, 56))
                .unwrap();
        assert_eq!(scaled.k.0[0][1], 2.5);
        assert_eq!(scaled.baseline, Some(0.25));
    }

    #[test]
    fn tiny_scale_is_degenerate() {
        let err = ScaleRequest::new(0.05, 224)
            .plan(Dimensions::new(1920, 1080))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DegenerateOutputSize { width: 0, height: 0, divisor: 224 }
        ));
    }

    #[test]
    fn one_axis_degenerate_is_rejected() {
        // 1920x200 -> 960x100; 100 / 224 rounds to 0
        let err = ScaleRequest::new(0.5, 224)
            .plan(Dimensions::new(1920, 200))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DegenerateOutputSize { width: 896, height: 0, .. }
        ));
    }

    #[test]
    fn oversized_output_is_rejected_not_clamped() {
        let err = ScaleRequest::new(1.0e6, 1 << 31)
            .plan(Dimensions::new(10_000, 10_000))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "scale", .. }));

        // Target fits, but rounding up to the next block does not
        let err = ScaleRequest::new(1.0, 1 << 31)
            .plan(Dimensions::new(u32::MAX - 1, 4))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "scale", .. }));
    }

    #[test]
    fn large_aligned_output_stays_a_multiple() {
        let divisor = 1 << 30;
        let plan = ScaleRequest::new(1.0, divisor)
            .plan(Dimensions::new(3 << 30, 1 << 30))
            .unwrap();
        assert_eq!(plan.output, Dimensions::new(3 << 30, 1 << 30));
        assert_eq!(plan.output.width % divisor, 0);
    }

    #[test]
    fn invalid_requests_are_rejected() {
        let size = Dimensions::new(640, 480);
        assert!(matches!(
            ScaleRequest::new(0.5, 0).plan(size),
            Err(Error::InvalidArgument { arg: "divisor", .. })
        ));
        assert!(matches!(
            ScaleRequest::new(-1.0, 14).plan(size),
            Err(Error::InvalidArgument { arg: "scale", .. })
        ));
        assert!(matches!(
            ScaleRequest::new(f64::NAN, 14).plan(size),
            Err(Error::InvalidArgument { arg: "scale", .. })
        ));
        assert!(ScaleRequest::new(0.5, 14).plan(Dimensions::new(0, 480)).is_err());
    }
}
