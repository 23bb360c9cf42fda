//! Shared types used across stereoscale.
//! Includes `Dimensions`, `IntrinsicMatrix`, `CameraParams`, `ScaleRequest`
//! and the `ResampleFilter` choice.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Pixel size of an image.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pinhole intrinsic matrix, row-major.
///
/// ```text
/// | fx  s  cx |
/// |  0 fy  cy |
/// |  0  0   1 |
/// ```
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntrinsicMatrix(pub [[f64; 3]; 3]);

impl IntrinsicMatrix {
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self([[fx, 0.0, cx], [0.0, fy, cy], [0.0, 0.0, 1.0]])
    }

    /// Builds the matrix from 9 row-major values.
    pub fn from_row_major(values: [f64; 9]) -> Self {
        let [a, b, c, d, e, f, g, h, i] = values;
        Self([[a, b, c], [d, e, f], [g, h, i]])
    }

    pub fn to_row_major(&self) -> [f64; 9] {
        let m = &self.0;
        [
            m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
        ]
    }

    pub fn fx(&self) -> f64 {
        self.0[0][0]
    }

    pub fn fy(&self) -> f64 {
        self.0[1][1]
    }

    pub fn cx(&self) -> f64 {
        self.0[0][2]
    }

    pub fn cy(&self) -> f64 {
        self.0[1][2]
    }
}

impl std::fmt::Display for IntrinsicMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[{:>14.6} {:>14.6} {:>14.6}]", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

/// Intrinsics plus the optional stereo baseline stored next to them.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CameraParams {
    pub k: IntrinsicMatrix,
    #[serde(default)]
    pub baseline: Option<f64>,
}

impl CameraParams {
    pub fn new(k: IntrinsicMatrix, baseline: Option<f64>) -> Self {
        Self { k, baseline }
    }
}

/// Requested downscale: a nominal factor and the block size both output
/// dimensions must be a multiple of.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ScaleRequest {
    pub target_scale: f64,
    pub divisor: u32,
}

impl ScaleRequest {
    pub const DEFAULT_SCALE: f64 = 0.5;
    pub const DEFAULT_DIVISOR: u32 = 224;

    pub fn new(target_scale: f64, divisor: u32) -> Self {
        Self {
            target_scale,
            divisor,
        }
    }
}

impl Default for ScaleRequest {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SCALE, Self::DEFAULT_DIVISOR)
    }
}

#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    /// Box filter over the source footprint (area averaging)
    #[default]
    Area,
    Bilinear,
    Lanczos3,
    Nearest,
}

impl std::fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResampleFilter::Area => write!(f, "area"),
            ResampleFilter::Bilinear => write!(f, "bilinear"),
            ResampleFilter::Lanczos3 => write!(f, "lanczos3"),
            ResampleFilter::Nearest => write!(f, "nearest"),
        }
    }
}
