use clap::Parser;
use std::path::PathBuf;

use stereoscale::ResampleFilter;

#[derive(Parser, Debug)]
#[command(
    name = "stereoscale",
    version,
    about = "Downscale a stereo pair to block-aligned size and update the camera intrinsics"
)]
pub struct CliArgs {
    /// Left image path
    pub left: PathBuf,

    /// Right image path
    pub right: PathBuf,

    /// K matrix file path (with optional baseline line)
    pub k_matrix: PathBuf,

    /// Output left image path (default: <left>_scaled<ext>)
    #[arg(long, alias = "output_left")]
    pub output_left: Option<PathBuf>,

    /// Output right image path (default: <right>_scaled<ext>)
    #[arg(long, alias = "output_right")]
    pub output_right: Option<PathBuf>,

    /// Output K matrix path (default: <k>_scaled<ext>)
    #[arg(long, alias = "output_k")]
    pub output_k: Option<PathBuf>,

    /// Target scale factor [default: 0.5]
    #[arg(long)]
    pub scale: Option<f64>,

    /// Output width and height are rounded to a multiple of this [default: 224]
    #[arg(long)]
    pub divisor: Option<u32>,

    /// Resampling filter [default: area]
    #[arg(long, value_enum)]
    pub filter: Option<ResampleFilter>,

    /// JSON preset with target_scale, divisor and filter; flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write a JSON report describing the rescale
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Validate inputs and print the plan without writing anything
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Enable logging (honours RUST_LOG)
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
