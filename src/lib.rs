#![doc = r#"
stereoscale — downscale rectified stereo pairs to block-aligned sizes.

Vision backbones with a fixed patch grid want input sides that are exact
multiples of a block size (224 by default). This crate shrinks a left/right
image pair by a nominal factor, rounds each side to the nearest multiple of
the block size, and rescales the pinhole intrinsics by the ratio actually
achieved on each axis. The stereo baseline is a physical distance and is
carried through unchanged.

Quick start: rescale files on disk
----------------------------------
```rust,no_run
use stereoscale::{RescaleParams, StereoPairPaths, process_stereo_pair};

fn main() -> stereoscale::Result<()> {
    let paths = StereoPairPaths::new("left.png", "right.png", "K.txt");
    let outcome = process_stereo_pair(&paths, &RescaleParams::default())?;
    println!("wrote {} files at {}", outcome.written.len(), outcome.plan.output);
    Ok(())
}
```

Arithmetic only
---------------
```rust
use stereoscale::{CameraParams, Dimensions, IntrinsicMatrix, ScaleRequest, rescale_camera};

let camera = CameraParams::new(IntrinsicMatrix::new(1000.0, 1000.0, 960.0, 540.0), Some(0.12));
let (plan, scaled) =
    rescale_camera(Dimensions::new(1920, 1080), &camera, &ScaleRequest::new(0.5, 224)).unwrap();

assert_eq!(plan.output, Dimensions::new(896, 448));
assert!((scaled.k.fx() - 466.666_666).abs() < 1e-3);
assert!((scaled.k.fy() - 414.814_814).abs() < 1e-3);
assert_eq!(scaled.baseline, Some(0.12));
```

Error handling
--------------
All public functions return `stereoscale::Result<T>`; match on `stereoscale::Error`
to handle specific cases.

```rust,no_run
use stereoscale::{Error, RescaleParams, StereoPairPaths, process_stereo_pair};

let paths = StereoPairPaths::new("left.png", "right.png", "K.txt");
match process_stereo_pair(&paths, &RescaleParams::default()) {
    Ok(_) => {}
    Err(Error::SizeMismatch { left, right }) => eprintln!("pair differs: {left} vs {right}"),
    Err(Error::DegenerateOutputSize { .. }) => eprintln!("scale too small for the divisor"),
    Err(other) => eprintln!("{other}"),
}
```

Useful modules
--------------
- [`api`] — high-level entry points.
- [`core`] — rescale planning, image resizing, presets.
- [`io`] — camera parameter files, image I/O, staged writers.
- [`types`] — `Dimensions`, `IntrinsicMatrix`, `CameraParams`, `ScaleRequest`.
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
pub use crate::core::params::RescaleParams;
pub use crate::core::processing::rescale::{RescalePlan, align_to_divisor, rescale_camera};
pub use crate::core::processing::resize::resize_image;
pub use error::{Error, Result};
pub use types::{CameraParams, Dimensions, IntrinsicMatrix, ResampleFilter, ScaleRequest};

pub use crate::io::{load_camera_params, save_camera_params};

pub use api::{
    RescaledPair, StereoPairPaths, StereoPlan, StereoRescaleOutcome, default_output_path,
    inspect_stereo_pair, plan_stereo_rescale, process_stereo_pair, rescale_stereo_pair,
};
