//! Processing primitives: divisor-aligned size planning with intrinsics
//! rescaling, and the image resampler.
pub mod rescale;
pub mod resize;
