//! Core building blocks: the intrinsics rescaling arithmetic, image resizing
//! and the serializable parameter set. These are internal primitives consumed
//! by the high-level `api` module.
pub mod params;
pub mod processing;
