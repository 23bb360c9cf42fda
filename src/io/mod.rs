//! I/O layer: camera parameter files, image decode/encode, and the staged
//! writers used to commit outputs only after every step has succeeded.
pub mod camera_file;
pub use camera_file::{
    CameraFileFormat, format_camera_params, load_camera_params, parse_camera_params,
    save_camera_params, stage_camera_params,
};

pub mod images;
pub use images::{open_image, read_dimensions, stage_image};

pub mod writers;
