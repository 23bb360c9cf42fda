//! Output writers. Every file is first encoded into a temporary file next to
//! its destination and only renamed into place on `commit`.
pub mod report;
pub mod staged;

pub use report::{ReportPaths, RescaleReport, stage_report};
pub use staged::StagedFile;
