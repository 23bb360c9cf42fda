//! Camera parameter files: the K matrix with an optional stereo baseline.
//!
//! Two encodings are supported:
//!
//! - Legacy text: whitespace-separated values. The first 9 values, read in
//!   file order across lines, form the row-major K. A line holding exactly one
//!   value is the baseline. Because of this shape-based rule a K written one
//!   value per line cannot be read back.
//! - JSON (`.json` extension): `{"k": [[..], [..], [..]], "baseline": 0.12}`.
use std::io::Write;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::io::writers::StagedFile;
use crate::types::{CameraParams, IntrinsicMatrix};

/// On-disk encoding of a camera parameter file.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CameraFileFormat {
    Text,
    Json,
}

impl CameraFileFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => CameraFileFormat::Json,
            _ => CameraFileFormat::Text,
        }
    }
}

/// Parse the legacy text format. `path` is only used for error messages.
pub fn parse_camera_params(content: &str, path: &Path) -> Result<CameraParams> {
    let mut values: Vec<f64> = Vec::with_capacity(9);
    let mut baseline = None;

    for (idx, line) in content.lines().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let parse = |token: &str| {
            token.parse::<f64>().map_err(|_| Error::InvalidNumber {
                line: idx + 1,
                token: token.to_string(),
            })
        };
        match tokens.as_slice() {
            [] => {}
            [single] => {
                if baseline.is_some() {
                    warn!("Multiple baseline lines in {:?}, using line {}", path, idx + 1);
                }
                baseline = Some(parse(*single)?);
            }
            many => {
                for token in many {
                    values.push(parse(*token)?);
                }
            }
        }
    }

    if values.len() < 9 {
        return Err(Error::InvalidMatrixFormat {
            path: path.to_path_buf(),
            found: values.len(),
        });
    }
    if values.len() > 9 {
        warn!(
            "{:?} holds {} matrix values, ignoring all but the first 9",
            path,
            values.len()
        );
    }

    let mut k = [0.0; 9];
    k.copy_from_slice(&values[..9]);
    Ok(CameraParams::new(IntrinsicMatrix::from_row_major(k), baseline))
}

/// Render the legacy text format: K on one line with 10 decimals, then the
/// baseline on its own line if present.
pub fn format_camera_params(params: &CameraParams) -> String {
    let k_line = params
        .k
        .to_row_major()
        .iter()
        .map(|v| format!("{:.10}", v))
        .collect::<Vec<_>>()
        .join(" ");
    let mut out = k_line;
    out.push('\n');
    if let Some(b) = params.baseline {
        // Debug formatting is the shortest representation that parses back to b
        out.push_str(&format!("{:?}\n", b));
    }
    out
}

/// Read camera parameters, choosing the encoding from the file extension.
pub fn load_camera_params(path: &Path) -> Result<CameraParams> {
    if !path.exists() {
        return Err(Error::MissingFile {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let params = match CameraFileFormat::from_path(path) {
        CameraFileFormat::Json => serde_json::from_str(&content)?,
        CameraFileFormat::Text => parse_camera_params(&content, path)?,
    };
    debug!("Loaded camera parameters from {:?}", path);
    Ok(params)
}

/// Encode camera parameters into a staged file next to `path`.
pub fn stage_camera_params(path: &Path, params: &CameraParams) -> Result<StagedFile> {
    let format = CameraFileFormat::from_path(path);
    StagedFile::create(path, |w| {
        match format {
            CameraFileFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, params)?;
                w.write_all(b"\n")?;
            }
            CameraFileFormat::Text => w.write_all(format_camera_params(params).as_bytes())?,
        }
        Ok(())
    })
}

/// Write camera parameters to `path`, replacing it atomically.
pub fn save_camera_params(path: &Path, params: &CameraParams) -> Result<()> {
    stage_camera_params(path, params)?.commit()?;
    Ok(())
}
