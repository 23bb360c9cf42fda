use std::path::Path;

use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::debug;

use crate::error::{Error, Result};
use crate::io::writers::StagedFile;
use crate::types::Dimensions;

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::MissingFile {
            path: path.to_path_buf(),
        })
    }
}

/// Decode an image, guessing the codec from its content.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    ensure_exists(path)?;
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    debug!(
        "Loaded {:?}: {}x{} {:?}",
        path,
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img)
}

/// Read only the header to get the pixel size.
pub fn read_dimensions(path: &Path) -> Result<Dimensions> {
    ensure_exists(path)?;
    let (width, height) = ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(Dimensions::new(width, height))
}

/// Encode `img` into a staged file using the codec implied by `path`'s extension.
pub fn stage_image(path: &Path, img: &DynamicImage) -> Result<StagedFile> {
    let format = ImageFormat::from_path(path)?;
    StagedFile::create(path, |w| {
        img.write_to(w, format)?;
        Ok(())
    })
}
