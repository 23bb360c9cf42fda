use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use image::{DynamicImage, ImageBuffer, Pixel};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::{Dimensions, ResampleFilter};

fn resize_alg(filter: ResampleFilter) -> ResizeAlg {
    match filter {
        ResampleFilter::Area => ResizeAlg::Convolution(FilterType::Box),
        ResampleFilter::Bilinear => ResizeAlg::Convolution(FilterType::Bilinear),
        ResampleFilter::Lanczos3 => ResizeAlg::Convolution(FilterType::Lanczos3),
        ResampleFilter::Nearest => ResizeAlg::Nearest,
    }
}

/// Sample types that can be handed to `fast_image_resize` as raw bytes.
trait Sample: image::Primitive {
    fn to_bytes(data: &[Self]) -> Vec<u8>;
    fn from_bytes(bytes: &[u8]) -> Vec<Self>;
}

impl Sample for u8 {
    fn to_bytes(data: &[Self]) -> Vec<u8> {
        data.to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Vec<Self> {
        bytes.to_vec()
    }
}

impl Sample for u16 {
    fn to_bytes(data: &[Self]) -> Vec<u8> {
        let mut out = Vec::with_capacity(data.len() * 2);
        for &v in data {
            out.extend_from_slice(&v.to_ne_bytes());
        }
        out
    }

    fn from_bytes(bytes: &[u8]) -> Vec<Self> {
        bytes
            .chunks_exact(2)
            .map(|c| u16::from_ne_bytes([c[0], c[1]]))
            .collect()
    }
}

impl Sample for f32 {
    fn to_bytes(data: &[Self]) -> Vec<u8> {
        let mut out = Vec::with_capacity(data.len() * 4);
        for &v in data {
            out.extend_from_slice(&v.to_ne_bytes());
        }
        out
    }

    fn from_bytes(bytes: &[u8]) -> Vec<Self> {
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }
}

/// Resize one typed buffer. `pixel_type` must describe the layout of `P`.
fn resize_buffer<P>(
    src: &ImageBuffer<P, Vec<P::Subpixel>>,
    pixel_type: PixelType,
    target: Dimensions,
    filter: ResampleFilter,
) -> Result<ImageBuffer<P, Vec<P::Subpixel>>>
where
    P: Pixel,
    P::Subpixel: Sample,
{
    let options = ResizeOptions::new().resize_alg(resize_alg(filter));
    let mut resizer = Resizer::new();

    let src_image = Image::from_vec_u8(
        src.width(),
        src.height(),
        <P::Subpixel as Sample>::to_bytes(src.as_raw()),
        pixel_type,
    )
    .map_err(Error::resize)?;
    let mut dst_image = Image::new(target.width, target.height, pixel_type);
    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(Error::resize)?;

    let samples = <P::Subpixel as Sample>::from_bytes(&dst_image.into_vec());
    ImageBuffer::from_raw(target.width, target.height, samples)
        .ok_or_else(|| Error::Resize(format!("resized buffer does not fit {}", target)))
}

/// Refuse outputs whose pixel buffer would exceed the `image` crate's default
/// allocation limit.
fn check_output_allocation(image: &DynamicImage, target: Dimensions) -> Result<()> {
    let bytes_per_pixel = image.color().bytes_per_pixel().max(4) as u64;
    let needed = target.width as u64 * target.height as u64 * bytes_per_pixel;
    match image::Limits::default().max_alloc {
        Some(limit) if needed > limit => Err(Error::Resize(format!(
            "output {} needs {} bytes, above the {} byte allocation limit",
            target, needed, limit
        ))),
        _ => Ok(()),
    }
}

/// Resize `image` to exactly `target`, keeping its pixel layout.
///
/// Layouts without a direct `fast_image_resize` counterpart are converted to
/// RGBA8 first.
pub fn resize_image(
    image: &DynamicImage,
    target: Dimensions,
    filter: ResampleFilter,
) -> Result<DynamicImage> {
    if target.is_empty() {
        return Err(Error::Resize(format!("cannot resize to {}", target)));
    }
    let source = Dimensions::new(image.width(), image.height());
    if source == target {
        debug!("Image already {}, skipping resize", target);
        return Ok(image.clone());
    }
    check_output_allocation(image, target)?;

    debug!(
        "Resizing {:?} image {} -> {} ({})",
        image.color(),
        source,
        target,
        filter
    );

    let resized = match image {
        DynamicImage::ImageLuma8(buf) => {
            DynamicImage::ImageLuma8(resize_buffer(buf, PixelType::U8, target, filter)?)
        }
        DynamicImage::ImageLumaA8(buf) => {
            DynamicImage::ImageLumaA8(resize_buffer(buf, PixelType::U8x2, target, filter)?)
        }
        DynamicImage::ImageRgb8(buf) => {
            DynamicImage::ImageRgb8(resize_buffer(buf, PixelType::U8x3, target, filter)?)
        }
        DynamicImage::ImageRgba8(buf) => {
            DynamicImage::ImageRgba8(resize_buffer(buf, PixelType::U8x4, target, filter)?)
        }
        DynamicImage::ImageLuma16(buf) => {
            DynamicImage::ImageLuma16(resize_buffer(buf, PixelType::U16, target, filter)?)
        }
        DynamicImage::ImageLumaA16(buf) => {
            DynamicImage::ImageLumaA16(resize_buffer(buf, PixelType::U16x2, target, filter)?)
        }
        DynamicImage::ImageRgb16(buf) => {
            DynamicImage::ImageRgb16(resize_buffer(buf, PixelType::U16x3, target, filter)?)
        }
        DynamicImage::ImageRgba16(buf) => {
            DynamicImage::ImageRgba16(resize_buffer(buf, PixelType::U16x4, target, filter)?)
        }
        DynamicImage::ImageRgb32F(buf) => {
            DynamicImage::ImageRgb32F(resize_buffer(buf, PixelType::F32x3, target, filter)?)
        }
        DynamicImage::ImageRgba32F(buf) => {
            DynamicImage::ImageRgba32F(resize_buffer(buf, PixelType::F32x4, target, filter)?)
        }
        other => {
            warn!(
                "Unsupported pixel layout {:?}, converting to RGBA8 before resizing",
                other.color()
            );
            DynamicImage::ImageRgba8(resize_buffer(
                &other.to_rgba8(),
                PixelType::U8x4,
                target,
                filter,
            )?)
        }
    };

    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn area_filter_averages_blocks() {
        // 4x2 image of two flat 2x2 blocks: 0 and 200
        let img = GrayImage::from_fn(4, 2, |x, _| if x < 2 { Luma([0]) } else { Luma([200]) });
        let out = resize_image(
            &DynamicImage::ImageLuma8(img),
            Dimensions::new(2, 1),
            ResampleFilter::Area,
        )
        .unwrap();
        let out = out.to_luma8();
        assert_eq!(out.dimensions(), (2, 1));
        assert!(out.get_pixel(0, 0)[0] <= 1);
        assert!(out.get_pixel(1, 0)[0].abs_diff(200) <= 1);
    }

    #[test]
    fn keeps_pixel_layout() {
        let img = RgbImage::from_pixel(64, 48, Rgb([10, 20, 30]));
        let out = resize_image(
            &DynamicImage::ImageRgb8(img),
            Dimensions::new(28, 14),
            ResampleFilter::Area,
        )
        .unwrap();
        assert!(matches!(out, DynamicImage::ImageRgb8(_)));
        assert_eq!((out.width(), out.height()), (28, 14));
        let px = out.to_rgb8().get_pixel(5, 5).0;
        for (got, want) in px.iter().zip([10u8, 20, 30]) {
            assert!(got.abs_diff(want) <= 1);
        }
    }

    #[test]
    fn sixteen_bit_survives_resize() {
        let img = ImageBuffer::<Luma<u16>, Vec<u16>>::from_pixel(32, 32, Luma([40_000]));
        let out = resize_image(
            &DynamicImage::ImageLuma16(img),
            Dimensions::new(16, 16),
            ResampleFilter::Lanczos3,
        )
        .unwrap();
        assert!(out.to_luma16().get_pixel(8, 8)[0].abs_diff(40_000) <= 1);
    }

    #[test]
    fn same_size_is_a_copy() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([7])));
        let out = resize_image(&img, Dimensions::new(8, 8), ResampleFilter::Nearest).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn huge_target_is_an_error_not_an_abort() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(4, 4));
        let err = resize_image(&img, Dimensions::new(192_000, 108_000), ResampleFilter::Area)
            .unwrap_err();
        assert!(matches!(err, Error::Resize(_)));
    }

    #[test]
    fn zero_target_is_an_error() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(8, 8));
        assert!(resize_image(&img, Dimensions::new(0, 8), ResampleFilter::Area).is_err());
    }
}
