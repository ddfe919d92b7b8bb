//! Image preparation: EMF rasterisation, rotation and base64 packaging
//!
//! Nothing in here fails the conversion. Every step that cannot be carried
//! out leaves the image as it was.

pub mod emf;
pub mod raster;

use crate::source_model::ImagePart;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::io::Cursor;

/// Rotation values are stored in 60000ths of a degree
const ROTATION_UNITS_PER_DEGREE: i64 = 60_000;

/// Largest side of a rasterised metafile in pixels
const MAX_RASTER_SIDE: u32 = 16_384;

/// Side length of the placeholder icon in pixels
const PLACEHOLDER_SIZE: u32 = 48;

const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="48" viewBox="0 0 48 48">
<path d="M10 4 H30 L40 14 V44 H10 Z" fill="#F2F2F2" stroke="#808080" stroke-width="2"/>
<path d="M30 4 V14 H40" fill="none" stroke="#808080" stroke-width="2"/>
<path d="M20 24 Q20 19 25 19 Q30 19 30 24 Q30 27 25 29 V32" fill="none" stroke="#C00000" stroke-width="3"/>
<circle cx="25" cy="37" r="2" fill="#C00000"/>
</svg>"##;

/// An image ready for embedding as a data URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedImage {
    pub content_type: String,
    /// Base64 encoded bytes
    pub data: String,
}

/// Parameters for preparing one image
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRequest {
    /// Display width in pixels
    pub width: Option<i64>,
    /// Display height in pixels
    pub height: Option<i64>,
    /// Rotation in 60000ths of a degree
    pub rotation: Option<i64>,
    /// Scale factor for rasterising vector images
    pub supersampling: u32,
}

/// Turn an image part into base64 data, converting and rotating as needed
///
/// A missing part yields the "unknown file" placeholder icon.
pub fn prepare_image(part: Option<&ImagePart>, request: &ImageRequest) -> PreparedImage {
    let Some(part) = part else {
        return PreparedImage {
            content_type: "image/png".to_string(),
            data: STANDARD.encode(placeholder_png()),
        };
    };

    let mut content_type = part.content_type.clone();
    let mut bytes = part.bytes.clone();

    if part.is_emf() {
        match emf_to_png(&part.bytes, request) {
            Some(png) => {
                content_type = "image/png".to_string();
                bytes = png;
            }
            None => log::warn!("Could not rasterise EMF image, embedding original bytes"),
        }
    }

    let degrees = request.rotation.map(nearest_rotation).unwrap_or(0);
    if degrees != 0 {
        match rotate(&bytes, degrees) {
            Some(rotated) => {
                content_type = "image/png".to_string();
                bytes = rotated;
            }
            None => log::warn!("Could not rotate image by {} degrees", degrees),
        }
    }

    PreparedImage {
        content_type,
        data: STANDARD.encode(bytes),
    }
}

/// Rasterise an EMF at the supersampled display size
///
/// Without a display size the metafile bounds are used. Returns `None` on
/// any failure.
pub fn emf_to_png(data: &[u8], request: &ImageRequest) -> Option<Vec<u8>> {
    let (svg, bounds) = match emf::emf_to_svg(data) {
        Ok(result) => result,
        Err(e) => {
            log::debug!("EMF translation failed: {}", e);
            return None;
        }
    };
    let factor = i64::from(request.supersampling.max(1));
    let width = request.width.filter(|w| *w > 0).unwrap_or(bounds.width()).checked_mul(factor)?;
    let height = request.height.filter(|h| *h > 0).unwrap_or(bounds.height()).checked_mul(factor)?;
    let (width, height) = (u32::try_from(width).ok()?, u32::try_from(height).ok()?);
    if width > MAX_RASTER_SIDE || height > MAX_RASTER_SIDE {
        log::debug!("EMF raster size {}x{} too large", width, height);
        return None;
    }

    match raster::svg_to_png(svg.as_bytes(), width, height) {
        Ok(png) => Some(png),
        Err(e) => {
            log::debug!("EMF rasterisation failed: {}", e);
            None
        }
    }
}

/// Snap a rotation in 60000ths of a degree to 0, 90, 180 or 270
pub fn nearest_rotation(rotation: i64) -> u32 {
    let degrees = (rotation / ROTATION_UNITS_PER_DEGREE).rem_euclid(360);
    (((degrees + 45) / 90 % 4) * 90) as u32
}

/// Rotate a raster image clockwise, re-encoded as PNG
pub fn rotate(bytes: &[u8], degrees: u32) -> Option<Vec<u8>> {
    let image = image::load_from_memory(bytes).ok()?;
    let rotated = match degrees {
        90 => image.rotate90(),
        180 => image.rotate180(),
        270 => image.rotate270(),
        _ => image,
    };
    let mut png = Cursor::new(Vec::new());
    rotated.write_to(&mut png, image::ImageFormat::Png).ok()?;
    Some(png.into_inner())
}

/// The "unknown file" icon as PNG
pub fn placeholder_png() -> Vec<u8> {
    match raster::svg_to_png(PLACEHOLDER_SVG.as_bytes(), PLACEHOLDER_SIZE, PLACEHOLDER_SIZE) {
        Ok(png) => png,
        Err(e) => {
            log::debug!("Placeholder rendering failed: {}", e);
            let gray = image::RgbaImage::from_pixel(
                PLACEHOLDER_SIZE,
                PLACEHOLDER_SIZE,
                image::Rgba([192, 192, 192, 255]),
            );
            let mut png = Cursor::new(Vec::new());
            match image::DynamicImage::ImageRgba8(gray).write_to(&mut png, image::ImageFormat::Png)
            {
                Ok(()) => png.into_inner(),
                Err(_) => Vec::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 255, 255]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn decode(prepared: &PreparedImage) -> image::DynamicImage {
        image::load_from_memory(&STANDARD.decode(&prepared.data).unwrap()).unwrap()
    }

    #[test]
    fn test_nearest_rotation() {
        assert_eq!(nearest_rotation(0), 0);
        assert_eq!(nearest_rotation(5_400_000), 90);
        assert_eq!(nearest_rotation(10_800_000), 180);
        assert_eq!(nearest_rotation(-5_400_000), 270);
        assert_eq!(nearest_rotation(21_000_000), 0);
    }

    #[test]
    fn test_missing_part_yields_placeholder() {
        let prepared = prepare_image(None, &ImageRequest::default());
        assert_eq!(prepared.content_type, "image/png");
        assert_eq!(decode(&prepared).width(), PLACEHOLDER_SIZE);
    }

    #[test]
    fn test_rotation_swaps_dimensions() {
        let part = ImagePart {
            content_type: "image/png".into(),
            bytes: png(4, 2),
        };
        let request = ImageRequest {
            rotation: Some(5_400_000),
            ..ImageRequest::default()
        };
        let rotated = decode(&prepare_image(Some(&part), &request));
        assert_eq!((rotated.width(), rotated.height()), (2, 4));
    }

    #[test]
    fn test_unrotatable_image_is_kept() {
        let part = ImagePart {
            content_type: "image/gif".into(),
            bytes: b"GIF89a".to_vec(),
        };
        let request = ImageRequest {
            rotation: Some(5_400_000),
            ..ImageRequest::default()
        };
        let prepared = prepare_image(Some(&part), &request);
        assert_eq!(prepared.content_type, "image/gif");
        assert_eq!(prepared.data, STANDARD.encode(b"GIF89a"));
    }

    #[test]
    fn test_emf_is_rasterised_supersampled() {
        let part = ImagePart {
            content_type: "image/x-emf".into(),
            bytes: emf::tests::red_rectangle_emf(),
        };
        let request = ImageRequest {
            width: Some(50),
            height: Some(25),
            rotation: None,
            supersampling: 2,
        };
        let prepared = prepare_image(Some(&part), &request);
        assert_eq!(prepared.content_type, "image/png");
        let image = decode(&prepared);
        assert_eq!((image.width(), image.height()), (100, 50));
    }

    #[test]
    fn test_broken_emf_falls_back_to_original_bytes() {
        let part = ImagePart {
            content_type: "image/x-emf".into(),
            bytes: vec![1, 2, 3],
        };
        let prepared = prepare_image(Some(&part), &ImageRequest::default());
        assert_eq!(prepared.content_type, "image/x-emf");
        assert_eq!(prepared.data, STANDARD.encode([1u8, 2, 3]));
    }

    #[test]
    fn test_emf_with_extreme_bounds_keeps_original_bytes() {
        let mut header = Vec::new();
        for value in [i32::MIN, 0, i32::MAX, 9, 0, 0, 1000, 1000] {
            header.extend_from_slice(&value.to_le_bytes());
        }
        header.extend_from_slice(&0x464D_4520u32.to_le_bytes());
        header.resize(80, 0);
        let bytes = emf::tests::record(0x01, &header);
        let part = ImagePart {
            content_type: "image/x-emf".into(),
            bytes: bytes.clone(),
        };
        let prepared = prepare_image(Some(&part), &ImageRequest::default());
        assert_eq!(prepared.content_type, "image/x-emf");
        assert_eq!(prepared.data, STANDARD.encode(&bytes));
    }
}
