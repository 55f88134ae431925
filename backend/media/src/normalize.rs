//! Image Normalizer
//!
//! Canonicalizes an uploaded raster image into a JPEG ready for transmission
//! to the vision API. JPEG has no alpha channel, so transparent and palette
//! images are composited onto an opaque white background first.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader, Rgba, RgbaImage, RgbImage};
use tracing::{info, warn};

use streakboard_core::StreakError;

const JPEG_QUALITY: u8 = 95;

/// Convert the image at `path` into a JPEG next to it
/// (`<stem>_converted.jpeg`) and return the new path.
///
/// The file must decode as an image; an undecodable file is a hard rejection
/// (`StreakError::InvalidImage`), surfaced to the uploader as a client error.
/// The pre-conversion file is deleted when its format differed from JPEG;
/// failure to delete is non-fatal.
pub fn normalize_to_jpeg(path: &Path) -> Result<PathBuf, StreakError> {
    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| StreakError::InvalidImage(e.to_string()))?;

    let rgb = flatten_onto_white(img);

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    let jpeg_path = path.with_file_name(format!("{stem}_converted.jpeg"));

    let file = fs::File::create(&jpeg_path)?;
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| StreakError::Conversion(e.to_string()))?;

    info!(
        "[Media] Normalized {} -> {}",
        path.display(),
        jpeg_path.display()
    );

    if !has_jpeg_extension(path) {
        if let Err(e) = fs::remove_file(path) {
            warn!(
                "[Media] Could not remove pre-conversion file {}: {}",
                path.display(),
                e
            );
        }
    }

    Ok(jpeg_path)
}

/// Flatten to 8-bit RGB, compositing any alpha channel over white.
fn flatten_onto_white(img: DynamicImage) -> RgbImage {
    if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        image::imageops::overlay(&mut canvas, &rgba, 0, 0);
        DynamicImage::ImageRgba8(canvas).to_rgb8()
    } else {
        img.to_rgb8()
    }
}

fn has_jpeg_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            e == "jpg" || e == "jpeg"
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    #[test]
    fn converts_rgba_png_to_opaque_jpeg_of_same_size() {
        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("shot.png");
        let rgba = RgbaImage::from_pixel(8, 6, Rgba([200, 10, 10, 128]));
        rgba.save(&png_path).unwrap();

        let jpeg_path = normalize_to_jpeg(&png_path).unwrap();
        assert_eq!(jpeg_path, dir.path().join("shot_converted.jpeg"));

        let out = image::open(&jpeg_path).unwrap();
        assert_eq!(out.dimensions(), (8, 6));
        assert!(!out.color().has_alpha());
    }

    #[test]
    fn deletes_non_jpeg_original_after_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("shot.png");
        RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]))
            .save(&png_path)
            .unwrap();

        normalize_to_jpeg(&png_path).unwrap();
        assert!(!png_path.exists());
    }

    #[test]
    fn keeps_original_when_it_was_already_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let jpg_path = dir.path().join("shot.jpg");
        RgbImage::from_pixel(4, 4, image::Rgb([80, 80, 80]))
            .save(&jpg_path)
            .unwrap();

        let out = normalize_to_jpeg(&jpg_path).unwrap();
        assert!(jpg_path.exists());
        assert_eq!(out, dir.path().join("shot_converted.jpeg"));
    }

    #[test]
    fn rejects_undecodable_files() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("not_an_image.png");
        fs::write(&fake, b"definitely not pixels").unwrap();

        let err = normalize_to_jpeg(&fake).unwrap_err();
        assert!(matches!(err, StreakError::InvalidImage(_)));
        // Hard rejection: the bad file is left alone, nothing was converted.
        assert!(fake.exists());
    }

    #[test]
    fn transparent_pixels_composite_onto_white() {
        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("clear.png");
        RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]))
            .save(&png_path)
            .unwrap();

        let jpeg_path = normalize_to_jpeg(&png_path).unwrap();
        let out = image::open(&jpeg_path).unwrap().to_rgb8();
        let px = out.get_pixel(0, 0);
        // Fully transparent black over white should come out (near) white.
        assert!(px[0] > 240 && px[1] > 240 && px[2] > 240);
    }
}
