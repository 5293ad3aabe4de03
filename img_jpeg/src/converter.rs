//! Codec Adapter
//!
//! One call per task: decode the source (libheif for HEIC/HEIF, the `image`
//! crate for everything else), normalize to 8-bit RGB, encode a JPEG at the
//! configured quality, carry metadata forward, then delete the original
//! unless the run keeps it.
//!
//! The destination is written through a temp file in the same directory and
//! renamed into place, so a failed decode or encode never leaves a partial
//! destination behind. The original is only removed after the destination
//! has been written and verified — never delete-before-write.
//!
//! Every error is caught at this boundary and folded into a
//! `ConversionOutcome::Failure`; nothing unwinds into the worker pool.

use crate::config::RunConfig;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};
use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};
use shared_utils::{ConversionOutcome, ConversionTask};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Extension swapped into every destination path.
pub const TARGET_EXTENSION: &str = "jpg";

const HEIC_EXTENSIONS: &[&str] = &["heic", "heif"];

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Failed to read image: {0}")]
    ImageRead(String),

    #[error("Failed to write destination: {0}")]
    DestinationWrite(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// Execute one conversion task. Never panics, never returns an error:
/// every failure becomes a `Failure` outcome so one bad file cannot halt
/// the batch.
pub fn convert_task(task: &ConversionTask, config: &RunConfig) -> ConversionOutcome {
    match convert_inner(task, config) {
        Ok(()) => {
            tracing::info!(
                source = %task.source.display(),
                destination = %task.destination.display(),
                "converted"
            );
            ConversionOutcome::Success {
                source: task.source.clone(),
                destination: task.destination.clone(),
            }
        }
        Err(e) => {
            tracing::warn!(
                source = %task.source.display(),
                error = %e,
                "conversion failed"
            );
            ConversionOutcome::Failure {
                source: task.source.clone(),
                reason: e.to_string(),
            }
        }
    }
}

fn convert_inner(task: &ConversionTask, config: &RunConfig) -> Result<(), ConvertError> {
    let decoded = decode_image(&task.source)?;

    // HEIC is often YCbCr or 10-bit; JPEG output is 8-bit truecolor.
    let rgb = match decoded {
        DynamicImage::ImageRgb8(img) => img,
        other => other.to_rgb8(),
    };

    write_jpeg(&rgb, &task.destination, config.quality)?;

    // Best-effort: pixels are on disk, a metadata copy problem is not a
    // failed conversion.
    if let Err(e) = shared_utils::copy_exif_metadata(&task.source, &task.destination) {
        tracing::warn!(
            source = %task.source.display(),
            error = %e,
            "embedded metadata not carried over"
        );
    }
    if let Err(e) = shared_utils::copy_file_times(&task.source, &task.destination) {
        tracing::warn!(
            source = %task.source.display(),
            error = %e,
            "timestamps not carried over"
        );
    }

    if !config.keep_originals {
        verify_destination(&task.destination)?;
        std::fs::remove_file(&task.source)?;
    }

    Ok(())
}

fn is_heic(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| HEIC_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn decode_image(path: &Path) -> Result<DynamicImage, ConvertError> {
    if is_heic(path) {
        decode_heic(path)
    } else {
        Ok(image::open(path)?)
    }
}

fn decode_heic(path: &Path) -> Result<DynamicImage, ConvertError> {
    let lib_heif = LibHeif::new();

    let ctx = HeifContext::read_from_file(path.to_string_lossy().as_ref())
        .map_err(|e| ConvertError::ImageRead(format!("Failed to read HEIC: {}", e)))?;

    let handle = ctx
        .primary_image_handle()
        .map_err(|e| ConvertError::ImageRead(format!("Failed to get primary image: {}", e)))?;

    let decoded = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(|e| ConvertError::ImageRead(format!("Failed to decode HEIC: {}", e)))?;

    let planes = decoded.planes();
    let plane = planes
        .interleaved
        .ok_or_else(|| ConvertError::ImageRead("No interleaved RGB plane found".to_string()))?;

    let width = plane.width;
    let height = plane.height;

    // The plane stride can exceed width * 3; copy row by row.
    let row_bytes = width as usize * 3;
    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * plane.stride;
        pixels.extend_from_slice(&plane.data[start..start + row_bytes]);
    }

    RgbImage::from_raw(width, height, pixels)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| ConvertError::ImageRead("Failed to assemble RGB image".to_string()))
}

/// Encode into a temp file beside the destination, then rename into place.
fn write_jpeg(rgb: &RgbImage, destination: &Path, quality: u8) -> Result<(), ConvertError> {
    let parent = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::Builder::new()
        .prefix(".img_jpeg-")
        .suffix(".tmp")
        .tempfile_in(parent)?;

    {
        let mut writer = std::io::BufWriter::new(tmp.as_file_mut());
        let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);
        encoder.encode_image(rgb)?;
        writer.flush()?;
    }

    tmp.persist(destination)
        .map_err(|e| ConvertError::Io(e.error))?;

    Ok(())
}

/// Destination integrity check before the original is removed.
fn verify_destination(path: &Path) -> Result<(), ConvertError> {
    let meta = std::fs::metadata(path).map_err(|e| {
        ConvertError::DestinationWrite(format!("{}: {}", path.display(), e))
    })?;
    if meta.len() == 0 {
        return Err(ConvertError::DestinationWrite(format!(
            "{}: destination file is empty",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// A patterned image so JPEG quality actually affects output size.
    fn write_test_png(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([
                (x * 7 % 256) as u8,
                (y * 13 % 256) as u8,
                ((x ^ y) * 31 % 256) as u8,
            ])
        });
        img.save(path).unwrap();
    }

    fn task_for(src: &Path) -> ConversionTask {
        ConversionTask::new(src.to_path_buf(), src.with_extension(TARGET_EXTENSION))
    }

    fn config_for(root: &Path) -> RunConfig {
        RunConfig::new(root.to_path_buf())
    }

    #[test]
    fn test_success_creates_destination_and_removes_source() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("photo.png");
        write_test_png(&src, 32, 32);

        let task = task_for(&src);
        let outcome = convert_task(&task, &config_for(temp.path()));

        assert!(outcome.is_success(), "{:?}", outcome);
        assert!(task.destination.exists());
        assert!(!src.exists(), "source must be removed by default");

        // The destination is a decodable JPEG.
        let reread = image::open(&task.destination).unwrap();
        assert_eq!(reread.width(), 32);
        assert_eq!(reread.height(), 32);
    }

    #[test]
    fn test_keep_originals_leaves_source() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("photo.png");
        write_test_png(&src, 16, 16);

        let mut config = config_for(temp.path());
        config.keep_originals = true;

        let task = task_for(&src);
        let outcome = convert_task(&task, &config);

        assert!(outcome.is_success());
        assert!(src.exists());
        assert!(task.destination.exists());
    }

    #[test]
    fn test_corrupt_source_fails_without_side_effects() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("broken.png");
        fs::write(&src, b"this is not an image at all").unwrap();

        let task = task_for(&src);
        let outcome = convert_task(&task, &config_for(temp.path()));

        assert!(!outcome.is_success());
        assert!(src.exists(), "failed source must be left untouched");
        assert!(
            !task.destination.exists(),
            "no destination may exist after a failed conversion"
        );
        // No temp leftovers either.
        let leftovers = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".img_jpeg-"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_missing_source_is_a_failure_outcome() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("gone.png");

        let outcome = convert_task(&task_for(&src), &config_for(temp.path()));
        match outcome {
            ConversionOutcome::Failure { source, reason } => {
                assert_eq!(source, src);
                assert!(!reason.is_empty());
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_quality_forwarded_to_encoder() {
        let temp = TempDir::new().unwrap();
        let low_src = temp.path().join("low.png");
        let high_src = temp.path().join("high.png");
        write_test_png(&low_src, 64, 64);
        write_test_png(&high_src, 64, 64);

        let mut low_config = config_for(temp.path());
        low_config.quality = 5;
        low_config.keep_originals = true;
        let mut high_config = low_config.clone();
        high_config.quality = 95;

        let low_task = task_for(&low_src);
        let high_task = task_for(&high_src);
        assert!(convert_task(&low_task, &low_config).is_success());
        assert!(convert_task(&high_task, &high_config).is_success());

        let low_size = fs::metadata(&low_task.destination).unwrap().len();
        let high_size = fs::metadata(&high_task.destination).unwrap().len();
        assert!(
            low_size < high_size,
            "quality 5 output ({} bytes) should be smaller than quality 95 ({} bytes)",
            low_size,
            high_size
        );
    }

    #[test]
    fn test_rgba_source_normalized_to_rgb() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("alpha.png");
        let img = image::RgbaImage::from_fn(8, 8, |x, y| {
            image::Rgba([x as u8 * 30, y as u8 * 30, 128, 100])
        });
        img.save(&src).unwrap();

        let task = task_for(&src);
        let outcome = convert_task(&task, &config_for(temp.path()));

        assert!(outcome.is_success(), "{:?}", outcome);
        let reread = image::open(&task.destination).unwrap();
        assert_eq!(reread.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_is_heic() {
        assert!(is_heic(Path::new("a.heic")));
        assert!(is_heic(Path::new("a.HEIF")));
        assert!(!is_heic(Path::new("a.png")));
        assert!(!is_heic(Path::new("noext")));
    }
}
