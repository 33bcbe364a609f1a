//! Scan cleanup before OCR.
//!
//! Four passes, in order: grayscale, median-filter denoise, fixed binary
//! threshold at 150, morphological close with a small kernel. The close
//! re-joins character strokes that thresholding tends to break apart.
//!
//! The contract is deliberately forgiving: preprocessing can only *improve*
//! recognition, so any failure (unreadable file, encode error) logs and
//! returns the original path unchanged rather than failing the page.

use crate::error::PipelineError;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::median_filter;
use imageproc::morphology::close;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Binarisation cutoff: pixels above become white, the rest black.
const THRESHOLD: u8 = 150;

/// Clean an image for OCR, writing the result to `<stem>_processed.png`
/// alongside the input and returning that path.
///
/// On any failure the original path is returned unchanged — the caller
/// cannot tell the difference and should not need to. CPU-bound; call from
/// `spawn_blocking` in async contexts.
pub fn preprocess_image(path: &Path) -> PathBuf {
    match run(path) {
        Ok(out) => {
            debug!("preprocessed {} -> {}", path.display(), out.display());
            out
        }
        Err(e) => {
            error!("image preprocessing failed, using original: {e}");
            path.to_path_buf()
        }
    }
}

fn run(path: &Path) -> Result<PathBuf, PipelineError> {
    let img = image::open(path).map_err(|e| PipelineError::Preprocess {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let gray = img.to_luma8();
    let denoised = median_filter(&gray, 1, 1);
    let binary = binarize(&denoised, THRESHOLD);
    let closed = close(&binary, Norm::LInf, 1);

    let out = processed_path(path);
    DynamicImage::ImageLuma8(closed)
        .save(&out)
        .map_err(|e| PipelineError::Preprocess {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
    Ok(out)
}

/// Fixed binary threshold.
fn binarize(img: &GrayImage, threshold: u8) -> GrayImage {
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        *pixel = if pixel[0] > threshold {
            Luma([255u8])
        } else {
            Luma([0u8])
        };
    }
    out
}

/// Derive the output path: `scan.png` becomes `scan_processed.png`.
fn processed_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    path.with_file_name(format!("{stem}_processed.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(dir: &Path) -> PathBuf {
        let mut img = GrayImage::new(32, 32);
        for (x, y, p) in img.enumerate_pixels_mut() {
            *p = if (x + y) % 2 == 0 { Luma([200]) } else { Luma([40]) };
        }
        let path = dir.join("board.png");
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn writes_processed_file_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = checkerboard(dir.path());
        let out = preprocess_image(&input);
        assert_eq!(out, dir.path().join("board_processed.png"));
        assert!(out.exists());
    }

    #[test]
    fn output_is_pure_black_and_white() {
        let dir = tempfile::tempdir().unwrap();
        let input = checkerboard(dir.path());
        let out = preprocess_image(&input);
        let img = image::open(&out).unwrap().to_luma8();
        assert!(img.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn unreadable_input_falls_back_to_original_path() {
        let missing = Path::new("/nonexistent/scan.png");
        let out = preprocess_image(missing);
        assert_eq!(out, missing.to_path_buf());
    }

    #[test]
    fn binarize_splits_on_threshold() {
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, Luma([THRESHOLD]));
        img.put_pixel(1, 0, Luma([THRESHOLD + 1]));
        let out = binarize(&img, THRESHOLD);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(1, 0)[0], 255);
    }
}
