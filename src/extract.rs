//! Extraction orchestration: turn an uploaded file into text + page count.
//!
//! Two entry points, one per upload kind. Both degrade rather than fail:
//! the upload endpoint never sees an error from this module, only text that
//! may be empty (OCR unavailable / found nothing) or an `Error: ...` payload
//! (rasterisation broke before any page was produced).

use crate::pipeline::ocr::OcrEngine;
use crate::pipeline::preprocess::preprocess_image;
use crate::pipeline::render::rasterize_pages;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// Extract text from a PDF: rasterise every page at `dpi`, then run each
/// page through preprocessing and OCR.
///
/// # Returns
/// `(text, pages)` where text concatenates per-page output delimited by
/// `--- PAGE N ---` markers. If rasterisation fails the text is an
/// `Error: ...` string and the page count is whatever was collected (0).
pub async fn extract_text_from_pdf(ocr: &OcrEngine, pdf_path: &Path, dpi: u32) -> (String, usize) {
    let images = match rasterize_pages(pdf_path, dpi).await {
        Ok(images) => images,
        Err(e) => {
            error!("PDF extraction failed for '{}': {e}", pdf_path.display());
            return (format!("Error: {e}"), 0);
        }
    };

    let pages = images.len();
    let mut text = String::new();

    for (i, image) in images.into_iter().enumerate() {
        let page_text = recognize_page(ocr, image).await;
        text.push_str(&page_block(i + 1, &page_text));
    }

    (text, pages)
}

/// Extract text from a single image upload.
///
/// Preprocesses in place (the cleaned copy is deleted afterwards) and runs
/// one OCR pass. Always reports one page.
pub async fn extract_text_from_image(ocr: &OcrEngine, image_path: &Path) -> (String, usize) {
    let processed = preprocess_blocking(image_path.to_path_buf()).await;
    let text = ocr.recognize(&processed).await;

    if processed != image_path {
        let _ = tokio::fs::remove_file(&processed).await;
    }

    (text, 1)
}

/// Delimited block for one page of extracted text.
fn page_block(page: usize, text: &str) -> String {
    format!("--- PAGE {page} ---\n{text}\n\n")
}

/// One rendered PDF page: write to a temp PNG, preprocess, OCR, clean up.
async fn recognize_page(ocr: &OcrEngine, image: DynamicImage) -> String {
    // The OCR subprocess needs a file on disk; tempfile removes it on drop.
    let tmp = match tempfile::Builder::new().suffix(".png").tempfile() {
        Ok(t) => t,
        Err(e) => {
            error!("could not create page temp file: {e}");
            return String::new();
        }
    };
    let tmp_path = tmp.path().to_path_buf();

    let save_path = tmp_path.clone();
    let saved = tokio::task::spawn_blocking(move || image.save(&save_path)).await;
    match saved {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!("could not write page bitmap: {e}");
            return String::new();
        }
        Err(e) => {
            error!("page save task panicked: {e}");
            return String::new();
        }
    }

    let processed = preprocess_blocking(tmp_path.clone()).await;
    let text = ocr.recognize(&processed).await;

    // Temp page is removed when `tmp` drops; the processed copy is ours.
    if processed != tmp_path {
        if let Err(e) = tokio::fs::remove_file(&processed).await {
            warn!("could not remove '{}': {e}", processed.display());
        }
    }

    text
}

/// Run the CPU-bound preprocessing pass off the async workers.
async fn preprocess_blocking(path: PathBuf) -> PathBuf {
    let original = path.clone();
    match tokio::task::spawn_blocking(move || preprocess_image(&path)).await {
        Ok(processed) => processed,
        Err(e) => {
            error!("preprocess task panicked: {e}");
            original
        }
    }
}
