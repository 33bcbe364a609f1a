//! PDF rasterisation: render every page to a `DynamicImage` via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto the blocking
//! thread pool so the async workers never stall on CPU-heavy rendering.

use crate::error::PipelineError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// PDF user-space unit: 72 points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Rasterise all pages of a PDF at the given DPI.
///
/// # Returns
/// One image per page, in page order.
pub async fn rasterize_pages(
    pdf_path: &Path,
    dpi: u32,
) -> Result<Vec<DynamicImage>, PipelineError> {
    let path = pdf_path.to_path_buf();

    tokio::task::spawn_blocking(move || rasterize_pages_blocking(&path, dpi))
        .await
        .map_err(|e| PipelineError::Internal(format!("render task panicked: {e}")))?
}

/// Blocking implementation of page rendering.
fn rasterize_pages_blocking(pdf_path: &Path, dpi: u32) -> Result<Vec<DynamicImage>, PipelineError> {
    let pdfium = Pdfium::default();

    let document =
        pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| PipelineError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

    let pages = document.pages();
    info!("PDF loaded: {} pages", pages.len());

    let mut results = Vec::with_capacity(pages.len() as usize);

    for (idx, page) in pages.iter().enumerate() {
        // Scale the page's physical size (points) up to the target DPI.
        let width_px = (page.width().value * dpi as f32 / POINTS_PER_INCH) as i32;
        let height_px = (page.height().value * dpi as f32 / POINTS_PER_INCH) as i32;

        let render_config = PdfRenderConfig::new()
            .set_target_width(width_px)
            .set_maximum_height(height_px);

        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| PipelineError::RenderFailed {
                    page: idx + 1,
                    detail: format!("{e:?}"),
                })?;

        let image = bitmap.as_image();
        debug!("rendered page {} -> {}x{} px", idx + 1, image.width(), image.height());
        results.push(image);
    }

    Ok(results)
}
