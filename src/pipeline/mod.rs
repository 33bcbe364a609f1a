//! The OCR pipeline: rasterise → preprocess → recognise.
//!
//! Each stage is a leaf module with a narrow contract:
//!
//! - [`render`] turns PDF pages into bitmaps (pdfium, `spawn_blocking`)
//! - [`preprocess`] cleans a scan for recognition (grayscale, denoise,
//!   threshold, morphological close) and falls back to the untouched input
//!   on any failure
//! - [`ocr`] runs the tesseract subprocess under a time budget and degrades
//!   to empty text on any failure
//!
//! Orchestration across stages lives in [`crate::extract`].

pub mod ocr;
pub mod preprocess;
pub mod render;
