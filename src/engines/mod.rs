//! Recognition backends
//!
//! Implementations of the `Recognizer` trait. Tesseract is driven as an
//! external executable so its location stays user-configurable.

pub mod tesseract;

pub use tesseract::TesseractEngine;
