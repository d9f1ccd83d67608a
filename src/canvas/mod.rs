//! Drawing surface and normalization pipeline.
//!
//! This module provides:
//! - Coordinate-unified pointer events (mouse or touch)
//! - An in-memory stroke surface at capture resolution
//! - Downsampling to the canonical 28x28 grayscale sample
//! - Stroke trace files for headless replay

pub mod event;
pub mod rasterize;
pub mod surface;
pub mod trace;

pub use event::{PointerEvent, PointerPhase};
pub use surface::StrokeSurface;
