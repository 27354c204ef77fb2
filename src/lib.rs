//! Encode text into a QR code symbol and rasterize it as a raw bitmap.
//!
//! The pipeline has two halves: [Encoder] turns bytes into a [ModuleMatrix]
//! (delegating the actual QR symbol construction to an external encoder),
//! and [BitmapRenderer] scales that matrix onto a row-padded pixel buffer.

pub use qrpix_core::{Ecl, Mode, Module, ModuleMatrix, SymbolVersion};
pub use qrpix_encode::{Encoder, EncodingError};
pub use qrpix_render::{BitmapRenderer, CanvasSpec, Layout, PixelBuffer, RasterError};
