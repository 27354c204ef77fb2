mod buffer;
mod layout;
mod render;

pub use buffer::PixelBuffer;
pub use layout::{CanvasSpec, Layout};
pub use render::BitmapRenderer;

/// Errors raised while rasterizing a module matrix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RasterError {
    #[error("module matrix is empty")]
    EmptyMatrix,
    #[error("canvas {width}x{height} cannot fit {modules} modules per side")]
    CanvasTooSmall {
        width: usize,
        height: usize,
        modules: usize,
    },
    #[error("rectangle {w}x{h} at ({x}, {y}) falls outside the {width}x{height} canvas")]
    OutOfBounds {
        x: usize,
        y: usize,
        w: usize,
        h: usize,
        width: usize,
        height: usize,
    },
}
