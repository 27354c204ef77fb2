use qrpix_core::ModuleMatrix;

use crate::{CanvasSpec, Layout, PixelBuffer, RasterError};

/// Renders a module matrix into a raw pixel buffer.
pub struct BitmapRenderer {
    spec: CanvasSpec,
}

impl BitmapRenderer {
    /// Construct a new [BitmapRenderer] drawing onto the canvas described by `spec`.
    pub fn new(spec: CanvasSpec) -> Self {
        Self { spec }
    }

    /// Compute the layout this renderer will use for a grid of `modules` per side.
    pub fn layout(&self, modules: usize) -> Result<Layout, RasterError> {
        Layout::compute(&self.spec, modules)
    }

    /// Render `matrix` into a freshly allocated buffer.
    ///
    /// The buffer starts out blank; one black square of `scale` pixels per
    /// side is painted for every dark module. The layout guarantees the
    /// scaled grid fits the canvas, so every paint lands in bounds.
    pub fn render(&self, matrix: &ModuleMatrix) -> Result<PixelBuffer, RasterError> {
        let layout = self.layout(matrix.size())?;
        let mut buffer =
            PixelBuffer::blank(self.spec.width, self.spec.height, self.spec.bytes_per_pixel);
        for (x, y, module) in matrix.iter() {
            if module.is_dark() {
                buffer.fill_rect(
                    layout.margin_x + x * layout.scale,
                    layout.margin_y + y * layout.scale,
                    layout.scale,
                    layout.scale,
                )?;
            }
        }
        Ok(buffer)
    }
}
