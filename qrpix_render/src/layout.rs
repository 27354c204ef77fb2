use std::num::NonZeroUsize;

use crate::RasterError;

/// Requested geometry of the output image. Immutable once built.
#[derive(Debug, Clone)]
pub struct CanvasSpec {
    /// Canvas width in pixels.
    pub width: usize,
    /// Canvas height in pixels.
    pub height: usize,
    /// Bytes written per pixel.
    pub bytes_per_pixel: usize,
    /// Cap on the side of the block painted per module, if any.
    pub max_pixel_scale: Option<NonZeroUsize>,
}

/// Placement of the scaled module grid on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Output pixels per module side.
    pub scale: usize,
    /// Blank border left of the grid.
    pub margin_x: usize,
    /// Blank border above the grid.
    pub margin_y: usize,
}

impl Layout {
    /// Compute the scale and margins placing a grid of `modules` per side on
    /// the canvas described by `spec`.
    ///
    /// The scale is the largest whole number of pixels per module that fits
    /// both axes, clamped to `spec.max_pixel_scale`. The margins center the
    /// grid on each axis independently.
    pub fn compute(spec: &CanvasSpec, modules: usize) -> Result<Self, RasterError> {
        if modules == 0 {
            return Err(RasterError::EmptyMatrix);
        }
        let fit = (spec.width / modules).min(spec.height / modules);
        if fit == 0 {
            return Err(RasterError::CanvasTooSmall {
                width: spec.width,
                height: spec.height,
                modules,
            });
        }
        let scale = match spec.max_pixel_scale {
            Some(cap) => fit.min(cap.get()),
            None => fit,
        };
        Ok(Self {
            scale,
            margin_x: (spec.width - modules * scale) / 2,
            margin_y: (spec.height - modules * scale) / 2,
        })
    }
}
