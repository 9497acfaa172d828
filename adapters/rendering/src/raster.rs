//! Software rasterizer that turns a [`Scene`] into an RGB pixel buffer.

use crate::{Color, GridPresentation, RenderingError, Scene};

/// RGB pixel buffer with the same size as the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelFrame {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl PixelFrame {
    fn filled(width: u32, height: u32, color: Color) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![color.to_rgb_u8(); len],
        }
    }

    /// Width of the frame in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the frame in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Color of the pixel at the provided position, if it lies inside the frame.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Row-major pixel data.
    #[must_use]
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn put(&mut self, x: i64, y: i64, rgb: [u8; 3]) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let index = self.index(x as u32, y as u32);
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = rgb;
        }
    }

    fn fill_rect(&mut self, x: i64, y: i64, side: i64, color: Color) {
        let rgb = color.to_rgb_u8();
        let x_start = x.max(0);
        let y_start = y.max(0);
        let x_end = (x + side).min(i64::from(self.width));
        let y_end = (y + side).min(i64::from(self.height));
        for py in y_start..y_end {
            for px in x_start..x_end {
                self.put(px, py, rgb);
            }
        }
    }

    fn draw_grid(&mut self, grid: &GridPresentation) {
        let rgb = grid.line_color.to_rgb_u8();
        let step = grid.cell_length as usize;
        for x in (0..self.width).step_by(step) {
            for y in 0..self.height {
                self.put(i64::from(x), i64::from(y), rgb);
            }
        }
        for y in (0..self.height).step_by(step) {
            for x in 0..self.width {
                self.put(i64::from(x), i64::from(y), rgb);
            }
        }
    }
}

/// Paints the scene: background, grid lines every cell, then filled cells.
///
/// A scene without a grid produces a frame holding only the background.
pub fn rasterize(scene: &Scene, background: Color) -> Result<PixelFrame, RenderingError> {
    let width = scene.canvas.width();
    let height = scene.canvas.height();
    if width == 0 || height == 0 {
        return Err(RenderingError::InvalidCanvas { width, height });
    }

    let mut frame = PixelFrame::filled(width, height, background);
    let Some(grid) = scene.grid else {
        return Ok(frame);
    };

    frame.draw_grid(&grid);
    let side = i64::from(grid.cell_length);
    for cell in scene.painted_cells() {
        frame.fill_rect(
            i64::from(cell.column) * side,
            i64::from(cell.row) * side,
            side,
            cell.color,
        );
    }

    Ok(frame)
}
