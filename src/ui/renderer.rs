//! Software frame rendering with tiny-skia
//!
//! `PixmapSurface` implements [`Surface`] on top of a tiny-skia pixmap. The
//! platform layer blits the finished pixmap to the window in one call, which
//! keeps repaints flicker-free.

use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::domain::core::{Point, Rect, Rgb};
use crate::ui::surface::Surface;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Failed to create {width}x{height} pixmap for rendering")]
    PixmapCreationFailed { width: u32, height: u32 },
}

/// Off-screen surface backed by a tiny-skia pixmap
#[derive(Debug, Clone)]
pub struct PixmapSurface {
    pixmap: Pixmap,
}

impl PixmapSurface {
    /// Create a surface of the given size
    pub fn new(width: u32, height: u32) -> Result<Self, RendererError> {
        let pixmap = Pixmap::new(width, height)
            .ok_or(RendererError::PixmapCreationFailed { width, height })?;
        Ok(Self { pixmap })
    }

    /// Reallocates the pixmap if the size changed
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RendererError> {
        if self.width() != width || self.height() != height {
            *self = Self::new(width, height)?;
        }
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Color of a single pixel, `None` outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        // tiny-skia only checks the flat index, so x past the row end would wrap
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let pixel = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgb::new(pixel.red(), pixel.green(), pixel.blue()))
    }

    /// Pixel data in the BGRA byte order GDI expects for 32-bit DIBs
    pub fn to_bgra(&self) -> Vec<u8> {
        let mut data = self.pixmap.data().to_vec();
        for pixel in data.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
        data
    }

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width() as i32, self.height() as i32)
    }
}

fn to_skia(color: Rgb) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, 255)
}

impl Surface for PixmapSurface {
    fn clear(&mut self, color: Rgb) {
        self.pixmap.fill(to_skia(color));
    }

    fn draw_circle(&mut self, center: Point, radius: i32, color: Rgb) {
        if radius <= 0 || !self.bounds().intersects(&Rect::around(center, radius)) {
            return;
        }

        let mut path_builder = PathBuilder::new();
        path_builder.push_circle(center.x as f32, center.y as f32, radius as f32);

        if let Some(path) = path_builder.finish() {
            let mut paint = Paint::default();
            paint.set_color(to_skia(color));
            paint.anti_alias = true;

            self.pixmap.fill_path(
                &path,
                &paint,
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }
}
