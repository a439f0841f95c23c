//! Drawing and repaint seams between the core and the windowing layer
//!
//! The core never talks to a window directly. It issues redraw requests
//! through [`RedrawRequest`] and paints through [`Surface`], so frames can be
//! produced and inspected without a window system.

use crate::domain::core::{Point, Rgb};
use crate::domain::entity::CircleSnapshot;

/// Something circles can be painted on
pub trait Surface {
    /// Fills the whole surface with `color`
    fn clear(&mut self, color: Rgb);

    /// Draws a solid circle
    fn draw_circle(&mut self, center: Point, radius: i32, color: Rgb);
}

/// "Invalidate and repaint" signal sent by workers
///
/// Implementations must be cheap and must not block; the windowing layer
/// decides when the repaint actually happens.
pub trait RedrawRequest: Send + Sync {
    fn request_redraw(&self);
}

/// Redraw sink that drops every request
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRedraw;

impl RedrawRequest for NoRedraw {
    fn request_redraw(&self) {}
}

/// Paints one frame: background first, then circles in order
pub fn render_frame<S>(surface: &mut S, background: Rgb, circles: &[CircleSnapshot])
where
    S: Surface + ?Sized,
{
    surface.clear(background);
    for circle in circles {
        surface.draw_circle(circle.center, circle.radius, circle.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum DrawCall {
        Clear(Rgb),
        Circle(Point, i32, Rgb),
    }

    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<DrawCall>,
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self, color: Rgb) {
            self.calls.push(DrawCall::Clear(color));
        }

        fn draw_circle(&mut self, center: Point, radius: i32, color: Rgb) {
            self.calls.push(DrawCall::Circle(center, radius, color));
        }
    }

    #[test]
    fn frame_clears_then_draws_in_order() {
        let circles = [
            CircleSnapshot {
                center: Point::new(50, 100),
                radius: 20,
                color: Rgb::RED,
            },
            CircleSnapshot {
                center: Point::new(150, 200),
                radius: 30,
                color: Rgb::GREEN,
            },
        ];

        let mut surface = RecordingSurface::default();
        render_frame(&mut surface, Rgb::WHITE, &circles);

        assert_eq!(
            surface.calls,
            vec![
                DrawCall::Clear(Rgb::WHITE),
                DrawCall::Circle(Point::new(50, 100), 20, Rgb::RED),
                DrawCall::Circle(Point::new(150, 200), 30, Rgb::GREEN),
            ]
        );
    }

    #[test]
    fn empty_scene_only_clears() {
        let mut surface = RecordingSurface::default();
        render_frame(&mut surface, Rgb::BLUE, &[]);
        assert_eq!(surface.calls, vec![DrawCall::Clear(Rgb::BLUE)]);
    }

    #[test]
    fn dyn_surface_is_accepted() {
        let mut recording = RecordingSurface::default();
        let surface: &mut dyn Surface = &mut recording;
        render_frame(surface, Rgb::WHITE, &[]);
        assert_eq!(recording.calls.len(), 1);
    }
}
