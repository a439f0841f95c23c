pub mod renderer;
pub mod surface;

pub use renderer::{PixmapSurface, RendererError};
pub use surface::{NoRedraw, RedrawRequest, Surface, render_frame};
