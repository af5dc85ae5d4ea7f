/// Output surface and the host hook that locates it

use crate::config::DeviceConfig;
use crate::device::GraphicsContext;
use crate::error::Result;

/// Surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, 1.0 when the surface has no height
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Presentation target the context draws into
pub trait Surface {
    /// Name the host located the surface by
    fn name(&self) -> &str;

    /// Current drawable size
    fn resolution(&self) -> Resolution;
}

/// Host environment: finds the named surface and creates its GPU context
///
/// Implemented by backends (e.g. canvas lookup on the web, an existing window
/// natively) and by [`MockHost`](crate::device::MockHost) for tests.
pub trait SurfaceHost {
    /// Locate the named output surface, `None` if the host has no such surface
    fn locate_surface(&mut self, name: &str) -> Option<Box<dyn Surface>>;

    /// Create the GPU context for a located surface
    fn create_context(
        &mut self,
        surface: &dyn Surface,
        config: &DeviceConfig,
    ) -> Result<Box<dyn GraphicsContext>>;
}
