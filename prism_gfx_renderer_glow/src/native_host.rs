/// NativeHost - surface host for a winit window with an existing GL context
///
/// Window and context creation belong to the application (glutin, SDL, ...);
/// the host only exposes the window under a name and hands the context over
/// to the device once.

use std::sync::Arc;
use winit::window::Window;
use prism_gfx::prism::render::{GraphicsContext, Resolution, Surface, SurfaceHost};
use prism_gfx::prism::{DeviceConfig, Error, Result};
use prism_gfx::engine_info;
use crate::GlowContext;

/// winit window exposed as a named surface
pub struct WindowSurface {
    name: String,
    window: Arc<Window>,
}

impl Surface for WindowSurface {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolution(&self) -> Resolution {
        let size = self.window.inner_size();
        Resolution::new(size.width, size.height)
    }
}

/// Host for native targets
pub struct NativeHost {
    surface_name: String,
    window: Arc<Window>,
    gl: Option<glow::Context>,
}

impl NativeHost {
    /// Expose `window` as surface `surface_name`, rendering through `gl`
    ///
    /// `gl` must be current on the calling thread for the window.
    pub fn new(surface_name: &str, window: Arc<Window>, gl: glow::Context) -> Self {
        Self {
            surface_name: surface_name.to_string(),
            window,
            gl: Some(gl),
        }
    }
}

impl SurfaceHost for NativeHost {
    fn locate_surface(&mut self, name: &str) -> Option<Box<dyn Surface>> {
        if name != self.surface_name {
            return None;
        }
        Some(Box::new(WindowSurface {
            name: self.surface_name.clone(),
            window: Arc::clone(&self.window),
        }))
    }

    fn create_context(
        &mut self,
        surface: &dyn Surface,
        config: &DeviceConfig,
    ) -> Result<Box<dyn GraphicsContext>> {
        let gl = self.gl.take().ok_or_else(|| {
            Error::ContextCreationFailed("GL context already handed to a device".to_string())
        })?;
        engine_info!(
            "prism::glow",
            "{}: using native GL context for '{}'",
            config.app_name,
            surface.name()
        );
        Ok(Box::new(GlowContext::new(gl)?))
    }
}
