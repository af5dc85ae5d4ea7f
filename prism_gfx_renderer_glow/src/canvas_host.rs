/// CanvasHost - surface host for a named HTML canvas (WebGL2)

use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};
use prism_gfx::prism::render::{GraphicsContext, Resolution, Surface, SurfaceHost};
use prism_gfx::prism::{DeviceConfig, Error, Result};
use prism_gfx::{engine_debug, engine_info};
use crate::GlowContext;

/// Canvas element exposed as a named surface
pub struct CanvasSurface {
    name: String,
    canvas: HtmlCanvasElement,
}

impl CanvasSurface {
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolution(&self) -> Resolution {
        Resolution::new(self.canvas.width(), self.canvas.height())
    }
}

/// Host for the browser: looks canvases up by element id
#[derive(Default)]
pub struct CanvasHost {
    located: Option<HtmlCanvasElement>,
}

impl CanvasHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SurfaceHost for CanvasHost {
    fn locate_surface(&mut self, name: &str) -> Option<Box<dyn Surface>> {
        let document = web_sys::window()?.document()?;
        let element = document.get_element_by_id(name)?;
        let canvas = match element.dyn_into::<HtmlCanvasElement>() {
            Ok(canvas) => canvas,
            Err(_) => {
                engine_debug!("prism::glow", "Element '{}' is not a canvas", name);
                return None;
            }
        };
        self.located = Some(canvas.clone());
        Some(Box::new(CanvasSurface { name: name.to_string(), canvas }))
    }

    fn create_context(
        &mut self,
        surface: &dyn Surface,
        config: &DeviceConfig,
    ) -> Result<Box<dyn GraphicsContext>> {
        let canvas = self.located.take().ok_or_else(|| {
            Error::ContextCreationFailed(format!("canvas '{}' was not located", surface.name()))
        })?;

        let webgl2 = canvas
            .get_context("webgl2")
            .map_err(|e| Error::ContextCreationFailed(format!("{:?}", e)))?
            .ok_or_else(|| Error::ContextCreationFailed("WebGL2 is not supported".to_string()))?
            .dyn_into::<WebGl2RenderingContext>()
            .map_err(|_| {
                Error::ContextCreationFailed("context is not a WebGl2RenderingContext".to_string())
            })?;

        engine_info!(
            "prism::glow",
            "{}: WebGL2 context created on '{}'",
            config.app_name,
            surface.name()
        );
        Ok(Box::new(GlowContext::new(glow::Context::from_webgl2_context(webgl2))?))
    }
}
