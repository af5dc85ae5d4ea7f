/*!
# Prism GFX - glow Backend

OpenGL ES 3 / WebGL2 implementation of the `prism_gfx` GPU context, built on
`glow`.

- **GlowContext**: `GraphicsContext` over a `glow::Context`
- **NativeHost**: exposes a winit window with an existing GL context (native)
- **CanvasHost**: locates an HTML canvas by id and creates a WebGL2 context (wasm32)

# Example

```ignore
use prism_gfx::prism::{DeviceConfig, RenderDevice};
use prism_gfx_renderer_glow::CanvasHost;

let mut host = CanvasHost::new();
let device = RenderDevice::initialize(DeviceConfig::default(), &mut host)?;
```
*/

mod glow_format;
mod glow_context;

#[cfg(not(target_arch = "wasm32"))]
mod native_host;

#[cfg(target_arch = "wasm32")]
mod canvas_host;

pub use glow_context::GlowContext;

#[cfg(not(target_arch = "wasm32"))]
pub use native_host::{NativeHost, WindowSurface};

#[cfg(target_arch = "wasm32")]
pub use canvas_host::{CanvasHost, CanvasSurface};
