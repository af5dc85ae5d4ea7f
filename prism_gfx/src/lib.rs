/*!
# Prism GFX

Minimal graphics-device layer over an immediate-mode GPU interface
(OpenGL ES 3 / WebGL2 class).

Calling code describes *what* to draw (a shader program, vertex/index data,
per-frame clear behavior) and the layer issues the call sequences the GPU
interface demands (compile → attach → link → bind, create → upload → bind,
clear-state setup before any draw).

## Architecture

- **GraphicsContext**: trait exposing the GPU primitives; the backend crate
  implements it on top of `glow`, `RecordingContext` implements it in memory
- **RenderDevice**: owns the context and the output surface
- **Pipeline**: two-stage shader program with semantic binding tables
- **RenderBuffer**: immutable vertex or index buffer
- **RenderPass**: per-frame clear description
- **Mesh**: vertex buffers by attribute slot plus an optional index buffer
- **Scene**: per-frame driver owning pipelines and drawables

Every resource borrows the device it was created on and releases its GPU
objects when dropped.
*/

// Internal modules
mod error;
mod config;
pub mod log;
pub mod device;
pub mod resource;
pub mod scene;

// Main prism namespace module
pub mod prism {
    // Error types
    pub use crate::error::{Error, Result, BindingKind};

    // Configuration
    pub use crate::config::{DeviceConfig, UniformNames};

    // Device entry point
    pub use crate::device::RenderDevice;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, set_logger, reset_logger};
    }

    // Render sub-module with the device, context seam and passes
    pub mod render {
        pub use crate::device::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;
