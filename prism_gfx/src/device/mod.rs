/// Device module - GPU context seam, surface, device and clear passes

// Module declarations
pub mod graphics_context;
pub mod surface;
pub mod render_device;
pub mod render_pass;
pub mod recording_context;

// Re-export everything from graphics_context.rs
pub use graphics_context::*;

// Re-export from other modules
pub use surface::*;
pub use render_device::*;
pub use render_pass::*;
pub use recording_context::*;
