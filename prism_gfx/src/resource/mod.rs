//! Resource module
//!
//! GPU resources created on a `RenderDevice`: shader pipelines, immutable
//! buffers and meshes. Each one borrows the device and releases its GPU
//! objects when dropped.

pub mod binding_table;
pub mod render_buffer;
pub mod pipeline;
pub mod mesh;

pub use binding_table::{AttributeSlot, BindingTable};
pub use render_buffer::{RenderBuffer, BufferRole, BufferData};
pub use pipeline::{Pipeline, PipelineState, ShaderSources};
pub use mesh::Mesh;
