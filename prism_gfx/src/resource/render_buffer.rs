/// RenderBuffer - one-shot upload of an immutable numeric array
///
/// The role is fixed at construction and decides both the host element type
/// and the upload encoding:
/// - vertex buffers hold 32-bit floats, `components` per vertex
/// - index buffers hold 16-bit unsigned integers
///
/// There is no update operation; replace the whole buffer instead.

use crate::device::{RenderDevice, BufferId, BufferTarget};
use crate::error::Result;
use crate::resource::AttributeSlot;
use crate::{engine_bail, engine_trace};

/// Role of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferRole {
    /// Per-vertex attribute data with `components` floats per vertex
    Vertex { components: u32 },
    /// 16-bit index data
    Index,
}

/// Host snapshot kept alongside the GPU copy
#[derive(Debug, Clone, PartialEq)]
pub enum BufferData {
    Float(Vec<f32>),
    Index(Vec<u16>),
}

impl BufferData {
    /// Number of scalar elements
    pub fn len(&self) -> usize {
        match self {
            BufferData::Float(values) => values.len(),
            BufferData::Index(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn as_bytes(&self) -> &[u8] {
        match self {
            BufferData::Float(values) => bytemuck::cast_slice(values),
            BufferData::Index(values) => bytemuck::cast_slice(values),
        }
    }
}

/// Immutable GPU buffer
pub struct RenderBuffer<'d> {
    device: &'d RenderDevice,
    buffer: BufferId,
    role: BufferRole,
    data: BufferData,
}

impl<'d> RenderBuffer<'d> {
    /// Upload vertex attribute data (`components` floats per vertex, >= 1)
    pub fn vertex(device: &'d RenderDevice, components: u32, data: Vec<f32>) -> Result<Self> {
        if components == 0 {
            engine_bail!("prism::RenderBuffer", "Vertex buffer needs at least one component per vertex");
        }
        Self::upload(device, BufferRole::Vertex { components }, BufferData::Float(data))
    }

    /// Upload 16-bit index data
    pub fn index(device: &'d RenderDevice, data: Vec<u16>) -> Result<Self> {
        Self::upload(device, BufferRole::Index, BufferData::Index(data))
    }

    fn upload(device: &'d RenderDevice, role: BufferRole, data: BufferData) -> Result<Self> {
        let context = device.context();
        let target = target_for(role);
        let buffer = context.create_buffer()?;

        context.bind_buffer(target, Some(buffer));
        context.buffer_data(target, data.as_bytes());

        engine_trace!(
            "prism::RenderBuffer",
            "Uploaded {:?} buffer ({} elements, {} bytes)",
            role,
            data.len(),
            data.as_bytes().len()
        );

        Ok(Self { device, buffer, role, data })
    }

    /// Source the given attribute slot from this buffer for the next draws
    ///
    /// Layout: `components` floats, not normalized, tightly packed, offset 0.
    pub fn bind_as_attribute(&self, slot: AttributeSlot) -> Result<()> {
        let BufferRole::Vertex { components } = self.role else {
            engine_bail!("prism::RenderBuffer", "Index buffer cannot feed attribute slot {}", slot.index());
        };
        let context = self.device.context();
        context.bind_buffer(BufferTarget::Array, Some(self.buffer));
        context.vertex_attrib_pointer_f32(slot.index(), components as i32, false, 0, 0);
        self.device.enable_attribute(slot.index());
        Ok(())
    }

    /// Use this buffer as the index source of subsequent indexed draws
    pub fn bind_as_index(&self) -> Result<()> {
        if self.role != BufferRole::Index {
            engine_bail!("prism::RenderBuffer", "Vertex buffer cannot be bound as index buffer");
        }
        self.device
            .context()
            .bind_buffer(BufferTarget::ElementArray, Some(self.buffer));
        Ok(())
    }

    pub fn role(&self) -> BufferRole {
        self.role
    }

    /// Components per vertex (None for index buffers)
    pub fn component_count(&self) -> Option<u32> {
        match self.role {
            BufferRole::Vertex { components } => Some(components),
            BufferRole::Index => None,
        }
    }

    /// Number of scalar elements uploaded
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Vertices for a vertex buffer, indices for an index buffer
    pub fn element_count(&self) -> u32 {
        match self.role {
            BufferRole::Vertex { components } => (self.data.len() / components as usize) as u32,
            BufferRole::Index => self.data.len() as u32,
        }
    }

    /// Exact host snapshot that was uploaded
    pub fn data(&self) -> &BufferData {
        &self.data
    }

    /// Context-level buffer handle
    pub fn id(&self) -> BufferId {
        self.buffer
    }
}

impl Drop for RenderBuffer<'_> {
    fn drop(&mut self) {
        self.device.context().delete_buffer(self.buffer);
    }
}

fn target_for(role: BufferRole) -> BufferTarget {
    match role {
        BufferRole::Vertex { .. } => BufferTarget::Array,
        BufferRole::Index => BufferTarget::ElementArray,
    }
}

#[cfg(test)]
#[path = "render_buffer_tests.rs"]
mod tests;
