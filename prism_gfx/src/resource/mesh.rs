/// Mesh - vertex buffers keyed by attribute slot, an optional index buffer
/// and a world position.
///
/// `bind` binds every attribute buffer in slot order, then the index buffer.
/// `draw` issues one indexed draw over all indices when an index buffer is
/// present, otherwise one non-indexed draw sized from the lowest-slot buffer.

use std::collections::BTreeMap;
use glam::Vec3;
use crate::device::RenderDevice;
use crate::error::Result;
use crate::resource::{AttributeSlot, RenderBuffer};
use crate::{engine_debug, engine_trace};

pub struct Mesh<'d> {
    device: &'d RenderDevice,
    attributes: BTreeMap<AttributeSlot, RenderBuffer<'d>>,
    indices: Option<RenderBuffer<'d>>,
    position: Vec3,
}

impl<'d> Mesh<'d> {
    /// Empty mesh at the origin
    pub fn new(device: &'d RenderDevice) -> Self {
        Self {
            device,
            attributes: BTreeMap::new(),
            indices: None,
            position: Vec3::ZERO,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Upload `data` (`components` floats per vertex) and feed `slot` from it
    ///
    /// A buffer already registered at `slot` is replaced and released.
    pub fn add_attribute(&mut self, slot: AttributeSlot, components: u32, data: Vec<f32>) -> Result<()> {
        let buffer = RenderBuffer::vertex(self.device, components, data)?;
        if self.attributes.insert(slot, buffer).is_some() {
            engine_debug!("prism::Mesh", "Replaced attribute buffer at slot {}", slot);
        }
        Ok(())
    }

    /// Upload the mesh's indices, replacing any previous index buffer
    pub fn add_indices(&mut self, indices: Vec<u16>) -> Result<()> {
        let buffer = RenderBuffer::index(self.device, indices)?;
        if self.indices.replace(buffer).is_some() {
            engine_debug!("prism::Mesh", "Replaced index buffer");
        }
        Ok(())
    }

    /// Bind every attribute buffer to its slot, then the index buffer
    ///
    /// Slots left enabled by a previously bound mesh that this mesh does not
    /// feed are disabled first.
    pub fn bind(&self) -> Result<()> {
        self.device
            .disable_attributes_except(|slot| self.attributes.contains_key(&AttributeSlot::new(slot)));
        for (slot, buffer) in &self.attributes {
            buffer.bind_as_attribute(*slot)?;
        }
        if let Some(indices) = &self.indices {
            indices.bind_as_index()?;
        }
        Ok(())
    }

    /// Issue this mesh's draw call
    ///
    /// Returns `false` without issuing anything when the mesh has no buffers.
    pub fn draw(&self) -> bool {
        if let Some(indices) = &self.indices {
            self.device.draw_indexed(0, indices.element_count());
            return true;
        }

        match self.attributes.values().next() {
            Some(buffer) => {
                self.device.draw(0, buffer.element_count());
                true
            }
            None => {
                engine_trace!("prism::Mesh", "Empty mesh, nothing to draw");
                false
            }
        }
    }

    /// Vertex buffer registered at `slot`
    pub fn attribute(&self, slot: AttributeSlot) -> Option<&RenderBuffer<'d>> {
        self.attributes.get(&slot)
    }

    pub fn indices(&self) -> Option<&RenderBuffer<'d>> {
        self.indices.as_ref()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Vertices in the lowest-slot attribute buffer (0 if there is none)
    pub fn vertex_count(&self) -> u32 {
        self.attributes
            .values()
            .next()
            .map(RenderBuffer::element_count)
            .unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
