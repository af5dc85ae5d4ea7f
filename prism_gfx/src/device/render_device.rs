/// RenderDevice - owns the GPU context and the output surface
///
/// Created once at startup. Every other entity of the layer borrows it and
/// issues its GPU work through it.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use glam::Mat4;
use crate::config::DeviceConfig;
use crate::device::{
    GraphicsContext, Surface, SurfaceHost, Resolution,
    Primitive, IndexFormat, UniformId,
};
use crate::error::{Error, Result};
use crate::{engine_debug, engine_err, engine_info, engine_trace, engine_warn};

/// Uniform handle resolved against a linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformHandle(pub(crate) UniformId);

impl UniformHandle {
    /// Raw context-level location
    pub fn location(&self) -> UniformId {
        self.0
    }
}

/// Per-device counters, reset by the caller at frame start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Number of draw calls issued
    pub draw_calls: u32,
    /// Number of triangles submitted
    pub triangles: u32,
    /// Number of clear calls issued
    pub clears: u32,
}

/// Render device
pub struct RenderDevice {
    config: DeviceConfig,
    // Declared before `surface` so the context is torn down first.
    context: Box<dyn GraphicsContext>,
    surface: Box<dyn Surface>,
    stats: Cell<RenderStats>,
    /// Attribute slots currently enabled on the context
    enabled_attributes: RefCell<BTreeSet<u32>>,
}

impl RenderDevice {
    /// Locate the output surface and create its GPU context
    ///
    /// # Errors
    ///
    /// - `Error::SurfaceNotFound` if the host has no surface named `config.surface_name`
    /// - `Error::ContextCreationFailed` if the host cannot create a context for it
    ///
    /// Both are fatal: the caller is expected to abort startup.
    pub fn initialize(config: DeviceConfig, host: &mut dyn SurfaceHost) -> Result<Self> {
        let surface = host.locate_surface(&config.surface_name).ok_or_else(|| {
            engine_err!(
                "prism::RenderDevice",
                Error::SurfaceNotFound(config.surface_name.clone())
            )
        })?;

        let context = host
            .create_context(surface.as_ref(), &config)
            .map_err(|e| {
                let msg = match e {
                    Error::ContextCreationFailed(msg) => msg,
                    other => other.to_string(),
                };
                engine_err!("prism::RenderDevice", Error::ContextCreationFailed(msg))
            })?;

        let resolution = surface.resolution();
        engine_info!(
            "prism::RenderDevice",
            "{}: device initialized on '{}' ({}x{})",
            config.app_name,
            surface.name(),
            resolution.width,
            resolution.height
        );

        Ok(Self {
            config,
            context,
            surface,
            stats: Cell::new(RenderStats::default()),
            enabled_attributes: RefCell::new(BTreeSet::new()),
        })
    }

    /// Device configuration
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Name of the output surface
    pub fn surface_name(&self) -> &str {
        self.surface.name()
    }

    /// Current surface size
    pub fn resolution(&self) -> Resolution {
        self.surface.resolution()
    }

    /// Current surface width over height
    pub fn aspect_ratio(&self) -> f32 {
        self.resolution().aspect_ratio()
    }

    /// Non-indexed draw over `vertex_count` vertices from `offset`, as a triangle strip
    ///
    /// Skipped with a warning when either value does not fit the GL range.
    pub fn draw(&self, offset: u32, vertex_count: u32) {
        engine_trace!("prism::RenderDevice", "draw(offset={}, count={})", offset, vertex_count);
        let (Ok(first), Ok(count)) = (i32::try_from(offset), i32::try_from(vertex_count)) else {
            engine_warn!(
                "prism::RenderDevice",
                "draw(offset={}, count={}) out of GL range, skipped",
                offset,
                vertex_count
            );
            return;
        };
        self.context.draw_arrays(Primitive::TriangleStrip, first, count);
        self.record_draw(vertex_count.saturating_sub(2));
        self.validate("draw");
    }

    /// Indexed draw of `index_count` 16-bit indices from index `offset`, as a triangle list
    ///
    /// Skipped with a warning when the count or the byte offset does not fit
    /// the GL range.
    pub fn draw_indexed(&self, offset: u32, index_count: u32) {
        engine_trace!(
            "prism::RenderDevice",
            "draw_indexed(offset={}, count={})",
            offset,
            index_count
        );
        let format = IndexFormat::U16;
        let byte_offset = offset
            .checked_mul(format.size_bytes())
            .and_then(|bytes| i32::try_from(bytes).ok());
        let (Some(byte_offset), Ok(count)) = (byte_offset, i32::try_from(index_count)) else {
            engine_warn!(
                "prism::RenderDevice",
                "draw_indexed(offset={}, count={}) out of GL range, skipped",
                offset,
                index_count
            );
            return;
        };
        self.context
            .draw_elements(Primitive::Triangles, count, format, byte_offset);
        self.record_draw(index_count / 3);
        self.validate("draw_indexed");
    }

    /// Write a 4x4 matrix into a uniform of the currently bound program
    ///
    /// The result is undefined if no program is bound.
    pub fn upload_matrix4(&self, handle: UniformHandle, matrix: &Mat4, transpose: bool) {
        self.context
            .uniform_matrix4(handle.location(), transpose, &matrix.to_cols_array());
    }

    /// Counters since the last `reset_stats`
    pub fn stats(&self) -> RenderStats {
        self.stats.get()
    }

    /// Zero the counters
    pub fn reset_stats(&self) {
        self.stats.set(RenderStats::default());
    }

    pub(crate) fn record_clear(&self) {
        let mut stats = self.stats.get();
        stats.clears += 1;
        self.stats.set(stats);
    }

    fn record_draw(&self, triangles: u32) {
        let mut stats = self.stats.get();
        stats.draw_calls += 1;
        stats.triangles += triangles;
        self.stats.set(stats);
    }

    fn validate(&self, call: &str) {
        if !self.config.enable_validation {
            return;
        }
        while let Some(code) = self.context.take_error() {
            engine_warn!(
                "prism::RenderDevice",
                "{} on '{}' raised GL error 0x{:04X}",
                call,
                self.surface.name(),
                code
            );
        }
    }

    /// Enable `slot` for subsequent draws
    pub(crate) fn enable_attribute(&self, slot: u32) {
        self.context.enable_vertex_attrib_array(slot);
        self.enabled_attributes.borrow_mut().insert(slot);
    }

    /// Disable every enabled attribute slot for which `keep` returns false
    pub(crate) fn disable_attributes_except(&self, keep: impl Fn(u32) -> bool) {
        self.enabled_attributes.borrow_mut().retain(|slot| {
            if keep(*slot) {
                return true;
            }
            self.context.disable_vertex_attrib_array(*slot);
            false
        });
    }

    /// Attribute slots currently enabled, in ascending order
    pub fn enabled_attributes(&self) -> Vec<u32> {
        self.enabled_attributes.borrow().iter().copied().collect()
    }

    /// Context used by pipelines, buffers and passes
    pub(crate) fn context(&self) -> &dyn GraphicsContext {
        self.context.as_ref()
    }
}

impl Drop for RenderDevice {
    fn drop(&mut self) {
        engine_debug!("prism::RenderDevice", "Releasing device on '{}'", self.surface.name());
    }
}

#[cfg(test)]
#[path = "render_device_tests.rs"]
mod tests;
