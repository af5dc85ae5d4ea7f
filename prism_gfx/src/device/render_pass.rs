/// RenderPass - per-frame clear description
///
/// A plain value: no GPU-side state, re-evaluated every time a frame begins.

use crate::device::{RenderDevice, Capability, ClearMask, DepthCompare};
use crate::{engine_debug, engine_trace};

/// Depth attachment clear setup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthClear {
    /// Clear value; the attachment is disabled unless it is > 0
    pub value: f32,
    /// Comparison function enabled with the depth test
    pub compare: DepthCompare,
}

/// Clear attachments applied at the start of a frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderPass {
    /// RGBA color clear value (None = color attachment untouched)
    pub color: Option<[f32; 4]>,
    /// Depth clear value and comparison (None = depth attachment untouched)
    pub depth: Option<DepthClear>,
}

impl RenderPass {
    /// Pass with no attachment enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the color attachment
    pub fn with_color(mut self, rgba: [f32; 4]) -> Self {
        self.color = Some(rgba);
        self
    }

    /// Enable the depth attachment
    pub fn with_depth(mut self, value: f32, compare: DepthCompare) -> Self {
        self.depth = Some(DepthClear { value, compare });
        self
    }

    /// Attachments `begin` would clear
    pub fn clear_mask(&self) -> ClearMask {
        let mut mask = ClearMask::empty();
        if self.color.is_some() {
            mask |= ClearMask::COLOR;
        }
        if self.enabled_depth().is_some() {
            mask |= ClearMask::DEPTH;
        }
        mask
    }

    fn enabled_depth(&self) -> Option<DepthClear> {
        self.depth.filter(|d| d.value > 0.0)
    }

    /// Configure and clear every enabled attachment with one clear call
    ///
    /// Returns `false` when no attachment is enabled. Nothing is issued in that
    /// case and the frame's draws must be skipped.
    pub fn begin(&self, device: &RenderDevice) -> bool {
        let context = device.context();
        let mut mask = ClearMask::empty();

        if let Some(rgba) = self.color {
            context.clear_color(rgba);
            mask |= ClearMask::COLOR;
        }

        if let Some(depth) = self.enabled_depth() {
            context.clear_depth(depth.value);
            context.enable(Capability::DepthTest);
            context.depth_func(depth.compare);
            mask |= ClearMask::DEPTH;
        }

        if mask.is_empty() {
            engine_debug!("prism::RenderPass", "No attachment enabled, skipping render pass");
            return false;
        }

        engine_trace!("prism::RenderPass", "clear({:?})", mask);
        context.clear(mask);
        device.record_clear();
        true
    }
}

#[cfg(test)]
#[path = "render_pass_tests.rs"]
mod tests;
