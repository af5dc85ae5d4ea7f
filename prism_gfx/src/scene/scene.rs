/// Scene - explicit application context for the per-frame driver.
///
/// Owns the pipelines, the drawables (a mesh plus the pipeline that draws it)
/// and the main render pass, and borrows the device they were created on.
/// Drawables are rendered in insertion order.

use slotmap::{new_key_type, SlotMap};
use glam::Mat4;
use crate::config::UniformNames;
use crate::device::{RenderDevice, RenderPass};
use crate::error::Result;
use crate::resource::{Mesh, Pipeline};
use crate::{engine_bail, engine_debug, engine_trace, engine_warn};

new_key_type! {
    /// Stable key of a pipeline owned by a scene
    pub struct PipelineId;
    /// Stable key of a drawable owned by a scene
    pub struct DrawableId;
}

/// Mesh paired with the pipeline that draws it
struct Drawable<'d> {
    pipeline: PipelineId,
    mesh: Mesh<'d>,
}

/// Outcome of one `render_frame`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// The render pass cleared at least one attachment
    pub cleared: bool,
    /// Drawables that issued a draw call
    pub drawn: u32,
    /// Drawables skipped (unusable pipeline or empty mesh)
    pub skipped: u32,
}

pub struct Scene<'d> {
    device: &'d RenderDevice,
    pass: RenderPass,
    uniform_names: UniformNames,
    pipelines: SlotMap<PipelineId, Pipeline<'d>>,
    drawables: SlotMap<DrawableId, Drawable<'d>>,
    /// Draw order (insertion order, survives removals)
    order: Vec<DrawableId>,
}

impl<'d> Scene<'d> {
    pub fn new(device: &'d RenderDevice, pass: RenderPass) -> Self {
        Self {
            device,
            pass,
            uniform_names: UniformNames::default(),
            pipelines: SlotMap::with_key(),
            drawables: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Override the semantic uniform names uploaded per drawable
    pub fn with_uniform_names(mut self, names: UniformNames) -> Self {
        self.uniform_names = names;
        self
    }

    pub fn device(&self) -> &'d RenderDevice {
        self.device
    }

    pub fn pass(&self) -> &RenderPass {
        &self.pass
    }

    pub fn set_pass(&mut self, pass: RenderPass) {
        self.pass = pass;
    }

    pub fn uniform_names(&self) -> &UniformNames {
        &self.uniform_names
    }

    // ===== PIPELINES =====

    pub fn add_pipeline(&mut self, pipeline: Pipeline<'d>) -> PipelineId {
        self.pipelines.insert(pipeline)
    }

    pub fn pipeline(&self, id: PipelineId) -> Option<&Pipeline<'d>> {
        self.pipelines.get(id)
    }

    pub fn pipeline_mut(&mut self, id: PipelineId) -> Option<&mut Pipeline<'d>> {
        self.pipelines.get_mut(id)
    }

    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    // ===== DRAWABLES =====

    /// Register `mesh` to be drawn with `pipeline` every frame
    pub fn add_drawable(&mut self, pipeline: PipelineId, mesh: Mesh<'d>) -> Result<DrawableId> {
        if !self.pipelines.contains_key(pipeline) {
            engine_bail!("prism::Scene", "Unknown pipeline {:?} for drawable", pipeline);
        }
        let id = self.drawables.insert(Drawable { pipeline, mesh });
        self.order.push(id);
        Ok(id)
    }

    /// Remove a drawable, handing its mesh back
    pub fn remove_drawable(&mut self, id: DrawableId) -> Option<Mesh<'d>> {
        let drawable = self.drawables.remove(id)?;
        self.order.retain(|key| *key != id);
        Some(drawable.mesh)
    }

    pub fn mesh(&self, id: DrawableId) -> Option<&Mesh<'d>> {
        self.drawables.get(id).map(|d| &d.mesh)
    }

    pub fn mesh_mut(&mut self, id: DrawableId) -> Option<&mut Mesh<'d>> {
        self.drawables.get_mut(id).map(|d| &mut d.mesh)
    }

    pub fn drawable_count(&self) -> usize {
        self.order.len()
    }

    // ===== FRAME =====

    /// Render one frame
    ///
    /// Resets the device counters, begins the pass, then for every drawable
    /// binds its pipeline and mesh, uploads the projection and model-view
    /// matrices and draws. Bindings are re-established for every drawable.
    /// `model_view` receives the drawable's draw index and mesh.
    ///
    /// If the pass has no enabled attachment the whole frame is skipped.
    pub fn render_frame<F>(&self, projection: &Mat4, mut model_view: F) -> Result<FrameReport>
    where
        F: FnMut(usize, &Mesh<'d>) -> Mat4,
    {
        self.device.reset_stats();
        let mut report = FrameReport::default();

        if !self.pass.begin(self.device) {
            engine_debug!("prism::Scene", "Render pass cleared nothing, frame skipped");
            return Ok(report);
        }
        report.cleared = true;

        for (index, id) in self.order.iter().enumerate() {
            let Some(drawable) = self.drawables.get(*id) else {
                continue;
            };
            let Some(pipeline) = self.pipelines.get(drawable.pipeline) else {
                report.skipped += 1;
                continue;
            };
            if !pipeline.bind() {
                report.skipped += 1;
                continue;
            }

            drawable.mesh.bind()?;

            match pipeline.uniform(&self.uniform_names.projection) {
                Some(handle) => self.device.upload_matrix4(handle, projection, false),
                None => engine_warn!(
                    "prism::Scene",
                    "Pipeline has no '{}' uniform",
                    self.uniform_names.projection
                ),
            }
            let matrix = model_view(index, &drawable.mesh);
            match pipeline.uniform(&self.uniform_names.model_view) {
                Some(handle) => self.device.upload_matrix4(handle, &matrix, false),
                None => engine_warn!(
                    "prism::Scene",
                    "Pipeline has no '{}' uniform",
                    self.uniform_names.model_view
                ),
            }

            if drawable.mesh.draw() {
                report.drawn += 1;
            } else {
                report.skipped += 1;
            }
        }

        engine_trace!(
            "prism::Scene",
            "Frame done: {} drawn, {} skipped",
            report.drawn,
            report.skipped
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
