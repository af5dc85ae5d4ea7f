/// Pipeline - a two-stage shader program and its named bindings
///
/// State machine:
///
/// ```text
/// Unlinked ──compile_and_link ok──▶ Linked   (terminal)
///     └─────compile_and_link err──▶ Failed   (terminal)
/// ```
///
/// Bindings can only be resolved once linked. A failed pipeline never binds.

use std::collections::BTreeMap;
use crate::device::{RenderDevice, GraphicsContext, ProgramId, ShaderId, ShaderStage, UniformHandle};
use crate::error::{BindingKind, Error, Result};
use crate::resource::{AttributeSlot, BindingTable};
use crate::{engine_bail, engine_debug, engine_err, engine_error, engine_info, engine_warn};

// ===== SHADER SOURCES =====

/// Source text per shader stage
#[derive(Debug, Clone, Default)]
pub struct ShaderSources {
    stages: BTreeMap<ShaderStage, String>,
}

impl ShaderSources {
    /// Vertex + fragment sources
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        let mut sources = Self::default();
        sources.set(ShaderStage::Vertex, vertex);
        sources.set(ShaderStage::Fragment, fragment);
        sources
    }

    /// Set (or replace) the source of one stage
    pub fn set(&mut self, stage: ShaderStage, source: impl Into<String>) -> &mut Self {
        self.stages.insert(stage, source.into());
        self
    }

    pub fn get(&self, stage: ShaderStage) -> Option<&str> {
        self.stages.get(&stage).map(String::as_str)
    }
}

// ===== PIPELINE =====

/// Lifecycle state of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Not compiled yet
    Unlinked,
    /// Program linked and usable
    Linked,
    /// Compilation or link failed; permanently unusable
    Failed,
}

/// Shader program with semantic attribute/uniform tables
pub struct Pipeline<'d> {
    device: &'d RenderDevice,
    state: PipelineState,
    program: Option<ProgramId>,
    attributes: BindingTable<AttributeSlot>,
    uniforms: BindingTable<UniformHandle>,
    diagnostic: Option<String>,
}

impl<'d> Pipeline<'d> {
    /// Create an unlinked pipeline on a device
    pub fn new(device: &'d RenderDevice) -> Self {
        Self {
            device,
            state: PipelineState::Unlinked,
            program: None,
            attributes: BindingTable::new(),
            uniforms: BindingTable::new(),
            diagnostic: None,
        }
    }

    /// Create a pipeline and compile it in one step
    pub fn from_sources(device: &'d RenderDevice, sources: &ShaderSources) -> Result<Self> {
        let mut pipeline = Self::new(device);
        pipeline.compile_and_link(sources)?;
        Ok(pipeline)
    }

    /// Compile every stage, then attach and link them
    ///
    /// Every stage is compiled even when an earlier one fails, so the
    /// diagnostic lists all broken stages. Any failure moves the pipeline to
    /// `Failed` and returns the first compiler (or the linker) error. Only an
    /// `Unlinked` pipeline can be compiled.
    pub fn compile_and_link(&mut self, sources: &ShaderSources) -> Result<()> {
        if self.state != PipelineState::Unlinked {
            engine_bail!("prism::Pipeline", "Pipeline already compiled (state {:?})", self.state);
        }

        match self.build_program(sources) {
            Ok(program) => {
                self.program = Some(program);
                self.state = PipelineState::Linked;
                engine_info!("prism::Pipeline", "Shader program linked");
                Ok(())
            }
            Err(failures) => {
                self.state = PipelineState::Failed;
                self.diagnostic = Some(
                    failures
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("\n"),
                );
                let mut failures = failures.into_iter();
                let first = failures
                    .next()
                    .unwrap_or_else(|| Error::ProgramLinkFailed("unknown failure".to_string()));
                for other in failures {
                    engine_error!("prism::Pipeline", "{}", other);
                }
                Err(engine_err!("prism::Pipeline", first))
            }
        }
    }

    /// Build the linked program, or every failure met on the way
    fn build_program(&self, sources: &ShaderSources) -> std::result::Result<ProgramId, Vec<Error>> {
        let context = self.device.context();

        let mut shaders: Vec<ShaderId> = Vec::with_capacity(ShaderStage::ALL.len());
        let mut failures = Vec::new();
        for stage in ShaderStage::ALL {
            let compiled = match sources.get(stage) {
                Some(source) => compile_stage(context, stage, source),
                None => Err(Error::ShaderCompilationFailed {
                    stage,
                    log: "no source provided".to_string(),
                }),
            };
            match compiled {
                Ok(shader) => shaders.push(shader),
                Err(err) => failures.push(err),
            }
        }
        if !failures.is_empty() {
            for shader in shaders {
                context.delete_shader(shader);
            }
            return Err(failures);
        }

        let program = match context.create_program() {
            Ok(program) => program,
            Err(err) => {
                for shader in shaders {
                    context.delete_shader(shader);
                }
                return Err(vec![err]);
            }
        };

        for shader in &shaders {
            context.attach_shader(program, *shader);
        }
        context.link_program(program);
        let linked = context.program_link_status(program);

        // Shaders are no longer needed once the program is linked (or failed)
        for shader in shaders {
            context.detach_shader(program, shader);
            context.delete_shader(shader);
        }

        if !linked {
            let log = context.program_info_log(program);
            context.delete_program(program);
            return Err(vec![Error::ProgramLinkFailed(log)]);
        }

        Ok(program)
    }

    /// Resolve a vertex input by shader variable name and store it under `semantic`
    pub fn resolve_attribute(&mut self, semantic: &str, variable: &str) -> Result<AttributeSlot> {
        let program = self.linked_program(semantic)?;
        let index = self
            .device
            .context()
            .attribute_location(program, variable)
            .ok_or_else(|| engine_err!("prism::Pipeline", Error::BindingNotFound {
                kind: BindingKind::Attribute,
                name: variable.to_string(),
            }))?;

        let slot = AttributeSlot::new(index);
        if self.attributes.insert(semantic, slot).is_some() {
            engine_debug!("prism::Pipeline", "Attribute '{}' re-resolved", semantic);
        }
        Ok(slot)
    }

    /// Resolve a uniform by shader variable name and store it under `semantic`
    pub fn resolve_uniform(&mut self, semantic: &str, variable: &str) -> Result<UniformHandle> {
        let program = self.linked_program(semantic)?;
        let location = self
            .device
            .context()
            .uniform_location(program, variable)
            .ok_or_else(|| engine_err!("prism::Pipeline", Error::BindingNotFound {
                kind: BindingKind::Uniform,
                name: variable.to_string(),
            }))?;

        let handle = UniformHandle(location);
        if self.uniforms.insert(semantic, handle).is_some() {
            engine_debug!("prism::Pipeline", "Uniform '{}' re-resolved", semantic);
        }
        Ok(handle)
    }

    fn linked_program(&self, semantic: &str) -> Result<ProgramId> {
        match (self.state, self.program) {
            (PipelineState::Linked, Some(program)) => Ok(program),
            _ => Err(engine_err!(
                "prism::Pipeline",
                Error::PipelineNotLinked(semantic.to_string())
            )),
        }
    }

    /// Make this program current for the next draws
    ///
    /// Returns `false` (and issues nothing) unless the pipeline is linked.
    pub fn bind(&self) -> bool {
        match (self.state, self.program) {
            (PipelineState::Linked, Some(program)) => {
                self.device.context().use_program(Some(program));
                true
            }
            _ => {
                engine_warn!("prism::Pipeline", "bind() on unusable pipeline ({:?})", self.state);
                false
            }
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn is_linked(&self) -> bool {
        self.state == PipelineState::Linked
    }

    /// Compiler/linker diagnostic of a failed pipeline
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// Attribute slot stored under a semantic name
    pub fn attribute(&self, semantic: &str) -> Option<AttributeSlot> {
        self.attributes.get(semantic)
    }

    /// Uniform handle stored under a semantic name
    pub fn uniform(&self, semantic: &str) -> Option<UniformHandle> {
        self.uniforms.get(semantic)
    }

    pub fn attributes(&self) -> &BindingTable<AttributeSlot> {
        &self.attributes
    }

    pub fn uniforms(&self) -> &BindingTable<UniformHandle> {
        &self.uniforms
    }

    /// Context-level program handle (None unless linked)
    pub fn program(&self) -> Option<ProgramId> {
        self.program
    }
}

impl Drop for Pipeline<'_> {
    fn drop(&mut self) {
        if let Some(program) = self.program.take() {
            self.device.context().delete_program(program);
        }
    }
}

fn compile_stage(context: &dyn GraphicsContext, stage: ShaderStage, source: &str) -> Result<ShaderId> {
    let shader = context.create_shader(stage)?;
    context.shader_source(shader, source);
    context.compile_shader(shader);

    if !context.shader_compile_status(shader) {
        let log = context.shader_info_log(shader);
        context.delete_shader(shader);
        return Err(Error::ShaderCompilationFailed { stage, log });
    }
    Ok(shader)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
