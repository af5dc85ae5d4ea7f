/// Recording context and mock host (no GPU required)
///
/// `RecordingContext` implements [`GraphicsContext`] in memory: every state
/// changing call is appended to a command log, shader compilation and program
/// linking are simulated, and active attributes/uniforms are derived from the
/// declarations found in the attached shader sources.
///
/// Clones share the same state, so a test can keep a handle to the context it
/// handed to a [`RenderDevice`](crate::device::RenderDevice) and inspect what
/// the device did with it.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use crate::config::DeviceConfig;
use crate::device::{
    GraphicsContext, Surface, SurfaceHost, Resolution,
    ShaderId, ProgramId, BufferId, UniformId,
    ShaderStage, BufferTarget, Primitive, IndexFormat, Capability, DepthCompare, ClearMask,
};
use crate::error::{Error, Result};

/// GL_INVALID_OPERATION
pub const INVALID_OPERATION: u32 = 0x0502;

// ============================================================================
// Recorded commands
// ============================================================================

/// One state-changing call issued to the context
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCommand {
    CreateShader { shader: ShaderId, stage: ShaderStage },
    ShaderSource { shader: ShaderId, source: String },
    CompileShader { shader: ShaderId },
    DeleteShader { shader: ShaderId },
    CreateProgram { program: ProgramId },
    AttachShader { program: ProgramId, shader: ShaderId },
    DetachShader { program: ProgramId, shader: ShaderId },
    LinkProgram { program: ProgramId },
    DeleteProgram { program: ProgramId },
    UseProgram { program: Option<ProgramId> },
    CreateBuffer { buffer: BufferId },
    BindBuffer { target: BufferTarget, buffer: Option<BufferId> },
    BufferData { target: BufferTarget, size: usize },
    DeleteBuffer { buffer: BufferId },
    VertexAttribPointer { slot: u32, components: i32, normalized: bool, stride: i32, offset: i32 },
    EnableVertexAttribArray { slot: u32 },
    DisableVertexAttribArray { slot: u32 },
    ClearColor([f32; 4]),
    ClearDepth(f32),
    Enable(Capability),
    DepthFunc(DepthCompare),
    Clear(ClearMask),
    DrawArrays { primitive: Primitive, first: i32, count: i32 },
    DrawElements { primitive: Primitive, count: i32, format: IndexFormat, byte_offset: i32 },
    UniformMatrix4 { location: UniformId, transpose: bool, value: [f32; 16] },
}

impl GpuCommand {
    /// Whether this command is a draw call
    pub fn is_draw(&self) -> bool {
        matches!(self, GpuCommand::DrawArrays { .. } | GpuCommand::DrawElements { .. })
    }
}

/// Bound state captured at the moment of a draw call
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    /// The draw command itself
    pub command: GpuCommand,
    /// Current program
    pub program: Option<ProgramId>,
    /// Enabled attribute slots and the buffer each one sources from
    pub attributes: BTreeMap<u32, BufferId>,
    /// Bound index buffer
    pub index_buffer: Option<BufferId>,
}

// ============================================================================
// Simulated objects
// ============================================================================

#[derive(Debug)]
struct MockShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct MockProgram {
    attached: Vec<ShaderId>,
    linked: bool,
    log: String,
    attributes: Vec<String>,
    uniforms: FxHashMap<String, UniformId>,
}

#[derive(Debug, Default)]
struct RecordingState {
    commands: Vec<GpuCommand>,
    draws: Vec<DrawRecord>,
    shaders: SlotMap<ShaderId, MockShader>,
    programs: SlotMap<ProgramId, MockProgram>,
    uniforms: SlotMap<UniformId, (ProgramId, String)>,
    buffers: SlotMap<BufferId, Vec<u8>>,
    array_binding: Option<BufferId>,
    element_binding: Option<BufferId>,
    current_program: Option<ProgramId>,
    attribute_pointers: BTreeMap<u32, BufferId>,
    enabled_attributes: BTreeMap<u32, bool>,
    errors: VecDeque<u32>,
    compile_failures: FxHashMap<ShaderStage, String>,
    link_failure: Option<String>,
    fail_object_creation: bool,
}

// ============================================================================
// RecordingContext
// ============================================================================

/// In-memory [`GraphicsContext`] that records every call
#[derive(Debug, Clone, Default)]
pub struct RecordingContext {
    state: Rc<RefCell<RecordingState>>,
}

impl RecordingContext {
    /// Create an empty recording context
    pub fn new() -> Self {
        Self::default()
    }

    // ----- failure injection -----

    /// Make every compilation of `stage` fail with `log`
    pub fn fail_compile(&self, stage: ShaderStage, log: &str) {
        self.state.borrow_mut().compile_failures.insert(stage, log.to_string());
    }

    /// Make every link fail with `log`
    pub fn fail_link(&self, log: &str) {
        self.state.borrow_mut().link_failure = Some(log.to_string());
    }

    /// Make object creation (shaders, programs, buffers) fail
    pub fn fail_object_creation(&self, fail: bool) {
        self.state.borrow_mut().fail_object_creation = fail;
    }

    /// Queue an error code for `take_error`
    pub fn push_error(&self, code: u32) {
        self.state.borrow_mut().errors.push_back(code);
    }

    // ----- inspection -----

    /// Every recorded command, in issue order
    pub fn commands(&self) -> Vec<GpuCommand> {
        self.state.borrow().commands.clone()
    }

    /// Every draw call with the state bound when it was issued
    pub fn draws(&self) -> Vec<DrawRecord> {
        self.state.borrow().draws.clone()
    }

    /// Forget recorded commands and draws (objects and bindings are kept)
    pub fn clear_commands(&self) {
        let mut state = self.state.borrow_mut();
        state.commands.clear();
        state.draws.clear();
    }

    /// Bytes last uploaded into a live buffer
    pub fn buffer_contents(&self, buffer: BufferId) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(buffer).cloned()
    }

    /// Number of live buffer objects
    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    /// Number of live program objects
    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    /// Number of live shader objects
    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    /// Current program
    pub fn current_program(&self) -> Option<ProgramId> {
        self.state.borrow().current_program
    }

    fn record(&self, command: GpuCommand) {
        self.state.borrow_mut().commands.push(command);
    }

    fn record_draw(&self, command: GpuCommand, needs_indices: bool) {
        let mut state = self.state.borrow_mut();
        if state.current_program.is_none() || (needs_indices && state.element_binding.is_none()) {
            state.errors.push_back(INVALID_OPERATION);
        }
        let attributes = state
            .attribute_pointers
            .iter()
            .filter(|(slot, _)| state.enabled_attributes.get(*slot).copied().unwrap_or(false))
            .map(|(slot, buffer)| (*slot, *buffer))
            .collect();
        let record = DrawRecord {
            command: command.clone(),
            program: state.current_program,
            attributes,
            index_buffer: state.element_binding,
        };
        state.commands.push(command);
        state.draws.push(record);
    }
}

/// Names declared with one of `qualifiers` as leading storage qualifier
fn declared_names(source: &str, qualifiers: &[&str]) -> Vec<String> {
    let mut names = Vec::new();
    for line in source.lines() {
        let code = line.split("//").next().unwrap_or("");
        for statement in code.split(';') {
            let tokens: Vec<&str> = statement.split_whitespace().collect();
            let Some(pos) = tokens.iter().position(|t| qualifiers.contains(t)) else {
                continue;
            };
            let prefix = tokens[..pos].join(" ");
            if !(prefix.is_empty() || prefix.starts_with("layout")) || tokens.len() < pos + 3 {
                continue;
            }
            if let Some(name) = tokens.last().and_then(|t| t.split('[').next()) {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
    }
    names
}

impl GraphicsContext for RecordingContext {
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId> {
        let mut state = self.state.borrow_mut();
        if state.fail_object_creation {
            return Err(Error::BackendError("create_shader: out of objects".to_string()));
        }
        let shader = state.shaders.insert(MockShader {
            stage,
            source: String::new(),
            compiled: false,
            log: String::new(),
        });
        state.commands.push(GpuCommand::CreateShader { shader, stage });
        Ok(shader)
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        let mut state = self.state.borrow_mut();
        if let Some(s) = state.shaders.get_mut(shader) {
            s.source = source.to_string();
        }
        state.commands.push(GpuCommand::ShaderSource { shader, source: source.to_string() });
    }

    fn compile_shader(&self, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        let injected = state
            .shaders
            .get(shader)
            .and_then(|s| state.compile_failures.get(&s.stage).cloned());
        if let Some(s) = state.shaders.get_mut(shader) {
            match injected {
                Some(log) => {
                    s.compiled = false;
                    s.log = log;
                }
                None if !s.source.contains("main") => {
                    s.compiled = false;
                    s.log = "ERROR: 0:1: 'main' : missing entry point".to_string();
                }
                None => {
                    s.compiled = true;
                    s.log.clear();
                }
            }
        }
        state.commands.push(GpuCommand::CompileShader { shader });
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        self.state.borrow().shaders.get(shader).map(|s| s.compiled).unwrap_or(false)
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        self.state.borrow().shaders.get(shader).map(|s| s.log.clone()).unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        state.shaders.remove(shader);
        state.commands.push(GpuCommand::DeleteShader { shader });
    }

    fn create_program(&self) -> Result<ProgramId> {
        let mut state = self.state.borrow_mut();
        if state.fail_object_creation {
            return Err(Error::BackendError("create_program: out of objects".to_string()));
        }
        let program = state.programs.insert(MockProgram::default());
        state.commands.push(GpuCommand::CreateProgram { program });
        Ok(program)
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        if let Some(p) = state.programs.get_mut(program) {
            p.attached.push(shader);
        }
        state.commands.push(GpuCommand::AttachShader { program, shader });
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        if let Some(p) = state.programs.get_mut(program) {
            p.attached.retain(|s| *s != shader);
        }
        state.commands.push(GpuCommand::DetachShader { program, shader });
    }

    fn link_program(&self, program: ProgramId) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.commands.push(GpuCommand::LinkProgram { program });

        let Some(attached) = state.programs.get(program).map(|p| p.attached.clone()) else {
            return;
        };
        let stages: Vec<&MockShader> = attached.iter().filter_map(|s| state.shaders.get(*s)).collect();

        let failure = if let Some(log) = &state.link_failure {
            Some(log.clone())
        } else if stages.iter().any(|s| !s.compiled) {
            Some("ERROR: one or more attached shaders not successfully compiled".to_string())
        } else if ShaderStage::ALL.iter().any(|stage| !stages.iter().any(|s| s.stage == *stage)) {
            Some("ERROR: program requires a vertex and a fragment shader".to_string())
        } else {
            None
        };

        let mut attributes = Vec::new();
        let mut uniform_names = Vec::new();
        if failure.is_none() {
            for shader in &stages {
                if shader.stage == ShaderStage::Vertex {
                    attributes.extend(declared_names(&shader.source, &["attribute", "in"]));
                }
                for name in declared_names(&shader.source, &["uniform"]) {
                    if !uniform_names.contains(&name) {
                        uniform_names.push(name);
                    }
                }
            }
        }

        let stale: Vec<UniformId> = state
            .uniforms
            .iter()
            .filter(|(_, (owner, _))| *owner == program)
            .map(|(id, _)| id)
            .collect();
        for id in stale {
            state.uniforms.remove(id);
        }
        let uniforms = uniform_names
            .into_iter()
            .map(|name| {
                let id = state.uniforms.insert((program, name.clone()));
                (name, id)
            })
            .collect();

        if let Some(p) = state.programs.get_mut(program) {
            p.linked = failure.is_none();
            p.log = failure.unwrap_or_default();
            p.attributes = attributes;
            p.uniforms = uniforms;
        }
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        self.state.borrow().programs.get(program).map(|p| p.linked).unwrap_or(false)
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        self.state.borrow().programs.get(program).map(|p| p.log.clone()).unwrap_or_default()
    }

    fn delete_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(program);
        state.uniforms.retain(|_, (owner, _)| *owner != program);
        if state.current_program == Some(program) {
            state.current_program = None;
        }
        state.commands.push(GpuCommand::DeleteProgram { program });
    }

    fn use_program(&self, program: Option<ProgramId>) {
        let mut state = self.state.borrow_mut();
        state.current_program = program;
        state.commands.push(GpuCommand::UseProgram { program });
    }

    fn attribute_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let p = state.programs.get(program).filter(|p| p.linked)?;
        p.attributes.iter().position(|a| a == name).map(|i| i as u32)
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformId> {
        let state = self.state.borrow();
        let p = state.programs.get(program).filter(|p| p.linked)?;
        p.uniforms.get(name).copied()
    }

    fn create_buffer(&self) -> Result<BufferId> {
        let mut state = self.state.borrow_mut();
        if state.fail_object_creation {
            return Err(Error::BackendError("create_buffer: out of objects".to_string()));
        }
        let buffer = state.buffers.insert(Vec::new());
        state.commands.push(GpuCommand::CreateBuffer { buffer });
        Ok(buffer)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>) {
        let mut state = self.state.borrow_mut();
        match target {
            BufferTarget::Array => state.array_binding = buffer,
            BufferTarget::ElementArray => state.element_binding = buffer,
        }
        state.commands.push(GpuCommand::BindBuffer { target, buffer });
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        let bound = match target {
            BufferTarget::Array => state.array_binding,
            BufferTarget::ElementArray => state.element_binding,
        };
        let stored = match bound {
            Some(buffer) => state.buffers.get_mut(buffer).map(|contents| *contents = data.to_vec()).is_some(),
            None => false,
        };
        if !stored {
            state.errors.push_back(INVALID_OPERATION);
        }
        state.commands.push(GpuCommand::BufferData { target, size: data.len() });
    }

    fn delete_buffer(&self, buffer: BufferId) {
        let mut state = self.state.borrow_mut();
        state.buffers.remove(buffer);
        if state.array_binding == Some(buffer) {
            state.array_binding = None;
        }
        if state.element_binding == Some(buffer) {
            state.element_binding = None;
        }
        state.attribute_pointers.retain(|_, b| *b != buffer);
        state.commands.push(GpuCommand::DeleteBuffer { buffer });
    }

    fn vertex_attrib_pointer_f32(
        &self,
        slot: u32,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        let mut state = self.state.borrow_mut();
        match state.array_binding {
            Some(buffer) => {
                state.attribute_pointers.insert(slot, buffer);
            }
            None => state.errors.push_back(INVALID_OPERATION),
        }
        state.commands.push(GpuCommand::VertexAttribPointer {
            slot,
            components,
            normalized,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, slot: u32) {
        let mut state = self.state.borrow_mut();
        state.enabled_attributes.insert(slot, true);
        state.commands.push(GpuCommand::EnableVertexAttribArray { slot });
    }

    fn disable_vertex_attrib_array(&self, slot: u32) {
        let mut state = self.state.borrow_mut();
        state.enabled_attributes.insert(slot, false);
        state.commands.push(GpuCommand::DisableVertexAttribArray { slot });
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        self.record(GpuCommand::ClearColor(rgba));
    }

    fn clear_depth(&self, depth: f32) {
        self.record(GpuCommand::ClearDepth(depth));
    }

    fn enable(&self, capability: Capability) {
        self.record(GpuCommand::Enable(capability));
    }

    fn depth_func(&self, compare: DepthCompare) {
        self.record(GpuCommand::DepthFunc(compare));
    }

    fn clear(&self, mask: ClearMask) {
        self.record(GpuCommand::Clear(mask));
    }

    fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32) {
        self.record_draw(GpuCommand::DrawArrays { primitive, first, count }, false);
    }

    fn draw_elements(&self, primitive: Primitive, count: i32, format: IndexFormat, byte_offset: i32) {
        self.record_draw(
            GpuCommand::DrawElements { primitive, count, format, byte_offset },
            true,
        );
    }

    fn uniform_matrix4(&self, location: UniformId, transpose: bool, value: &[f32; 16]) {
        let mut state = self.state.borrow_mut();
        let owner = state.uniforms.get(location).map(|(program, _)| *program);
        if owner.is_none() || owner != state.current_program {
            state.errors.push_back(INVALID_OPERATION);
        }
        state.commands.push(GpuCommand::UniformMatrix4 { location, transpose, value: *value });
    }

    fn take_error(&self) -> Option<u32> {
        self.state.borrow_mut().errors.pop_front()
    }
}

// ============================================================================
// MockHost
// ============================================================================

/// Surface handed out by [`MockHost`]
#[derive(Debug)]
pub struct MockSurface {
    name: String,
    resolution: Rc<Cell<Resolution>>,
}

impl Surface for MockSurface {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolution(&self) -> Resolution {
        self.resolution.get()
    }
}

/// Host exposing one named surface backed by a [`RecordingContext`]
#[derive(Debug)]
pub struct MockHost {
    surface_name: String,
    resolution: Rc<Cell<Resolution>>,
    surface_present: bool,
    context_failure: Option<String>,
    context: RecordingContext,
}

impl MockHost {
    /// Host with an 800x600 surface named "glcanvas"
    pub fn new() -> Self {
        Self {
            surface_name: "glcanvas".to_string(),
            resolution: Rc::new(Cell::new(Resolution::new(800, 600))),
            surface_present: true,
            context_failure: None,
            context: RecordingContext::new(),
        }
    }

    /// Rename the surface the host exposes
    pub fn with_surface_name(mut self, name: &str) -> Self {
        self.surface_name = name.to_string();
        self
    }

    /// Set the initial surface size
    pub fn with_resolution(self, width: u32, height: u32) -> Self {
        self.resolution.set(Resolution::new(width, height));
        self
    }

    /// Host with no surface at all
    pub fn without_surface(mut self) -> Self {
        self.surface_present = false;
        self
    }

    /// Host whose context creation fails with `msg`
    pub fn with_context_failure(mut self, msg: &str) -> Self {
        self.context_failure = Some(msg.to_string());
        self
    }

    /// Resize the surface (visible through already-located surfaces)
    pub fn resize(&self, width: u32, height: u32) {
        self.resolution.set(Resolution::new(width, height));
    }

    /// Handle to the context the host creates
    pub fn context(&self) -> &RecordingContext {
        &self.context
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceHost for MockHost {
    fn locate_surface(&mut self, name: &str) -> Option<Box<dyn Surface>> {
        if !self.surface_present || name != self.surface_name {
            return None;
        }
        Some(Box::new(MockSurface {
            name: self.surface_name.clone(),
            resolution: Rc::clone(&self.resolution),
        }))
    }

    fn create_context(
        &mut self,
        _surface: &dyn Surface,
        _config: &DeviceConfig,
    ) -> Result<Box<dyn GraphicsContext>> {
        match &self.context_failure {
            Some(msg) => Err(Error::ContextCreationFailed(msg.clone())),
            None => Ok(Box::new(self.context.clone())),
        }
    }
}

#[cfg(test)]
#[path = "recording_context_tests.rs"]
mod tests;
