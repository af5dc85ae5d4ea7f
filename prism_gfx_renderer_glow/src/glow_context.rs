/// GlowContext - GraphicsContext implementation on top of glow
///
/// GL object names are kept in slot maps and handed to the core as typed
/// keys. Every GL call goes through the single `glow::Context` owned here;
/// it is only ever used from the thread that created it.
///
/// One vertex array object is created and left bound for the lifetime of
/// the context. Core-profile desktop contexts have no default VAO.

use std::cell::RefCell;
use glow::HasContext;
use slotmap::SlotMap;
use prism_gfx::prism::render::{
    BufferId, BufferTarget, Capability, ClearMask, DepthCompare, GraphicsContext, IndexFormat,
    Primitive, ProgramId, ShaderId, ShaderStage, UniformId,
};
use prism_gfx::prism::{Error, Result};
use prism_gfx::engine_debug;
use crate::glow_format::{
    buffer_target_to_gl, capability_to_gl, clear_mask_to_gl, depth_compare_to_gl,
    index_format_to_gl, primitive_to_gl, shader_stage_to_gl,
};

type GlShader = <glow::Context as HasContext>::Shader;
type GlProgram = <glow::Context as HasContext>::Program;
type GlBuffer = <glow::Context as HasContext>::Buffer;
type GlUniformLocation = <glow::Context as HasContext>::UniformLocation;
type GlVertexArray = <glow::Context as HasContext>::VertexArray;

/// glow-backed GPU context
pub struct GlowContext {
    gl: glow::Context,
    vertex_array: GlVertexArray,
    shaders: RefCell<SlotMap<ShaderId, GlShader>>,
    programs: RefCell<SlotMap<ProgramId, GlProgram>>,
    buffers: RefCell<SlotMap<BufferId, GlBuffer>>,
    /// Uniform locations with the program they belong to
    uniforms: RefCell<SlotMap<UniformId, (ProgramId, GlUniformLocation)>>,
}

impl GlowContext {
    /// Wrap an existing GL context and bind its vertex array object
    ///
    /// # Errors
    ///
    /// `Error::ContextCreationFailed` if the vertex array cannot be created.
    pub fn new(gl: glow::Context) -> Result<Self> {
        let vertex_array = unsafe { gl.create_vertex_array() }
            .map_err(|e| Error::ContextCreationFailed(format!("create_vertex_array: {}", e)))?;
        unsafe { gl.bind_vertex_array(Some(vertex_array)) };
        Ok(Self {
            gl,
            vertex_array,
            shaders: RefCell::new(SlotMap::with_key()),
            programs: RefCell::new(SlotMap::with_key()),
            buffers: RefCell::new(SlotMap::with_key()),
            uniforms: RefCell::new(SlotMap::with_key()),
        })
    }

    /// Underlying glow context
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    fn shader(&self, id: ShaderId) -> Option<GlShader> {
        self.shaders.borrow().get(id).copied()
    }

    fn program(&self, id: ProgramId) -> Option<GlProgram> {
        self.programs.borrow().get(id).copied()
    }

    fn buffer(&self, id: BufferId) -> Option<GlBuffer> {
        self.buffers.borrow().get(id).copied()
    }
}

impl GraphicsContext for GlowContext {
    // ===== SHADERS =====

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId> {
        let shader = unsafe { self.gl.create_shader(shader_stage_to_gl(stage)) }
            .map_err(|e| Error::BackendError(format!("create_shader({:?}): {}", stage, e)))?;
        Ok(self.shaders.borrow_mut().insert(shader))
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        if let Some(shader) = self.shader(shader) {
            unsafe { self.gl.shader_source(shader, source) };
        }
    }

    fn compile_shader(&self, shader: ShaderId) {
        if let Some(shader) = self.shader(shader) {
            unsafe { self.gl.compile_shader(shader) };
        }
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        self.shader(shader)
            .map(|s| unsafe { self.gl.get_shader_compile_status(s) })
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        self.shader(shader)
            .map(|s| unsafe { self.gl.get_shader_info_log(s) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderId) {
        if let Some(shader) = self.shaders.borrow_mut().remove(shader) {
            unsafe { self.gl.delete_shader(shader) };
        }
    }

    // ===== PROGRAMS =====

    fn create_program(&self) -> Result<ProgramId> {
        let program = unsafe { self.gl.create_program() }
            .map_err(|e| Error::BackendError(format!("create_program: {}", e)))?;
        Ok(self.programs.borrow_mut().insert(program))
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        if let (Some(program), Some(shader)) = (self.program(program), self.shader(shader)) {
            unsafe { self.gl.attach_shader(program, shader) };
        }
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        if let (Some(program), Some(shader)) = (self.program(program), self.shader(shader)) {
            unsafe { self.gl.detach_shader(program, shader) };
        }
    }

    fn link_program(&self, program: ProgramId) {
        if let Some(gl_program) = self.program(program) {
            // Locations from a previous link are stale
            self.uniforms.borrow_mut().retain(|_, (owner, _)| *owner != program);
            unsafe { self.gl.link_program(gl_program) };
        }
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        self.program(program)
            .map(|p| unsafe { self.gl.get_program_link_status(p) })
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        self.program(program)
            .map(|p| unsafe { self.gl.get_program_info_log(p) })
            .unwrap_or_default()
    }

    fn delete_program(&self, program: ProgramId) {
        self.uniforms.borrow_mut().retain(|_, (owner, _)| *owner != program);
        if let Some(gl_program) = self.programs.borrow_mut().remove(program) {
            unsafe { self.gl.delete_program(gl_program) };
        }
    }

    fn use_program(&self, program: Option<ProgramId>) {
        let gl_program = program.and_then(|p| self.program(p));
        unsafe { self.gl.use_program(gl_program) };
    }

    fn attribute_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        let program = self.program(program)?;
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformId> {
        let gl_program = self.program(program)?;
        let location = unsafe { self.gl.get_uniform_location(gl_program, name) }?;
        Some(intern_uniform(&mut self.uniforms.borrow_mut(), program, location))
    }

    // ===== BUFFERS =====

    fn create_buffer(&self) -> Result<BufferId> {
        let buffer = unsafe { self.gl.create_buffer() }
            .map_err(|e| Error::BackendError(format!("create_buffer: {}", e)))?;
        Ok(self.buffers.borrow_mut().insert(buffer))
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>) {
        let gl_buffer = buffer.and_then(|b| self.buffer(b));
        unsafe { self.gl.bind_buffer(buffer_target_to_gl(target), gl_buffer) };
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(buffer_target_to_gl(target), data, glow::STATIC_DRAW)
        };
    }

    fn delete_buffer(&self, buffer: BufferId) {
        if let Some(buffer) = self.buffers.borrow_mut().remove(buffer) {
            unsafe { self.gl.delete_buffer(buffer) };
        }
    }

    fn vertex_attrib_pointer_f32(
        &self,
        slot: u32,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(slot, components, glow::FLOAT, normalized, stride, offset)
        };
    }

    fn enable_vertex_attrib_array(&self, slot: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(slot) };
    }

    fn disable_vertex_attrib_array(&self, slot: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(slot) };
    }

    // ===== CLEAR AND DEPTH STATE =====

    fn clear_color(&self, rgba: [f32; 4]) {
        unsafe { self.gl.clear_color(rgba[0], rgba[1], rgba[2], rgba[3]) };
    }

    fn clear_depth(&self, depth: f32) {
        unsafe { self.gl.clear_depth_f32(depth) };
    }

    fn enable(&self, capability: Capability) {
        unsafe { self.gl.enable(capability_to_gl(capability)) };
    }

    fn depth_func(&self, compare: DepthCompare) {
        unsafe { self.gl.depth_func(depth_compare_to_gl(compare)) };
    }

    fn clear(&self, mask: ClearMask) {
        unsafe { self.gl.clear(clear_mask_to_gl(mask)) };
    }

    // ===== DRAWS AND UNIFORMS =====

    fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(primitive_to_gl(primitive), first, count) };
    }

    fn draw_elements(&self, primitive: Primitive, count: i32, format: IndexFormat, byte_offset: i32) {
        unsafe {
            self.gl.draw_elements(
                primitive_to_gl(primitive),
                count,
                index_format_to_gl(format),
                byte_offset,
            )
        };
    }

    fn uniform_matrix4(&self, location: UniformId, transpose: bool, value: &[f32; 16]) {
        let uniforms = self.uniforms.borrow();
        let location = uniforms.get(location).map(|(_, l)| l);
        unsafe { self.gl.uniform_matrix_4_f32_slice(location, transpose, value) };
    }

    fn take_error(&self) -> Option<u32> {
        match unsafe { self.gl.get_error() } {
            glow::NO_ERROR => None,
            code => Some(code),
        }
    }
}

/// Key of `location` for `program`, inserting it only if it is not known yet
fn intern_uniform<L: PartialEq>(
    uniforms: &mut SlotMap<UniformId, (ProgramId, L)>,
    program: ProgramId,
    location: L,
) -> UniformId {
    let known = uniforms
        .iter()
        .find(|(_, (owner, known))| *owner == program && *known == location)
        .map(|(id, _)| id);
    match known {
        Some(id) => id,
        None => uniforms.insert((program, location)),
    }
}

impl Drop for GlowContext {
    fn drop(&mut self) {
        let shaders = self.shaders.get_mut();
        let programs = self.programs.get_mut();
        let buffers = self.buffers.get_mut();
        if !(shaders.is_empty() && programs.is_empty() && buffers.is_empty()) {
            engine_debug!(
                "prism::glow",
                "Releasing leftover GL objects ({} shaders, {} programs, {} buffers)",
                shaders.len(),
                programs.len(),
                buffers.len()
            );
        }
        unsafe {
            for (_, shader) in shaders.drain() {
                self.gl.delete_shader(shader);
            }
            for (_, program) in programs.drain() {
                self.gl.delete_program(program);
            }
            for (_, buffer) in buffers.drain() {
                self.gl.delete_buffer(buffer);
            }
            self.gl.bind_vertex_array(None);
            self.gl.delete_vertex_array(self.vertex_array);
        }
    }
}

#[cfg(test)]
#[path = "glow_context_tests.rs"]
mod tests;
