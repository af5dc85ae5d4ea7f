/// GraphicsContext trait - the immediate-mode GPU primitives
///
/// Every GPU call made by the layer goes through this trait. It mirrors an
/// OpenGL ES 3 / WebGL2 style context: one global state machine, objects named
/// by handles, commands executed in the order they are issued.
///
/// Methods take `&self` because the underlying API is a shared state machine.
/// Implementations are single-threaded and need not be `Send` or `Sync`.

use bitflags::bitflags;
use slotmap::new_key_type;
use crate::error::Result;

// ===== HANDLES =====

new_key_type! {
    /// Handle to a shader object owned by the context
    pub struct ShaderId;

    /// Handle to a program object owned by the context
    pub struct ProgramId;

    /// Handle to a buffer object owned by the context
    pub struct BufferId;

    /// Handle to a resolved uniform location of a linked program
    pub struct UniformId;
}

// ===== ENUMS =====

/// Programmable shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderStage {
    /// Vertex stage
    Vertex,
    /// Fragment stage
    Fragment,
}

impl ShaderStage {
    /// Both stages, in compile order
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];
}

/// Buffer binding target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    /// Vertex attribute data
    Array,
    /// Index data
    ElementArray,
}

/// Primitive assembly mode for draw calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Discrete triangles, three vertices each
    Triangles,
    /// Connected strip, each vertex after the second adds a triangle
    TriangleStrip,
}

/// Element type of index buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    /// 16-bit unsigned indices
    U16,
}

impl IndexFormat {
    /// Size in bytes of one index element
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexFormat::U16 => 2,
        }
    }
}

/// Fixed-function capability toggled with `enable`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Depth testing
    DepthTest,
}

/// Depth comparison function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthCompare {
    /// Pass if incoming < stored
    Less,
    /// Pass if incoming <= stored
    LessOrEqual,
    /// Pass if incoming == stored
    Equal,
    /// Pass if incoming >= stored
    GreaterOrEqual,
    /// Pass if incoming > stored
    Greater,
}

bitflags! {
    /// Attachments reset by a single `clear` call
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearMask: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
    }
}

// ===== TRAIT =====

/// Immediate-mode GPU context
///
/// Implemented by backends (e.g. the glow backend) and by
/// [`RecordingContext`](crate::device::RecordingContext) for headless use.
pub trait GraphicsContext {
    // ----- shaders -----

    /// Create an empty shader object for a stage
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId>;

    /// Replace the source text of a shader object
    fn shader_source(&self, shader: ShaderId, source: &str);

    /// Compile the current source of a shader object
    fn compile_shader(&self, shader: ShaderId);

    /// Whether the last compilation succeeded
    fn shader_compile_status(&self, shader: ShaderId) -> bool;

    /// Compiler diagnostic of the last compilation
    fn shader_info_log(&self, shader: ShaderId) -> String;

    /// Delete a shader object
    fn delete_shader(&self, shader: ShaderId);

    // ----- programs -----

    /// Create an empty program object
    fn create_program(&self) -> Result<ProgramId>;

    /// Attach a compiled shader to a program
    fn attach_shader(&self, program: ProgramId, shader: ShaderId);

    /// Detach a shader from a program
    fn detach_shader(&self, program: ProgramId, shader: ShaderId);

    /// Link the attached shaders into an executable program
    fn link_program(&self, program: ProgramId);

    /// Whether the last link succeeded
    fn program_link_status(&self, program: ProgramId) -> bool;

    /// Linker diagnostic of the last link
    fn program_info_log(&self, program: ProgramId) -> String;

    /// Delete a program object
    fn delete_program(&self, program: ProgramId);

    /// Make a program current (`None` unbinds)
    fn use_program(&self, program: Option<ProgramId>);

    /// Attribute index of an active vertex input, if any
    fn attribute_location(&self, program: ProgramId, name: &str) -> Option<u32>;

    /// Location of an active uniform, if any
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformId>;

    // ----- buffers -----

    /// Create an empty buffer object
    fn create_buffer(&self) -> Result<BufferId>;

    /// Bind a buffer to a target (`None` unbinds)
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>);

    /// Upload bytes into the buffer bound to `target` (static usage)
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);

    /// Delete a buffer object
    fn delete_buffer(&self, buffer: BufferId);

    /// Describe float vertex data of the bound array buffer for an attribute slot
    fn vertex_attrib_pointer_f32(
        &self,
        slot: u32,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );

    /// Enable an attribute slot for subsequent draws
    fn enable_vertex_attrib_array(&self, slot: u32);

    /// Stop sourcing an attribute slot from its buffer
    fn disable_vertex_attrib_array(&self, slot: u32);

    // ----- clear / depth state -----

    /// Set the color clear value
    fn clear_color(&self, rgba: [f32; 4]);

    /// Set the depth clear value
    fn clear_depth(&self, depth: f32);

    /// Enable a fixed-function capability
    fn enable(&self, capability: Capability);

    /// Set the depth comparison function
    fn depth_func(&self, compare: DepthCompare);

    /// Clear the attachments in `mask`
    fn clear(&self, mask: ClearMask);

    // ----- draws -----

    /// Non-indexed draw over `count` consecutive vertices from `first`
    fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32);

    /// Indexed draw of `count` indices starting at `byte_offset` in the bound index buffer
    fn draw_elements(&self, primitive: Primitive, count: i32, format: IndexFormat, byte_offset: i32);

    // ----- uniforms -----

    /// Upload a column-major 4x4 matrix to a uniform of the current program
    fn uniform_matrix4(&self, location: UniformId, transpose: bool, value: &[f32; 16]);

    // ----- diagnostics -----

    /// Pop the oldest pending error code, if any
    fn take_error(&self) -> Option<u32>;
}
