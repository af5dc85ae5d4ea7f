/// Tests for RecordingContext and MockHost

use super::*;

const VERTEX: &str = "\
attribute vec4 aVertexPosition;
attribute vec4 aVertexColor; // per-vertex color
uniform mat4 uModelViewMatrix;
uniform mat4 uProjectionMatrix;
varying lowp vec4 vColor;
void main() { gl_Position = uProjectionMatrix * uModelViewMatrix * aVertexPosition; vColor = aVertexColor; }
";

const FRAGMENT: &str = "\
varying lowp vec4 vColor;
void main() { gl_FragColor = vColor; }
";

fn link(context: &RecordingContext, vertex: &str, fragment: &str) -> ProgramId {
    let program = context.create_program().unwrap();
    for (stage, source) in [(ShaderStage::Vertex, vertex), (ShaderStage::Fragment, fragment)] {
        let shader = context.create_shader(stage).unwrap();
        context.shader_source(shader, source);
        context.compile_shader(shader);
        context.attach_shader(program, shader);
    }
    context.link_program(program);
    program
}

// ============================================================================
// DECLARATION SCANNING
// ============================================================================

#[test]
fn test_declared_names_legacy_qualifiers() {
    assert_eq!(
        declared_names(VERTEX, &["attribute", "in"]),
        vec!["aVertexPosition".to_string(), "aVertexColor".to_string()]
    );
    assert_eq!(
        declared_names(VERTEX, &["uniform"]),
        vec!["uModelViewMatrix".to_string(), "uProjectionMatrix".to_string()]
    );
}

#[test]
fn test_declared_names_es3_layout_and_arrays() {
    let source = "#version 300 es\nlayout(location = 0) in vec3 aPos;\nin vec2 aUv;\nuniform vec4 uColors[4];\nout vec4 color;\n";
    assert_eq!(declared_names(source, &["in"]), vec!["aPos".to_string(), "aUv".to_string()]);
    assert_eq!(declared_names(source, &["uniform"]), vec!["uColors".to_string()]);
}

#[test]
fn test_declared_names_ignores_comments() {
    let source = "// uniform mat4 uHidden;\nuniform float uTime;";
    assert_eq!(declared_names(source, &["uniform"]), vec!["uTime".to_string()]);
}

// ============================================================================
// SHADERS AND PROGRAMS
// ============================================================================

#[test]
fn test_link_exposes_attributes_and_uniforms() {
    let context = RecordingContext::new();
    let program = link(&context, VERTEX, FRAGMENT);

    assert!(context.program_link_status(program));
    assert_eq!(context.attribute_location(program, "aVertexPosition"), Some(0));
    assert_eq!(context.attribute_location(program, "aVertexColor"), Some(1));
    assert_eq!(context.attribute_location(program, "vColor"), None);
    assert!(context.uniform_location(program, "uModelViewMatrix").is_some());
    assert!(context.uniform_location(program, "uNormalMatrix").is_none());
}

#[test]
fn test_source_without_main_fails_to_compile() {
    let context = RecordingContext::new();
    let shader = context.create_shader(ShaderStage::Fragment).unwrap();
    context.shader_source(shader, "precision mediump float;");
    context.compile_shader(shader);

    assert!(!context.shader_compile_status(shader));
    assert!(context.shader_info_log(shader).contains("main"));
}

#[test]
fn test_injected_compile_failure() {
    let context = RecordingContext::new();
    context.fail_compile(ShaderStage::Vertex, "ERROR: 0:2: 'vec5' : undeclared");
    let program = link(&context, VERTEX, FRAGMENT);

    assert!(!context.program_link_status(program));
    assert!(context.program_info_log(program).contains("not successfully compiled"));
}

#[test]
fn test_injected_link_failure() {
    let context = RecordingContext::new();
    context.fail_link("varying mismatch");
    let program = link(&context, VERTEX, FRAGMENT);

    assert!(!context.program_link_status(program));
    assert_eq!(context.program_info_log(program), "varying mismatch");
    assert_eq!(context.attribute_location(program, "aVertexPosition"), None);
}

#[test]
fn test_delete_program_clears_current() {
    let context = RecordingContext::new();
    let program = link(&context, VERTEX, FRAGMENT);
    context.use_program(Some(program));
    assert_eq!(context.current_program(), Some(program));

    context.delete_program(program);
    assert_eq!(context.current_program(), None);
    assert_eq!(context.live_programs(), 0);
}

#[test]
fn test_object_creation_failure() {
    let context = RecordingContext::new();
    context.fail_object_creation(true);

    assert!(context.create_shader(ShaderStage::Vertex).is_err());
    assert!(context.create_program().is_err());
    assert!(context.create_buffer().is_err());
    assert!(context.commands().is_empty());
}

// ============================================================================
// BUFFERS AND DRAWS
// ============================================================================

#[test]
fn test_buffer_data_stores_bytes() {
    let context = RecordingContext::new();
    let buffer = context.create_buffer().unwrap();
    context.bind_buffer(BufferTarget::Array, Some(buffer));
    context.buffer_data(BufferTarget::Array, &[1, 2, 3, 4]);

    assert_eq!(context.buffer_contents(buffer), Some(vec![1, 2, 3, 4]));
    assert!(context.take_error().is_none());
}

#[test]
fn test_buffer_data_without_binding_is_invalid() {
    let context = RecordingContext::new();
    context.buffer_data(BufferTarget::ElementArray, &[0, 0]);
    assert_eq!(context.take_error(), Some(INVALID_OPERATION));
}

#[test]
fn test_draw_record_captures_bound_state() {
    let context = RecordingContext::new();
    let program = link(&context, VERTEX, FRAGMENT);
    let vertices = context.create_buffer().unwrap();
    let indices = context.create_buffer().unwrap();

    context.use_program(Some(program));
    context.bind_buffer(BufferTarget::Array, Some(vertices));
    context.vertex_attrib_pointer_f32(0, 3, false, 0, 0);
    context.enable_vertex_attrib_array(0);
    // Pointer set but slot never enabled: not part of the draw
    context.vertex_attrib_pointer_f32(1, 4, false, 0, 0);
    context.bind_buffer(BufferTarget::ElementArray, Some(indices));
    context.draw_elements(Primitive::Triangles, 36, IndexFormat::U16, 0);

    let draws = context.draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].program, Some(program));
    assert_eq!(draws[0].attributes.len(), 1);
    assert_eq!(draws[0].attributes.get(&0), Some(&vertices));
    assert_eq!(draws[0].index_buffer, Some(indices));
    assert!(draws[0].command.is_draw());
    assert!(context.take_error().is_none());
}

#[test]
fn test_disabled_slot_is_not_part_of_draw() {
    let context = RecordingContext::new();
    let program = link(&context, VERTEX, FRAGMENT);
    let vertices = context.create_buffer().unwrap();

    context.use_program(Some(program));
    context.bind_buffer(BufferTarget::Array, Some(vertices));
    context.vertex_attrib_pointer_f32(0, 3, false, 0, 0);
    context.enable_vertex_attrib_array(0);
    context.disable_vertex_attrib_array(0);
    context.draw_arrays(Primitive::TriangleStrip, 0, 3);

    let draws = context.draws();
    assert!(draws[0].attributes.is_empty());
    assert!(context
        .commands()
        .contains(&GpuCommand::DisableVertexAttribArray { slot: 0 }));
}

#[test]
fn test_indexed_draw_without_index_buffer_is_invalid() {
    let context = RecordingContext::new();
    let program = link(&context, VERTEX, FRAGMENT);
    context.use_program(Some(program));
    context.draw_elements(Primitive::Triangles, 3, IndexFormat::U16, 0);

    assert_eq!(context.take_error(), Some(INVALID_OPERATION));
    assert_eq!(context.take_error(), None);
}

#[test]
fn test_uniform_upload_requires_owning_program() {
    let context = RecordingContext::new();
    let first = link(&context, VERTEX, FRAGMENT);
    let second = link(&context, VERTEX, FRAGMENT);
    let location = context.uniform_location(first, "uProjectionMatrix").unwrap();

    context.use_program(Some(second));
    context.uniform_matrix4(location, false, &[0.0; 16]);
    assert_eq!(context.take_error(), Some(INVALID_OPERATION));

    context.use_program(Some(first));
    context.uniform_matrix4(location, false, &[0.0; 16]);
    assert_eq!(context.take_error(), None);
}

#[test]
fn test_clones_share_state() {
    let context = RecordingContext::new();
    let handle = context.clone();
    context.clear_color([1.0, 0.0, 0.0, 1.0]);

    assert_eq!(handle.commands(), vec![GpuCommand::ClearColor([1.0, 0.0, 0.0, 1.0])]);
    handle.clear_commands();
    assert!(context.commands().is_empty());
}

// ============================================================================
// MOCK HOST
// ============================================================================

#[test]
fn test_mock_host_locates_named_surface() {
    let mut host = MockHost::new().with_resolution(320, 240);
    assert!(host.locate_surface("other").is_none());

    let surface = host.locate_surface("glcanvas").unwrap();
    assert_eq!(surface.name(), "glcanvas");
    assert_eq!(surface.resolution(), Resolution::new(320, 240));

    host.resize(640, 480);
    assert_eq!(surface.resolution(), Resolution::new(640, 480));
}

#[test]
fn test_mock_host_without_surface() {
    let mut host = MockHost::new().without_surface();
    assert!(host.locate_surface("glcanvas").is_none());
}

#[test]
fn test_mock_host_context_failure() {
    let mut host = MockHost::new().with_context_failure("no webgl2");
    let surface = host.locate_surface("glcanvas").unwrap();
    let result = host.create_context(surface.as_ref(), &DeviceConfig::default());
    assert_eq!(result.err(), Some(Error::ContextCreationFailed("no webgl2".to_string())));
}
