#![allow(dead_code)]
//! Recording test utilities - headless device and cube scene fixtures
//!
//! Integration tests run against a `RecordingContext` handed out by a
//! `MockHost`, so no GPU or window is needed. The returned context shares its
//! state with the one owned by the device and can be inspected after each call.

use prism_gfx::glam::{Mat4, Vec3};
use prism_gfx::prism::render::{DepthCompare, MockHost, RecordingContext, RenderPass};
use prism_gfx::prism::resource::{Mesh, Pipeline, ShaderSources};
use prism_gfx::prism::{DeviceConfig, RenderDevice};

pub const CUBE_VERTEX_SHADER: &str = "\
attribute vec4 aVertexPosition;
attribute vec4 aVertexColor;

uniform mat4 uModelViewMatrix;
uniform mat4 uProjectionMatrix;

varying lowp vec4 vColor;

void main(void) {
    gl_Position = uProjectionMatrix * uModelViewMatrix * aVertexPosition;
    vColor = aVertexColor;
}
";

pub const CUBE_FRAGMENT_SHADER: &str = "\
varying lowp vec4 vColor;

void main(void) {
    gl_FragColor = vColor;
}
";

/// World positions of the three demo cubes
pub const CUBE_POSITIONS: [[f32; 3]; 3] = [[-1.6, 0.3, -6.0], [0.0, -0.6, -4.0], [2.0, 0.0, -6.6]];

/// Create a device on a fresh 800x600 mock host
pub fn create_test_device() -> (RenderDevice, RecordingContext) {
    let mut host = MockHost::new();
    let device = RenderDevice::initialize(DeviceConfig::default(), &mut host)
        .expect("mock host always provides a surface");
    (device, host.context().clone())
}

/// 24 positions (4 per face), 3 floats each
pub fn cube_positions() -> Vec<f32> {
    vec![
        // Front
        -1.0, -1.0, 1.0, 1.0, -1.0, 1.0, 1.0, 1.0, 1.0, -1.0, 1.0, 1.0,
        // Back
        -1.0, -1.0, -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, 1.0, -1.0, -1.0,
        // Top
        -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, -1.0,
        // Bottom
        -1.0, -1.0, -1.0, 1.0, -1.0, -1.0, 1.0, -1.0, 1.0, -1.0, -1.0, 1.0,
        // Right
        1.0, -1.0, -1.0, 1.0, 1.0, -1.0, 1.0, 1.0, 1.0, 1.0, -1.0, 1.0,
        // Left
        -1.0, -1.0, -1.0, -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, 1.0, -1.0,
    ]
}

/// One RGBA color per face, repeated for its 4 vertices
pub fn cube_colors() -> Vec<f32> {
    let faces: [[f32; 4]; 6] = [
        [1.0, 1.0, 1.0, 1.0],
        [1.0, 0.0, 0.0, 1.0],
        [0.0, 1.0, 0.0, 1.0],
        [0.0, 0.0, 1.0, 1.0],
        [1.0, 1.0, 0.0, 1.0],
        [1.0, 0.0, 1.0, 1.0],
    ];
    faces.iter().flat_map(|c| c.iter().copied().cycle().take(16)).collect()
}

/// Two triangles per face
pub fn cube_indices() -> Vec<u16> {
    (0..6u16)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base, base + 2, base + 3]
        })
        .collect()
}

/// Linked cube pipeline with its attributes and uniforms resolved
pub fn create_cube_pipeline(device: &RenderDevice) -> Pipeline<'_> {
    let sources = ShaderSources::new(CUBE_VERTEX_SHADER, CUBE_FRAGMENT_SHADER);
    let mut pipeline = Pipeline::from_sources(device, &sources).expect("cube shaders link");
    pipeline.resolve_attribute("vertexPosition", "aVertexPosition").expect("position attribute");
    pipeline.resolve_attribute("vertexColor", "aVertexColor").expect("color attribute");
    pipeline.resolve_uniform("projectionMatrix", "uProjectionMatrix").expect("projection uniform");
    pipeline.resolve_uniform("modelViewMatrix", "uModelViewMatrix").expect("model-view uniform");
    pipeline
}

/// Cube mesh fed from the pipeline's resolved slots
pub fn create_cube_mesh<'d>(device: &'d RenderDevice, pipeline: &Pipeline<'_>, position: Vec3) -> Mesh<'d> {
    let mut mesh = Mesh::new(device);
    let position_slot = pipeline.attribute("vertexPosition").expect("resolved");
    let color_slot = pipeline.attribute("vertexColor").expect("resolved");
    mesh.add_attribute(position_slot, 3, cube_positions()).expect("position upload");
    mesh.add_attribute(color_slot, 4, cube_colors()).expect("color upload");
    mesh.add_indices(cube_indices()).expect("index upload");
    mesh.set_position(position);
    mesh
}

/// Main pass of the demo: dark blue clear, depth 1.0 with LEQUAL
pub fn main_pass() -> RenderPass {
    RenderPass::new()
        .with_color([0.1, 0.25, 0.5, 1.0])
        .with_depth(1.0, DepthCompare::LessOrEqual)
}

/// 45° perspective for the device's surface
pub fn projection(device: &RenderDevice) -> Mat4 {
    Mat4::perspective_rh_gl(45f32.to_radians(), device.aspect_ratio(), 0.1, 100.0)
}

/// Model-view of cube `index` at `rotation` radians
pub fn cube_model_view(index: usize, position: Vec3, rotation: f32) -> Mat4 {
    let spin = match index {
        0 => Mat4::from_rotation_y(rotation * 0.4),
        1 => Mat4::from_rotation_x(rotation * 0.8),
        _ => Mat4::from_rotation_z(rotation * 0.2),
    };
    Mat4::from_translation(position) * spin * Mat4::from_scale(Vec3::splat(0.5))
}
