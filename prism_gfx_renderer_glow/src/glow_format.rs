/// Conversions from prism_gfx enums to GL constants

use prism_gfx::prism::render::{
    BufferTarget, Capability, ClearMask, DepthCompare, IndexFormat, Primitive, ShaderStage,
};

pub(crate) fn shader_stage_to_gl(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

pub(crate) fn buffer_target_to_gl(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

pub(crate) fn primitive_to_gl(primitive: Primitive) -> u32 {
    match primitive {
        Primitive::Triangles => glow::TRIANGLES,
        Primitive::TriangleStrip => glow::TRIANGLE_STRIP,
    }
}

pub(crate) fn index_format_to_gl(format: IndexFormat) -> u32 {
    match format {
        IndexFormat::U16 => glow::UNSIGNED_SHORT,
    }
}

pub(crate) fn capability_to_gl(capability: Capability) -> u32 {
    match capability {
        Capability::DepthTest => glow::DEPTH_TEST,
    }
}

pub(crate) fn depth_compare_to_gl(compare: DepthCompare) -> u32 {
    match compare {
        DepthCompare::Less => glow::LESS,
        DepthCompare::LessOrEqual => glow::LEQUAL,
        DepthCompare::Equal => glow::EQUAL,
        DepthCompare::GreaterOrEqual => glow::GEQUAL,
        DepthCompare::Greater => glow::GREATER,
    }
}

pub(crate) fn clear_mask_to_gl(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.contains(ClearMask::COLOR) {
        bits |= glow::COLOR_BUFFER_BIT;
    }
    if mask.contains(ClearMask::DEPTH) {
        bits |= glow::DEPTH_BUFFER_BIT;
    }
    bits
}

#[cfg(test)]
#[path = "glow_format_tests.rs"]
mod tests;
