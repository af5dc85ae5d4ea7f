//! Scene module
//!
//! Per-frame driver owning pipelines, drawables and the main render pass.

mod scene;

pub use scene::{Scene, PipelineId, DrawableId, FrameReport};
