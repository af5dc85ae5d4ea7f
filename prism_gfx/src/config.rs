//! Configuration types

/// Render device configuration
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Name the host uses to locate the output surface (e.g. a canvas id)
    pub surface_name: String,
    /// Application name, reported in logs
    pub app_name: String,
    /// Poll the context for errors after each draw and log them
    pub enable_validation: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            surface_name: "glcanvas".to_string(),
            app_name: "Prism Application".to_string(),
            enable_validation: cfg!(debug_assertions),
        }
    }
}

/// Semantic names the scene driver uploads per draw
#[derive(Debug, Clone)]
pub struct UniformNames {
    /// Projection matrix, uploaded once per drawable
    pub projection: String,
    /// Model-view matrix of the drawable
    pub model_view: String,
}

impl Default for UniformNames {
    fn default() -> Self {
        Self {
            projection: "projectionMatrix".to_string(),
            model_view: "modelViewMatrix".to_string(),
        }
    }
}
