//! Error types for the Prism graphics layer
//!
//! Errors fall into three groups:
//! - fatal startup errors (missing surface, context creation failure)
//! - pipeline-terminal errors (shader compilation or program link failure)
//! - misuse of a resource (unlinked pipeline, unknown binding, wrong buffer role)

use std::fmt;
use crate::device::ShaderStage;

/// Result type for Prism operations
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of shader binding looked up in a linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Per-vertex input
    Attribute,
    /// Per-draw constant
    Uniform,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKind::Attribute => write!(f, "attribute"),
            BindingKind::Uniform => write!(f, "uniform"),
        }
    }
}

/// Prism errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The named output surface could not be located by the host
    SurfaceNotFound(String),

    /// The GPU context could not be created for the surface
    ContextCreationFailed(String),

    /// A shader stage failed to compile (carries the compiler log)
    ShaderCompilationFailed {
        stage: ShaderStage,
        log: String,
    },

    /// The program failed to link (carries the linker log)
    ProgramLinkFailed(String),

    /// A binding was requested from a pipeline that is not linked
    PipelineNotLinked(String),

    /// The linked program exposes no variable with this name
    BindingNotFound {
        kind: BindingKind,
        name: String,
    },

    /// Invalid resource usage (wrong buffer role, bad component count, ...)
    InvalidResource(String),

    /// Backend-specific error (driver message)
    BackendError(String),
}

impl Error {
    /// Whether the process cannot continue after this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::SurfaceNotFound(_) | Error::ContextCreationFailed(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SurfaceNotFound(name) => write!(f, "Output surface '{}' not found", name),
            Error::ContextCreationFailed(msg) => write!(f, "GPU context creation failed: {}", msg),
            Error::ShaderCompilationFailed { stage, log } => {
                write!(f, "{:?} shader compilation failed: {}", stage, log)
            }
            Error::ProgramLinkFailed(log) => write!(f, "Program link failed: {}", log),
            Error::PipelineNotLinked(name) => {
                write!(f, "Pipeline is not linked, cannot resolve '{}'", name)
            }
            Error::BindingNotFound { kind, name } => {
                write!(f, "No active {} named '{}' in linked program", kind, name)
            }
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an error (with file:line) and evaluate to it
///
/// # Example
///
/// ```ignore
/// return Err(engine_err!("prism::Pipeline", Error::ProgramLinkFailed(log)));
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $err:expr) => {{
        let err: $crate::prism::Error = $err;
        $crate::engine_error!($source, "{}", err);
        err
    }};
}

/// Log an error and return `Err(Error::InvalidResource(..))` from the current function
///
/// # Example
///
/// ```ignore
/// engine_bail!("prism::RenderBuffer", "component count must be >= 1, got {}", components);
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!(
            $source,
            $crate::prism::Error::InvalidResource(format!($($arg)*))
        ))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
