//! Error type shared by the whole viewer.
//!
//! Setup failures (shader, buffer, window) are fatal and keep the renderer out of the render
//! loop. Invalid parameters are reported without touching any state.

use std::fmt;
use std::path::PathBuf;

use glam::Vec3;

/// Convenience alias used throughout the crate.
pub type Result<T, E = ViewerError> = std::result::Result<T, E>;

/// Shader pipeline stage, used when reporting compile errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug)]
pub enum ViewerError {
    /// A shader stage failed to compile.
    ShaderCompile { stage: ShaderStage, log: String },
    /// The shader program failed to link.
    ShaderLink(String),
    /// The linked program does not expose a uniform the renderer writes.
    MissingUniform(&'static str),
    /// The linked program does not read an attribute at its expected slot.
    MissingAttribute(&'static str),
    /// The device could not allocate a vertex buffer.
    BufferAllocation(String),
    /// A scale factor outside the accepted range.
    InvalidScale(f32),
    /// Rotation angles that are not finite.
    InvalidRotation(Vec3),
    /// `render_frame` was called before `initialize`.
    NotInitialized,
    /// `initialize` was called twice.
    AlreadyInitialized,
    /// The renderer has been shut down.
    ShutDown,
    /// A mesh file could not be read or parsed.
    MeshLoad { path: PathBuf, reason: String },
    /// The configuration file is invalid.
    Config(String),
    /// Window or GL context creation failed.
    Window(String),
    Logging(String),
    Io(std::io::Error),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::ShaderCompile { stage, log } => {
                write!(f, "failed to compile {stage} shader: {log}")
            }
            ViewerError::ShaderLink(log) => write!(f, "failed to link shader program: {log}"),
            ViewerError::MissingUniform(name) => {
                write!(f, "shader program has no active uniform '{name}'")
            }
            ViewerError::MissingAttribute(name) => {
                write!(f, "shader program has no active attribute '{name}'")
            }
            ViewerError::BufferAllocation(reason) => {
                write!(f, "failed to allocate vertex buffer: {reason}")
            }
            ViewerError::InvalidScale(value) => {
                write!(
                    f,
                    "scale factor must lie in [{}, {}], got {value}",
                    crate::transform::MIN_SCALE,
                    crate::transform::MAX_SCALE
                )
            }
            ViewerError::InvalidRotation(value) => {
                write!(f, "rotation angles must be finite, got {value}")
            }
            ViewerError::NotInitialized => f.write_str("renderer is not initialized"),
            ViewerError::AlreadyInitialized => f.write_str("renderer is already initialized"),
            ViewerError::ShutDown => f.write_str("renderer has been shut down"),
            ViewerError::MeshLoad { path, reason } => {
                write!(f, "failed to load mesh {}: {reason}", path.display())
            }
            ViewerError::Config(reason) => write!(f, "invalid configuration: {reason}"),
            ViewerError::Window(reason) => write!(f, "failed to create window: {reason}"),
            ViewerError::Logging(reason) => write!(f, "failed to initialize logging: {reason}"),
            ViewerError::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ViewerError {
    fn from(err: std::io::Error) -> Self {
        ViewerError::Io(err)
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        ViewerError::Config(err.to_string())
    }
}

impl From<log::SetLoggerError> for ViewerError {
    fn from(err: log::SetLoggerError) -> Self {
        ViewerError::Logging(err.to_string())
    }
}

impl ViewerError {
    /// Returns `true` for errors that make rendering impossible.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ViewerError::ShaderCompile { .. }
                | ViewerError::ShaderLink(_)
                | ViewerError::MissingUniform(_)
                | ViewerError::MissingAttribute(_)
                | ViewerError::BufferAllocation(_)
                | ViewerError::Window(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_errors_are_fatal_mesh_errors_are_not() {
        let shader = ViewerError::ShaderCompile {
            stage: ShaderStage::Fragment,
            log: "0:1: syntax error".to_string(),
        };
        assert!(shader.is_fatal());
        assert!(shader.to_string().contains("fragment"));

        let mesh = ViewerError::MeshLoad {
            path: PathBuf::from("knot.obj"),
            reason: "no such file".to_string(),
        };
        assert!(!mesh.is_fatal());
        assert!(!ViewerError::InvalidScale(0.0).is_fatal());
        assert!(!ViewerError::InvalidRotation(Vec3::NAN).is_fatal());
    }
}
