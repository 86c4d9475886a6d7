//! Surface and engine error types

use thiserror::Error;

/// Errors reported by a rendering engine implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine could not be created
    #[error("Engine initialization failed: {0}")]
    InitFailed(String),

    /// The engine failed to create a canvas for a window
    #[error("Failed to create canvas: {0}")]
    CanvasCreation(String),

    /// Generic engine error
    #[error("Engine error: {0}")]
    Other(String),
}

/// Surface lifecycle and bridge errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// Error from the underlying engine
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The app has been shut down; the engine may no longer be used
    #[error("App has been shut down")]
    ShutDown,

    /// No surface is registered for the given handle
    #[error("Unknown surface handle: {0}")]
    UnknownHandle(i64),

    /// A managed string or array could not be viewed from native code
    #[error("Failed to acquire native view: {0}")]
    Acquire(String),
}

/// Result type for surface operations
pub type Result<T> = std::result::Result<T, SurfaceError>;
