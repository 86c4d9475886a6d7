//! Rendering engine seam
//!
//! The rendering engine itself (scene graph, drivers, file import) lives
//! outside this crate. These traits are the only surface the bridge needs
//! from it.

use crate::coords::WindowSize;
use crate::dispatch::{EventDispatcher, Notifier};
use crate::error::EngineError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Opaque platform window handle (an `ANativeWindow*` on Android)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowHandle(usize);

impl WindowHandle {
    /// Wrap a raw window pointer value
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Raw window pointer value
    pub const fn as_raw(self) -> usize {
        self.0
    }
}

/// Opaque, engine-defined windowing integration data
///
/// On Android this points at a table holding the Java VM and the
/// application context. The engine alone interprets it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlatformData(usize);

impl PlatformData {
    /// Wrap a raw platform data value
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Raw platform data value
    pub const fn as_raw(self) -> usize {
        self.0
    }
}

/// Rendering driver
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Driver {
    /// OpenGL ES 2, the only driver available on mobile
    OpenGl2,
}

/// Options used when creating a canvas for a window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowOptions {
    /// Rendering driver
    pub driver: Driver,
    /// Whether the window may use anti-aliasing
    pub anti_alias_capable: bool,
    /// Whether the framebuffer is retained between updates
    pub framebuffer_retention: bool,
    /// Windowing integration data, if registered
    pub platform_data: Option<PlatformData>,
}

impl WindowOptions {
    /// The fixed options used for mobile surfaces
    pub const fn mobile() -> Self {
        Self {
            driver: Driver::OpenGl2,
            anti_alias_capable: false,
            framebuffer_retention: false,
            platform_data: None,
        }
    }

    /// Attach platform data
    pub fn with_platform_data(mut self, platform_data: Option<PlatformData>) -> Self {
        self.platform_data = platform_data;
        self
    }
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self::mobile()
    }
}

/// Kind of canvas update
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    /// Let the engine decide what needs redrawing
    Default,
    /// Redraw what is already there
    Refresh,
    /// Finish all current and pending work
    Complete,
}

/// Identity of a canvas, stable for its lifetime
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CanvasId(pub u64);

/// Application actions forwarded to a surface's canvas
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceAction {
    /// Import a model file
    LoadFile(PathBuf),
    /// Switch the default operator to orbit
    SetOperatorOrbit,
    /// Toggle simple shadows
    SimpleShadow(bool),
    /// Smooth shading mode
    SmoothMode,
    /// Hidden line mode
    HiddenLineMode,
    /// Application-defined action slot (1 to 4)
    UserCode(u8),
}

impl fmt::Display for SurfaceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceAction::LoadFile(path) => write!(f, "load file {}", path.display()),
            SurfaceAction::SetOperatorOrbit => write!(f, "set operator orbit"),
            SurfaceAction::SimpleShadow(enable) => write!(f, "simple shadow {}", enable),
            SurfaceAction::SmoothMode => write!(f, "smooth mode"),
            SurfaceAction::HiddenLineMode => write!(f, "hidden line mode"),
            SurfaceAction::UserCode(slot) => write!(f, "user code {}", slot),
        }
    }
}

/// A renderable area bound to a platform window
///
/// Canvases are shared handles: every method takes `&self` and may be
/// called from any thread. Surfaces call them without holding their own
/// state lock, so an engine may dispatch events from inside any of them.
pub trait Canvas: Send + Sync {
    /// Stable identity of this canvas
    fn id(&self) -> CanvasId;

    /// Window this canvas currently renders to
    fn window_handle(&self) -> WindowHandle;

    /// Rebind to a new platform window without recreating the canvas
    fn set_window_handle(&self, window: WindowHandle);

    /// Current window size in pixels
    fn window_size(&self) -> WindowSize;

    /// Request an update; does not block
    fn update(&self, kind: UpdateKind);

    /// Request an update and return a notifier for its completion
    fn update_with_notifier(&self, kind: UpdateKind) -> Notifier;

    /// Dispatcher owned by this canvas' window
    fn dispatcher(&self) -> Arc<EventDispatcher>;

    /// Run an application action; returns whether it succeeded
    ///
    /// May run for a long time (file import).
    fn perform(&self, action: &SurfaceAction) -> bool;

    /// Destroy the canvas; no further calls are valid
    fn delete(&self);
}

/// The process-wide rendering engine
pub trait Engine: Send + Sync {
    /// Create a canvas rendering into `window`
    fn create_canvas(
        &self,
        window: WindowHandle,
        options: &WindowOptions,
    ) -> Result<Arc<dyn Canvas>, EngineError>;

    /// Reclaim resources released by deleted canvases
    fn synchronize(&self);

    /// Process-wide dispatcher
    fn dispatcher(&self) -> Arc<EventDispatcher>;

    /// Directory holding CAD import libraries
    fn set_library_directory(&self, dir: &Path);

    /// Directory holding fonts
    fn set_font_directory(&self, dir: &Path);

    /// Directory holding material libraries
    fn set_materials_directory(&self, dir: &Path);

    /// Tear the engine down; no further calls are valid
    fn shutdown(&self);
}

/// Creates the engine on first use
pub type EngineFactory = Box<dyn Fn() -> Result<Arc<dyn Engine>, EngineError> + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_options() {
        let options = WindowOptions::mobile();
        assert_eq!(options.driver, Driver::OpenGl2);
        assert!(!options.anti_alias_capable);
        assert!(!options.framebuffer_retention);
        assert_eq!(options.platform_data, None);
    }

    #[test]
    fn test_platform_data_attached() {
        let data = PlatformData::from_raw(0x1000);
        let options = WindowOptions::mobile().with_platform_data(Some(data));
        assert_eq!(options.platform_data.map(PlatformData::as_raw), Some(0x1000));
    }

    #[test]
    fn test_action_display() {
        assert_eq!(SurfaceAction::UserCode(3).to_string(), "user code 3");
        assert_eq!(
            SurfaceAction::SimpleShadow(true).to_string(),
            "simple shadow true"
        );
    }
}
