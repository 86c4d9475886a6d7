//! Mobile Surface Bridge
//!
//! Platform-independent core of the bridge between a mobile UI layer and an
//! embedded rendering engine. The platform layer (JNI on Android) unpacks
//! managed arguments and calls into a [`BridgeContext`], which owns the
//! surfaces and the lazily created [`MobileApp`].
//!
//! # Architecture
//!
//! ```text
//! platform input callback
//!        │  marshal (scoped views of managed arrays)
//!        ▼
//! BridgeContext ──▶ SurfaceRegistry ──▶ MobileSurface (validity gate)
//!                                             │ pixel → window space
//!                                             ▼
//!                                   canvas EventDispatcher ──▶ engine handlers
//!                                                                  │
//!        managed callback  ◀── AttachGuard ◀── CallbackHandler ◀───┘
//! ```
//!
//! The engine is reached only through the [`Engine`] and [`Canvas`] traits.
//!
//! # Example
//!
//! ```ignore
//! use mobile_surface::prelude::*;
//!
//! let context = BridgeContext::new(Box::new(|| Ok(my_engine())), BridgeConfig::default());
//! let handle = context.create_surface(7);
//! if context.bind(handle, WindowHandle::from_raw(native_window as usize)) {
//!     let batch = TouchBatch::from_slices(1, &[100], &[200], &[42]);
//!     context.touch_down(handle, &batch);
//! }
//! context.release(handle, ReleaseFlags::empty());
//! ```

mod app;
mod config;
mod context;
mod coords;
mod dispatch;
mod engine;
mod error;
mod event;
mod input;
pub mod marshal;
pub mod reentry;
mod registry;
mod surface;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use app::{LogHandler, MobileApp};
pub use config::{BridgeConfig, ClassPaths, ConfigError, DirectoryConfig, LogConfig, LogLevel};
pub use context::BridgeContext;
pub use coords::{pixel_to_window, window_to_pixel, Point, WindowSize};
pub use dispatch::{
    Completer, EventDispatcher, EventHandler, HandleResult, Notifier, SubscriptionId,
};
pub use engine::{
    Canvas, CanvasId, Driver, Engine, EngineFactory, PlatformData, SurfaceAction, UpdateKind,
    WindowHandle, WindowOptions,
};
pub use error::{EngineError, Result, SurfaceError};
pub use event::{Event, EventKind, Touch, TouchAction, TouchEvent, TouchId};
pub use input::{TouchBatch, TouchSample};
pub use registry::{SurfaceHandle, SurfaceRegistry};
pub use surface::{MobileSurface, ReleaseFlags, SurfaceState};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::BridgeConfig;
    pub use crate::context::BridgeContext;
    pub use crate::engine::{Canvas, Engine, PlatformData, SurfaceAction, WindowHandle};
    pub use crate::error::{EngineError, Result, SurfaceError};
    pub use crate::event::{Event, EventKind, TouchId};
    pub use crate::input::TouchBatch;
    pub use crate::registry::SurfaceHandle;
    pub use crate::surface::{ReleaseFlags, SurfaceState};
}
