//! Mobile Surface Android Bridge
//!
//! JNI layer over [`mobile_surface`]. It registers three native method
//! tables in `JNI_OnLoad` (the surface view, the application's surface view
//! subclass, and the application class), unpacks Java arrays and strings
//! through scoped views, and calls back into Java from engine threads.
//!
//! # Usage
//!
//! The application's native library defines `JNI_OnLoad` with the engine it
//! embeds:
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! mobile_surface_android::export_mobile_surface!(|| {
//!     Ok(Arc::new(my_engine::World::new()?) as Arc<dyn mobile_surface::Engine>)
//! });
//! ```
//!
//! # Class paths
//!
//! Tables are registered on the classes named in
//! [`BridgeConfig::classes`](mobile_surface::BridgeConfig). Registration
//! failure makes `JNI_OnLoad` return `JNI_ERR` and the library fails to load.

mod bridge;
mod callbacks;
mod error;
pub mod logging;
pub mod marshal;
mod mobile_app;
mod onload;
mod surface_view;
mod user_surface_view;
mod window;

pub use bridge::{bridge, release_flags, surface_handle, AndroidBridge};
pub use callbacks::{JavaCallbackTarget, JniAttacher};
pub use error::{BridgeError, Result};
pub use onload::{on_load, register, NativeEntry};
pub use window::{NativeWindowLease, WindowLeases};

#[doc(hidden)]
pub mod __private {
    pub use jni;
    pub use mobile_surface::BridgeConfig;
}
