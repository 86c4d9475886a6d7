//! Native windows behind Java surfaces
//!
//! `ANativeWindow_fromSurface` hands out a counted reference. The bridge
//! keeps one per surface handle for as long as a canvas may draw into it.

use crate::error::{BridgeError, Result};
use jni::objects::JObject;
use jni::JNIEnv;
use mobile_surface::{BridgeContext, ReleaseFlags, SurfaceHandle, WindowHandle};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::debug;

#[cfg(target_os = "android")]
use ndk::native_window::NativeWindow;

/// A counted `ANativeWindow` reference
#[cfg(target_os = "android")]
pub struct NativeWindowLease(NativeWindow);

#[cfg(target_os = "android")]
impl NativeWindowLease {
    /// Acquire the native window behind `surface`
    pub fn from_surface(env: &JNIEnv<'_>, surface: &JObject<'_>) -> Result<Self> {
        if surface.is_null() {
            return Err(BridgeError::NullArgument("Surface"));
        }
        // SAFETY: `env` is the live env of the calling thread and `surface`
        // is a valid local reference for the duration of the call
        let window = unsafe { NativeWindow::from_surface(env.get_raw(), surface.as_raw()) };
        window.map(Self).ok_or(BridgeError::NoNativeWindow)
    }

    pub fn handle(&self) -> WindowHandle {
        WindowHandle::from_raw(self.0.ptr().as_ptr() as usize)
    }
}

/// Placeholder for non-Android builds
#[cfg(not(target_os = "android"))]
pub struct NativeWindowLease(());

#[cfg(not(target_os = "android"))]
impl NativeWindowLease {
    pub fn from_surface(_env: &JNIEnv<'_>, _surface: &JObject<'_>) -> Result<Self> {
        Err(BridgeError::Unsupported)
    }

    pub fn handle(&self) -> WindowHandle {
        WindowHandle::from_raw(0)
    }
}

/// Window references held per surface
pub struct WindowLeases<W> {
    leases: Mutex<FxHashMap<SurfaceHandle, W>>,
}

impl<W> Default for WindowLeases<W> {
    fn default() -> Self {
        Self {
            leases: Mutex::new(FxHashMap::default()),
        }
    }
}

impl<W> WindowLeases<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `lease` for `handle`, returning the lease it replaces
    pub fn replace(&self, handle: SurfaceHandle, lease: W) -> Option<W> {
        self.leases.lock().insert(handle, lease)
    }

    /// Stop holding the lease for `handle`
    pub fn take(&self, handle: SurfaceHandle) -> Option<W> {
        self.leases.lock().remove(&handle)
    }

    pub fn contains(&self, handle: SurfaceHandle) -> bool {
        self.leases.lock().contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.leases.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bind a surface to `window`, holding `lease` while the canvas draws into it
    ///
    /// A bind that leaves the canvas on its current window drops `lease`
    /// and keeps the lease already held.
    pub fn bind(
        &self,
        context: &BridgeContext,
        handle: SurfaceHandle,
        window: WindowHandle,
        lease: W,
    ) -> bool {
        let bound = context.bind(handle, window);
        let drawing_into = context
            .surface(handle)
            .and_then(|surface| surface.window_handle());
        if bound && drawing_into == Some(window) && self.replace(handle, lease).is_some() {
            debug!("Replaced native window for surface {}", handle.to_raw());
        }
        bound
    }

    /// Release a surface; its lease is dropped unless the screen is rotating
    ///
    /// The release has flushed all rendering work by the time the lease goes.
    pub fn release(&self, context: &BridgeContext, handle: SurfaceHandle, flags: ReleaseFlags) {
        context.release(handle, flags);
        if !flags.contains(ReleaseFlags::SCREEN_ROTATING) {
            self.take(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobile_surface::testing::RecordingEngine;
    use mobile_surface::{BridgeConfig, Engine};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Lease(Arc<AtomicUsize>);

    impl Drop for Lease {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_replace_drops_previous_lease() {
        let released = Arc::new(AtomicUsize::new(0));
        let leases = WindowLeases::new();
        let handle = SurfaceHandle::from_raw(1).unwrap();

        assert!(leases.replace(handle, Lease(released.clone())).is_none());
        drop(leases.replace(handle, Lease(released.clone())));
        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert_eq!(leases.len(), 1);

        drop(leases.take(handle));
        assert_eq!(released.load(Ordering::SeqCst), 2);
        assert!(leases.is_empty());
        assert!(!leases.contains(handle));
    }

    fn context(engine: &Arc<RecordingEngine>) -> BridgeContext {
        let engine = engine.clone();
        BridgeContext::new(
            Box::new(move || Ok(engine.clone() as Arc<dyn Engine>)),
            BridgeConfig::default(),
        )
    }

    #[test]
    fn test_rotation_keeps_lease_until_rebind() {
        let released = Arc::new(AtomicUsize::new(0));
        let engine = RecordingEngine::new();
        let context = context(&engine);
        let leases = WindowLeases::new();
        let handle = context.create_surface(3);

        assert!(leases.bind(&context, handle, WindowHandle::from_raw(0xA), Lease(released.clone())));
        leases.release(&context, handle, ReleaseFlags::SCREEN_ROTATING);
        assert!(leases.contains(handle));
        assert_eq!(released.load(Ordering::SeqCst), 0);

        assert!(leases.bind(&context, handle, WindowHandle::from_raw(0xB), Lease(released.clone())));
        assert_eq!(released.load(Ordering::SeqCst), 1);

        leases.release(&context, handle, ReleaseFlags::empty());
        assert!(leases.is_empty());
        assert_eq!(released.load(Ordering::SeqCst), 2);
        assert_eq!(engine.state().deleted.len(), 1);
    }

    #[test]
    fn test_bind_while_bound_keeps_current_lease() {
        let released = Arc::new(AtomicUsize::new(0));
        let engine = RecordingEngine::new();
        let context = context(&engine);
        let leases = WindowLeases::new();
        let handle = context.create_surface(4);

        assert!(leases.bind(&context, handle, WindowHandle::from_raw(0xA), Lease(released.clone())));
        // Still valid, so the canvas stays on 0xA and the new lease is dropped
        assert!(leases.bind(&context, handle, WindowHandle::from_raw(0xB), Lease(released.clone())));
        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert_eq!(leases.len(), 1);
    }

    #[test]
    fn test_failed_bind_drops_lease() {
        let released = Arc::new(AtomicUsize::new(0));
        let engine = RecordingEngine::new();
        engine.fail_canvas_creation(true);
        let context = context(&engine);
        let leases = WindowLeases::new();
        let handle = context.create_surface(5);

        assert!(!leases.bind(&context, handle, WindowHandle::from_raw(0xA), Lease(released.clone())));
        assert!(leases.is_empty());
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_leases_are_per_surface() {
        let released = Arc::new(AtomicUsize::new(0));
        let leases = WindowLeases::new();
        let a = SurfaceHandle::from_raw(1).unwrap();
        let b = SurfaceHandle::from_raw(2).unwrap();

        leases.replace(a, Lease(released.clone()));
        leases.replace(b, Lease(released.clone()));
        drop(leases.take(a));
        assert!(leases.contains(b));
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
