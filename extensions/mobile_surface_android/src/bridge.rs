//! Process-wide bridge state
//!
//! Created once by `JNI_OnLoad`; every native method reaches it through
//! [`bridge`].

use crate::callbacks::JavaCallbackTarget;
use crate::error::{BridgeError, Result};
use crate::window::{NativeWindowLease, WindowLeases};
use jni::objects::{GlobalRef, JObject};
use jni::sys::jlong;
use jni::{JNIEnv, JavaVM};
use mobile_surface::{BridgeContext, PlatformData, ReleaseFlags, SurfaceHandle};
use std::sync::{Arc, OnceLock};
use tracing::{error, warn};

static BRIDGE: OnceLock<AndroidBridge> = OnceLock::new();

/// The installed bridge, if `JNI_OnLoad` has run
pub fn bridge() -> Option<&'static AndroidBridge> {
    let bridge = BRIDGE.get();
    if bridge.is_none() {
        error!("{}", BridgeError::NotInitialized);
    }
    bridge
}

/// Install the bridge; fails if one is already installed
pub(crate) fn install(bridge: AndroidBridge) -> std::result::Result<(), AndroidBridge> {
    BRIDGE.set(bridge)
}

/// Decode a handle passed back from Java
pub fn surface_handle(raw: jlong) -> Option<SurfaceHandle> {
    let handle = SurfaceHandle::from_raw(raw);
    if handle.is_none() {
        warn!("Invalid surface handle {}", raw);
    }
    handle
}

/// Flags word passed to `release`; unknown bits are ignored
pub fn release_flags(raw: i32) -> ReleaseFlags {
    ReleaseFlags::from_bits_truncate(raw as u32)
}

/// Windowing integration table handed to the engine
///
/// Layout: `[2, JavaVM*, application context global ref]`.
struct PlatformTable {
    words: Box<[usize; 3]>,
    _context: GlobalRef,
}

impl PlatformTable {
    const KIND_ANDROID: usize = 2;

    fn new(vm: &JavaVM, context: GlobalRef) -> Self {
        let words = Box::new([
            Self::KIND_ANDROID,
            vm.get_java_vm_pointer() as usize,
            context.as_obj().as_raw() as usize,
        ]);
        Self {
            words,
            _context: context,
        }
    }

    fn data(&self) -> PlatformData {
        PlatformData::from_raw(self.words.as_ptr() as usize)
    }
}

/// Bridge state shared by all native methods
pub struct AndroidBridge {
    vm: Arc<JavaVM>,
    context: BridgeContext,
    windows: WindowLeases<NativeWindowLease>,
    platform: OnceLock<PlatformTable>,
}

impl AndroidBridge {
    pub fn new(vm: JavaVM, context: BridgeContext) -> Self {
        Self {
            vm: Arc::new(vm),
            context,
            windows: WindowLeases::new(),
            platform: OnceLock::new(),
        }
    }

    pub fn context(&self) -> &BridgeContext {
        &self.context
    }

    /// Register a surface and route its callbacks to `view`
    pub fn create(&self, env: &JNIEnv<'_>, view: &JObject<'_>, id: i32) -> Result<SurfaceHandle> {
        if view.is_null() {
            return Err(BridgeError::NullArgument("view"));
        }
        let view = env.new_global_ref(view)?;
        self.context
            .set_callback_target(Arc::new(JavaCallbackTarget::new(self.vm.clone(), view)));
        Ok(self.context.create_surface(id))
    }

    /// Bind a surface to the native window behind a Java `Surface`
    ///
    /// The platform table is built from the first application context seen
    /// and kept for the life of the process.
    pub fn bind(
        &self,
        env: &JNIEnv<'_>,
        handle: SurfaceHandle,
        app_context: &JObject<'_>,
        surface: &JObject<'_>,
    ) -> Result<bool> {
        if self.platform.get().is_none() && !app_context.is_null() {
            let table = PlatformTable::new(&self.vm, env.new_global_ref(app_context)?);
            let table = self.platform.get_or_init(|| table);
            self.context.set_platform_data(table.data());
        }

        let lease = NativeWindowLease::from_surface(env, surface)?;
        Ok(self
            .windows
            .bind(&self.context, handle, lease.handle(), lease))
    }

    /// Release a surface, dropping its window reference unless rotating
    pub fn release(&self, handle: SurfaceHandle, flags: ReleaseFlags) {
        self.windows.release(&self.context, handle, flags);
    }
}
