//! Bridge context
//!
//! [`BridgeContext`] bundles the state the platform layer needs: the lazily
//! created [`MobileApp`], the surface registry, the managed callback handler
//! and the registered platform data. The platform layer owns one context and
//! routes every native entry point through it.
//!
//! Operations follow the platform contract: unknown handles and unbound
//! surfaces are silent no-ops, and `bind` reports failure as `false`.

use crate::app::MobileApp;
use crate::config::BridgeConfig;
use crate::engine::{EngineFactory, PlatformData, SurfaceAction, WindowHandle};
use crate::error::Result;
use crate::event::{Event, EventKind, TouchId};
use crate::input::TouchBatch;
use crate::reentry::{CallbackHandler, CallbackTarget};
use crate::registry::{SurfaceHandle, SurfaceRegistry};
use crate::surface::{MobileSurface, ReleaseFlags};
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// All bridge state for one process
pub struct BridgeContext {
    factory: EngineFactory,
    config: BridgeConfig,
    app: Mutex<Option<Arc<MobileApp>>>,
    surfaces: SurfaceRegistry,
    callbacks: Arc<CallbackHandler>,
    platform_data: RwLock<Option<PlatformData>>,
}

impl BridgeContext {
    /// Create a context; the engine is not created until first needed
    pub fn new(factory: EngineFactory, config: BridgeConfig) -> Self {
        Self {
            factory,
            config,
            app: Mutex::new(None),
            surfaces: SurfaceRegistry::new(),
            callbacks: Arc::new(CallbackHandler::new()),
            platform_data: RwLock::new(None),
        }
    }

    /// Configuration the context was created with
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The app, creating it and its engine on first use
    ///
    /// On creation the managed callback handler is subscribed to the
    /// engine's process dispatcher and configured directories are applied.
    pub fn app(&self) -> Result<Arc<MobileApp>> {
        let mut slot = self.app.lock();
        if let Some(app) = slot.as_ref() {
            return Ok(app.clone());
        }

        let engine = (self.factory)()?;
        let dispatcher = engine.dispatcher();
        dispatcher.subscribe(self.callbacks.clone(), EventKind::ShowKeyboard);
        dispatcher.subscribe(self.callbacks.clone(), EventKind::PerformanceResult);

        let app = Arc::new(MobileApp::new(engine));
        if let Err(e) = app.apply_directories(&self.config.directories) {
            warn!("Failed to apply configured directories: {}", e);
        }
        *slot = Some(app.clone());
        Ok(app)
    }

    /// The app, only if it already exists
    pub fn existing_app(&self) -> Option<Arc<MobileApp>> {
        self.app.lock().clone()
    }

    /// Set the receiver of keyboard and performance callbacks
    pub fn set_callback_target(&self, target: Arc<dyn CallbackTarget>) {
        self.callbacks.set_target(target);
    }

    /// Register windowing integration data used for new canvases
    pub fn set_platform_data(&self, data: PlatformData) {
        *self.platform_data.write() = Some(data);
    }

    /// Registered platform data
    pub fn platform_data(&self) -> Option<PlatformData> {
        *self.platform_data.read()
    }

    /// Handle for platform surface `id`, creating the surface on first use
    pub fn create_surface(&self, id: i32) -> SurfaceHandle {
        self.surfaces.get_or_create(id)
    }

    /// Surface behind `handle`
    pub fn surface(&self, handle: SurfaceHandle) -> Option<Arc<MobileSurface>> {
        let surface = self.surfaces.get(handle);
        if surface.is_none() {
            warn!("Unknown surface handle {}", handle.to_raw());
        }
        surface
    }

    /// Bind a surface to a platform window
    pub fn bind(&self, handle: SurfaceHandle, window: WindowHandle) -> bool {
        let Some(surface) = self.surface(handle) else {
            return false;
        };

        let result = self
            .app()
            .and_then(|app| surface.bind(&app, window, self.platform_data()));
        match result {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to bind surface {}: {}", surface.id(), e);
                false
            }
        }
    }

    /// Release a surface; blocks until rendering work is flushed
    pub fn release(&self, handle: SurfaceHandle, flags: ReleaseFlags) {
        let Some(surface) = self.surface(handle) else {
            return;
        };
        match self.existing_app() {
            Some(app) => surface.release(&app, flags),
            None => debug!("Surface {} released before any bind", surface.id()),
        }
    }

    /// Request a redraw
    pub fn refresh(&self, handle: SurfaceHandle) {
        if let Some(surface) = self.surface(handle) {
            surface.refresh();
        }
    }

    /// Touches started on the surface
    pub fn touch_down(&self, handle: SurfaceHandle, batch: &TouchBatch) {
        if let Some(surface) = self.surface(handle) {
            surface.touch_down(batch);
        }
    }

    /// Tracked touches moved
    pub fn touch_move(&self, handle: SurfaceHandle, batch: &TouchBatch) {
        if let Some(surface) = self.surface(handle) {
            surface.touch_move(batch);
        }
    }

    /// Touches ended; an empty batch clears every tracked touch
    pub fn touch_up(&self, handle: SurfaceHandle, batch: &TouchBatch) {
        if let Some(surface) = self.surface(handle) {
            surface.touch_up(batch);
        }
    }

    /// Drop every tracked touch
    pub fn touches_cancel(&self, handle: SurfaceHandle) {
        if let Some(surface) = self.surface(handle) {
            surface.touches_cancel();
        }
    }

    /// A single tap was recognized at pixel (`x`, `y`)
    pub fn single_tap(&self, handle: SurfaceHandle, x: i32, y: i32) {
        if let Some(surface) = self.surface(handle) {
            surface.single_tap(x, y);
        }
    }

    /// A double tap by touch `id` was recognized at pixel (`x`, `y`)
    pub fn double_tap(&self, handle: SurfaceHandle, x: i32, y: i32, id: TouchId) {
        if let Some(surface) = self.surface(handle) {
            surface.double_tap(x, y, id);
        }
    }

    /// Deliver keyboard text to a bound surface
    pub fn text_input(&self, handle: SurfaceHandle, text: &str) {
        if let Some(surface) = self.surface(handle) {
            surface.text_input(text);
        }
    }

    /// Announce that the keyboard was hidden; blocks until delivered
    pub fn keyboard_hidden(&self) {
        match self.app().and_then(|app| app.engine()) {
            Ok(engine) => engine
                .dispatcher()
                .inject_with_notifier(&Event::HideKeyboard)
                .wait(),
            Err(e) => warn!("Dropping keyboard hidden notification: {}", e),
        }
    }

    /// Report a performance measurement to the managed layer
    pub fn report_performance(&self, fps: f32) {
        match self.app().and_then(|app| app.engine()) {
            Ok(engine) => {
                engine
                    .dispatcher()
                    .inject(&Event::PerformanceResult { fps });
            }
            Err(e) => warn!("Dropping performance result: {}", e),
        }
    }

    /// Run an application action on a surface
    pub fn perform(&self, handle: SurfaceHandle, action: &SurfaceAction) -> bool {
        self.surface(handle)
            .map(|surface| surface.perform(action))
            .unwrap_or(false)
    }

    /// Tear down the engine if it was ever created
    pub fn shutdown(&self) {
        match self.existing_app() {
            Some(app) => app.shutdown(),
            None => debug!("Shutdown requested before the app was created"),
        }
    }

    /// Directory the engine loads libraries from
    pub fn set_library_directory(&self, dir: &Path) {
        if let Err(e) = self.app().and_then(|app| app.set_library_directory(dir)) {
            warn!("Failed to set library directory: {}", e);
        }
    }

    /// Directory the engine loads fonts from
    pub fn set_font_directory(&self, dir: &Path) {
        if let Err(e) = self.app().and_then(|app| app.set_font_directory(dir)) {
            warn!("Failed to set font directory: {}", e);
        }
    }

    /// Directory the engine loads materials from
    pub fn set_materials_directory(&self, dir: &Path) {
        if let Err(e) = self.app().and_then(|app| app.set_materials_directory(dir)) {
            warn!("Failed to set materials directory: {}", e);
        }
    }
}
