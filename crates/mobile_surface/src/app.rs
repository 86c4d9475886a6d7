//! Process-wide application state
//!
//! [`MobileApp`] owns the engine for the life of the process and routes the
//! engine's error and warning events to the log.

use crate::config::DirectoryConfig;
use crate::dispatch::{EventHandler, HandleResult};
use crate::engine::Engine;
use crate::error::{Result, SurfaceError};
use crate::event::{Event, EventKind};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Logs engine error and warning events
pub struct LogHandler;

impl EventHandler for LogHandler {
    fn handle(&self, event: &Event) -> HandleResult {
        match event {
            Event::Error(message) if message.is_empty() => {
                error!("An error occurred but there was no specific message regarding this event")
            }
            Event::Error(message) => error!("{}", message),
            Event::Warning(message) if message.is_empty() => {
                warn!("A warning occurred but there was no specific message regarding this event")
            }
            Event::Warning(message) => warn!("{}", message),
            _ => return HandleResult::NotHandled,
        }
        HandleResult::Handled
    }
}

/// The single application instance
pub struct MobileApp {
    world: RwLock<Option<Arc<dyn Engine>>>,
}

impl MobileApp {
    /// Take ownership of `engine` and subscribe the log handlers
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        let dispatcher = engine.dispatcher();
        let handler: Arc<dyn EventHandler> = Arc::new(LogHandler);
        dispatcher.subscribe(handler.clone(), EventKind::Error);
        dispatcher.subscribe(handler, EventKind::Warning);
        info!("MobileApp created");

        Self {
            world: RwLock::new(Some(engine)),
        }
    }

    /// The engine, unless the app has been shut down
    pub fn engine(&self) -> Result<Arc<dyn Engine>> {
        self.world.read().clone().ok_or(SurfaceError::ShutDown)
    }

    /// Check if the engine is still available
    pub fn is_running(&self) -> bool {
        self.world.read().is_some()
    }

    /// Tear down the engine; any later engine call fails with [`SurfaceError::ShutDown`]
    pub fn shutdown(&self) {
        match self.world.write().take() {
            Some(engine) => {
                engine.shutdown();
                info!("MobileApp shut down");
            }
            None => debug!("MobileApp already shut down"),
        }
    }

    /// Forward the CAD import library directory to the engine
    pub fn set_library_directory(&self, dir: &Path) -> Result<()> {
        self.engine()?.set_library_directory(dir);
        debug!("Library directory: {}", dir.display());
        Ok(())
    }

    /// Forward the font directory to the engine
    pub fn set_font_directory(&self, dir: &Path) -> Result<()> {
        self.engine()?.set_font_directory(dir);
        debug!("Font directory: {}", dir.display());
        Ok(())
    }

    /// Forward the materials directory to the engine
    pub fn set_materials_directory(&self, dir: &Path) -> Result<()> {
        self.engine()?.set_materials_directory(dir);
        debug!("Materials directory: {}", dir.display());
        Ok(())
    }

    /// Apply every configured directory
    pub fn apply_directories(&self, dirs: &DirectoryConfig) -> Result<()> {
        if let Some(dir) = &dirs.library {
            self.set_library_directory(dir)?;
        }
        if let Some(dir) = &dirs.fonts {
            self.set_font_directory(dir)?;
        }
        if let Some(dir) = &dirs.materials {
            self.set_materials_directory(dir)?;
        }
        Ok(())
    }
}
