//! In-memory engine for tests
//!
//! [`RecordingEngine`] implements the engine seam without rendering
//! anything. It records canvas creation, updates, deletion and directory
//! configuration so tests can assert on what the bridge asked for.

use crate::coords::WindowSize;
use crate::dispatch::{EventDispatcher, EventHandler, HandleResult, Notifier};
use crate::engine::{
    Canvas, CanvasId, Engine, SurfaceAction, UpdateKind, WindowHandle, WindowOptions,
};
use crate::error::EngineError;
use crate::event::Event;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Everything the engine has been asked to do
#[derive(Clone, Debug, Default)]
pub struct RecordingState {
    /// Window and options of every created canvas, in creation order
    pub created: Vec<(WindowHandle, WindowOptions)>,
    /// Deleted canvases, in deletion order
    pub deleted: Vec<CanvasId>,
    /// Number of `synchronize` calls
    pub synchronizations: usize,
    /// Number of notifier updates that ran to completion
    pub completed_updates: usize,
    /// Actions performed on any canvas
    pub actions: Vec<SurfaceAction>,
    pub library_directory: Option<PathBuf>,
    pub font_directory: Option<PathBuf>,
    pub materials_directory: Option<PathBuf>,
    /// Number of `shutdown` calls
    pub shutdowns: usize,
}

struct CanvasRecord {
    window: WindowHandle,
    dispatcher: Arc<EventDispatcher>,
    updates: Vec<UpdateKind>,
}

struct Shared {
    state: Mutex<RecordingState>,
    canvases: Mutex<FxHashMap<CanvasId, CanvasRecord>>,
    dispatcher: Arc<EventDispatcher>,
    window_size: Mutex<WindowSize>,
    update_delay: Mutex<Duration>,
    perform_delay: Mutex<Duration>,
    perform_event: Mutex<Option<Event>>,
    total_updates: AtomicUsize,
    next_canvas: AtomicU64,
    fail_canvas_creation: AtomicBool,
}

/// Engine that records calls instead of rendering
pub struct RecordingEngine {
    shared: Arc<Shared>,
}

impl RecordingEngine {
    /// Create an engine with a 1080x1920 window size
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(RecordingState::default()),
                canvases: Mutex::new(FxHashMap::default()),
                dispatcher: Arc::new(EventDispatcher::new()),
                window_size: Mutex::new(WindowSize::new(1080, 1920)),
                update_delay: Mutex::new(Duration::ZERO),
                perform_delay: Mutex::new(Duration::ZERO),
                perform_event: Mutex::new(None),
                total_updates: AtomicUsize::new(0),
                next_canvas: AtomicU64::new(1),
                fail_canvas_creation: AtomicBool::new(false),
            }),
        })
    }

    /// Snapshot of the recorded calls
    pub fn state(&self) -> RecordingState {
        self.shared.state.lock().clone()
    }

    /// Window size reported by every canvas
    pub fn set_window_size(&self, size: WindowSize) {
        *self.shared.window_size.lock() = size;
    }

    /// Delay before notifier updates complete
    pub fn set_update_delay(&self, delay: Duration) {
        *self.shared.update_delay.lock() = delay;
    }

    /// Time every `perform` takes, as a long file import would
    pub fn set_perform_delay(&self, delay: Duration) {
        *self.shared.perform_delay.lock() = delay;
    }

    /// Event a canvas dispatches to its own window while performing an action
    pub fn set_perform_event(&self, event: Option<Event>) {
        *self.shared.perform_event.lock() = event;
    }

    /// Updates requested on any canvas, including deleted ones
    pub fn total_updates(&self) -> usize {
        self.shared.total_updates.load(Ordering::SeqCst)
    }

    /// Make subsequent canvas creation fail
    pub fn fail_canvas_creation(&self, fail: bool) {
        self.shared
            .fail_canvas_creation
            .store(fail, Ordering::SeqCst);
    }

    /// Dispatcher of a live canvas
    pub fn canvas_dispatcher(&self, id: CanvasId) -> Option<Arc<EventDispatcher>> {
        self.shared
            .canvases
            .lock()
            .get(&id)
            .map(|c| c.dispatcher.clone())
    }

    /// Updates requested on a live canvas, in order
    pub fn canvas_updates(&self, id: CanvasId) -> Vec<UpdateKind> {
        self.shared
            .canvases
            .lock()
            .get(&id)
            .map(|c| c.updates.clone())
            .unwrap_or_default()
    }

    /// Window a live canvas renders to
    pub fn canvas_window(&self, id: CanvasId) -> Option<WindowHandle> {
        self.shared.canvases.lock().get(&id).map(|c| c.window)
    }
}

impl Engine for RecordingEngine {
    fn create_canvas(
        &self,
        window: WindowHandle,
        options: &WindowOptions,
    ) -> Result<Arc<dyn Canvas>, EngineError> {
        if self.shared.fail_canvas_creation.load(Ordering::SeqCst) {
            return Err(EngineError::CanvasCreation(format!(
                "window {:#x} rejected",
                window.as_raw()
            )));
        }

        let id = CanvasId(self.shared.next_canvas.fetch_add(1, Ordering::Relaxed));
        let dispatcher = Arc::new(EventDispatcher::new());
        self.shared.canvases.lock().insert(
            id,
            CanvasRecord {
                window,
                dispatcher: dispatcher.clone(),
                updates: Vec::new(),
            },
        );
        self.shared.state.lock().created.push((window, *options));

        Ok(Arc::new(RecordingCanvas {
            id,
            window: Mutex::new(window),
            dispatcher,
            shared: self.shared.clone(),
        }))
    }

    fn synchronize(&self) {
        self.shared.state.lock().synchronizations += 1;
    }

    fn dispatcher(&self) -> Arc<EventDispatcher> {
        self.shared.dispatcher.clone()
    }

    fn set_library_directory(&self, dir: &Path) {
        self.shared.state.lock().library_directory = Some(dir.to_path_buf());
    }

    fn set_font_directory(&self, dir: &Path) {
        self.shared.state.lock().font_directory = Some(dir.to_path_buf());
    }

    fn set_materials_directory(&self, dir: &Path) {
        self.shared.state.lock().materials_directory = Some(dir.to_path_buf());
    }

    fn shutdown(&self) {
        self.shared.state.lock().shutdowns += 1;
    }
}

/// Canvas created by [`RecordingEngine`]
pub struct RecordingCanvas {
    id: CanvasId,
    window: Mutex<WindowHandle>,
    dispatcher: Arc<EventDispatcher>,
    shared: Arc<Shared>,
}

impl RecordingCanvas {
    fn record_update(&self, kind: UpdateKind) {
        self.shared.total_updates.fetch_add(1, Ordering::SeqCst);
        if let Some(record) = self.shared.canvases.lock().get_mut(&self.id) {
            record.updates.push(kind);
        }
    }
}

impl Canvas for RecordingCanvas {
    fn id(&self) -> CanvasId {
        self.id
    }

    fn window_handle(&self) -> WindowHandle {
        *self.window.lock()
    }

    fn set_window_handle(&self, window: WindowHandle) {
        *self.window.lock() = window;
        if let Some(record) = self.shared.canvases.lock().get_mut(&self.id) {
            record.window = window;
        }
    }

    fn window_size(&self) -> WindowSize {
        *self.shared.window_size.lock()
    }

    fn update(&self, kind: UpdateKind) {
        self.record_update(kind);
    }

    fn update_with_notifier(&self, kind: UpdateKind) -> Notifier {
        self.record_update(kind);
        let delay = *self.shared.update_delay.lock();
        if delay.is_zero() {
            self.shared.state.lock().completed_updates += 1;
            return Notifier::completed();
        }

        let (notifier, completer) = Notifier::pending();
        let shared = self.shared.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            shared.state.lock().completed_updates += 1;
            completer.complete();
        });
        notifier
    }

    fn dispatcher(&self) -> Arc<EventDispatcher> {
        self.dispatcher.clone()
    }

    fn perform(&self, action: &SurfaceAction) -> bool {
        let delay = *self.shared.perform_delay.lock();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        let event = self.shared.perform_event.lock().clone();
        if let Some(event) = event {
            self.dispatcher.inject(&event);
        }
        self.shared.state.lock().actions.push(action.clone());
        !matches!(action, SurfaceAction::LoadFile(path) if path.as_os_str().is_empty())
    }

    fn delete(&self) {
        self.shared.canvases.lock().remove(&self.id);
        self.shared.state.lock().deleted.push(self.id);
    }
}

/// Handler that keeps every event it receives
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<Event>>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Events received so far
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }
}

impl EventHandler for EventLog {
    fn handle(&self, event: &Event) -> HandleResult {
        self.events.lock().push(event.clone());
        HandleResult::Handled
    }
}
