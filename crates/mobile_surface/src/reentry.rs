//! Calling back into the managed runtime
//!
//! Engine notifications such as "show the keyboard" may arrive on a native
//! thread the managed runtime has never seen. Before calling back, the
//! thread is attached if needed; it is detached again only if this call did
//! the attaching. [`AttachGuard`] ties both halves to one scope.
//!
//! Every failure on this path is dropped after logging: the notification is
//! lost and nothing is retried.

use crate::dispatch::{EventHandler, HandleResult};
use crate::event::Event;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Attaches native threads to a managed runtime
pub trait ThreadAttach {
    /// Error raised when attaching fails
    type Error: fmt::Display;

    /// Check if the calling thread is attached
    fn is_attached(&self) -> bool;

    /// Attach the calling thread
    fn attach(&self) -> Result<(), Self::Error>;

    /// Detach the calling thread
    fn detach(&self);
}

/// Keeps the calling thread attached for the guard's scope
pub struct AttachGuard<'a, A: ThreadAttach + ?Sized> {
    attacher: &'a A,
    attached_here: bool,
}

impl<'a, A: ThreadAttach + ?Sized> AttachGuard<'a, A> {
    /// Attach the calling thread unless it already is
    pub fn enter(attacher: &'a A) -> Result<Self, A::Error> {
        let attached_here = if attacher.is_attached() {
            false
        } else {
            attacher.attach()?;
            true
        };
        Ok(Self {
            attacher,
            attached_here,
        })
    }

    /// Check if this guard performed the attach
    pub fn attached_here(&self) -> bool {
        self.attached_here
    }
}

impl<A: ThreadAttach + ?Sized> Drop for AttachGuard<'_, A> {
    fn drop(&mut self) {
        if self.attached_here {
            self.attacher.detach();
        }
    }
}

/// Run `f` with the calling thread attached, dropping any failure
///
/// Returns `None` if attaching failed or `f` returned an error.
pub fn reenter<A, R, E, F>(attacher: &A, f: F) -> Option<R>
where
    A: ThreadAttach + ?Sized,
    E: fmt::Display,
    F: FnOnce() -> Result<R, E>,
{
    let _guard = match AttachGuard::enter(attacher) {
        Ok(guard) => guard,
        Err(e) => {
            warn!("Failed to attach thread for callback: {}", e);
            return None;
        }
    };

    match f() {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Managed callback dropped: {}", e);
            None
        }
    }
}

/// A call into the managed layer
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ManagedCallback {
    /// Show the on-screen keyboard
    ShowKeyboard,
    /// Report a performance measurement
    PerformanceResult(f32),
}

impl ManagedCallback {
    /// Managed method name
    pub fn method_name(&self) -> &'static str {
        match self {
            ManagedCallback::ShowKeyboard => "ShowKeyboard",
            ManagedCallback::PerformanceResult(_) => "ShowPerformanceTestResult",
        }
    }

    /// Managed method signature
    pub fn signature(&self) -> &'static str {
        match self {
            ManagedCallback::ShowKeyboard => "()V",
            ManagedCallback::PerformanceResult(_) => "(F)V",
        }
    }

    /// The callback an event should trigger, if any
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::ShowKeyboard => Some(ManagedCallback::ShowKeyboard),
            Event::PerformanceResult { fps } => Some(ManagedCallback::PerformanceResult(*fps)),
            _ => None,
        }
    }
}

/// Receiver of managed callbacks
///
/// Delivery is best effort; implementations swallow their own failures.
pub trait CallbackTarget: Send + Sync {
    /// Deliver one callback
    fn deliver(&self, callback: ManagedCallback);
}

/// Forwards keyboard and performance events to the current callback target
#[derive(Default)]
pub struct CallbackHandler {
    target: RwLock<Option<Arc<dyn CallbackTarget>>>,
}

impl CallbackHandler {
    /// Create a handler with no target
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the callback target
    pub fn set_target(&self, target: Arc<dyn CallbackTarget>) {
        *self.target.write() = Some(target);
    }

    /// Check if a target is set
    pub fn has_target(&self) -> bool {
        self.target.read().is_some()
    }
}

impl EventHandler for CallbackHandler {
    fn handle(&self, event: &Event) -> HandleResult {
        let Some(callback) = ManagedCallback::from_event(event) else {
            return HandleResult::NotHandled;
        };

        let target = self.target.read().clone();
        match target {
            Some(target) => target.deliver(callback),
            None => debug!("No callback target for {}", callback.method_name()),
        }
        HandleResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::cell::{Cell, RefCell};

    struct FakeAttacher {
        attached: Cell<bool>,
        fail_attach: bool,
        log: RefCell<Vec<&'static str>>,
    }

    impl FakeAttacher {
        fn new(attached: bool) -> Self {
            Self {
                attached: Cell::new(attached),
                fail_attach: false,
                log: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail_attach: true,
                ..Self::new(false)
            }
        }
    }

    impl ThreadAttach for FakeAttacher {
        type Error = &'static str;

        fn is_attached(&self) -> bool {
            self.attached.get()
        }

        fn attach(&self) -> Result<(), &'static str> {
            if self.fail_attach {
                return Err("attach refused");
            }
            self.attached.set(true);
            self.log.borrow_mut().push("attach");
            Ok(())
        }

        fn detach(&self) {
            self.attached.set(false);
            self.log.borrow_mut().push("detach");
        }
    }

    fn call(attacher: &FakeAttacher, fail: bool) -> Option<()> {
        reenter(attacher, || {
            attacher.log.borrow_mut().push("callback");
            if fail {
                Err("method not found")
            } else {
                Ok(())
            }
        })
    }

    #[test]
    fn test_attached_thread_is_not_detached() {
        let attacher = FakeAttacher::new(true);
        assert_eq!(call(&attacher, false), Some(()));
        assert_eq!(*attacher.log.borrow(), vec!["callback"]);
        assert!(attacher.is_attached());
    }

    #[test]
    fn test_detached_thread_attach_detach_pairs() {
        let attacher = FakeAttacher::new(false);
        assert_eq!(call(&attacher, false), Some(()));
        assert_eq!(*attacher.log.borrow(), vec!["attach", "callback", "detach"]);
        assert!(!attacher.is_attached());
    }

    #[test]
    fn test_failed_callback_still_detaches() {
        let attacher = FakeAttacher::new(false);
        assert_eq!(call(&attacher, true), None);
        assert_eq!(*attacher.log.borrow(), vec!["attach", "callback", "detach"]);
    }

    #[test]
    fn test_failed_attach_drops_callback() {
        let attacher = FakeAttacher::failing();
        assert_eq!(call(&attacher, false), None);
        assert!(attacher.log.borrow().is_empty());
    }

    #[test]
    fn test_guard_reports_who_attached() {
        let attacher = FakeAttacher::new(false);
        {
            let guard = AttachGuard::enter(&attacher).unwrap();
            assert!(guard.attached_here());
            let nested = AttachGuard::enter(&attacher).unwrap();
            assert!(!nested.attached_here());
        }
        assert_eq!(*attacher.log.borrow(), vec!["attach", "detach"]);
    }

    #[test]
    fn test_callback_names() {
        assert_eq!(ManagedCallback::ShowKeyboard.method_name(), "ShowKeyboard");
        assert_eq!(ManagedCallback::ShowKeyboard.signature(), "()V");
        let perf = ManagedCallback::PerformanceResult(30.0);
        assert_eq!(perf.method_name(), "ShowPerformanceTestResult");
        assert_eq!(perf.signature(), "(F)V");
        assert_eq!(ManagedCallback::from_event(&Event::HideKeyboard), None);
    }

    #[derive(Default)]
    struct RecordingTarget {
        delivered: Mutex<Vec<ManagedCallback>>,
    }

    impl CallbackTarget for RecordingTarget {
        fn deliver(&self, callback: ManagedCallback) {
            self.delivered.lock().push(callback);
        }
    }

    #[test]
    fn test_handler_forwards_to_target() {
        let handler = CallbackHandler::new();
        assert_eq!(handler.handle(&Event::ShowKeyboard), HandleResult::Handled);

        let target = Arc::new(RecordingTarget::default());
        handler.set_target(target.clone());
        assert!(handler.has_target());

        handler.handle(&Event::ShowKeyboard);
        handler.handle(&Event::PerformanceResult { fps: 59.5 });
        assert_eq!(
            handler.handle(&Event::TextInput("x".into())),
            HandleResult::NotHandled
        );
        assert_eq!(
            *target.delivered.lock(),
            vec![
                ManagedCallback::ShowKeyboard,
                ManagedCallback::PerformanceResult(59.5)
            ]
        );
    }
}
