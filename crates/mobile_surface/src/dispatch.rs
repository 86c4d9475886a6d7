//! Event dispatch
//!
//! An [`EventDispatcher`] delivers events synchronously to the handlers
//! subscribed for their [`EventKind`]. Handlers run on the injecting thread,
//! after the dispatcher has released its own lock, so a handler may inject
//! further events or subscribe new handlers.

use crate::event::{Event, EventKind};
use parking_lot::{Condvar, Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Result of handling an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleResult {
    /// The handler consumed the event
    Handled,
    /// The handler ignored the event
    NotHandled,
}

/// Receives events from a dispatcher
pub trait EventHandler: Send + Sync {
    /// Handle one event
    fn handle(&self, event: &Event) -> HandleResult;
}

impl<F> EventHandler for F
where
    F: Fn(&Event) -> HandleResult + Send + Sync,
{
    fn handle(&self, event: &Event) -> HandleResult {
        self(event)
    }
}

/// Identifies a subscription so it can be removed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
    handler: Arc<dyn EventHandler>,
}

/// Synchronous event dispatcher
#[derive(Default)]
pub struct EventDispatcher {
    subscriptions: RwLock<Vec<Subscription>>,
    next_id: AtomicU64,
}

impl EventDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to events of `kind`
    pub fn subscribe(&self, handler: Arc<dyn EventHandler>, kind: EventKind) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions.write().push(Subscription { id, kind, handler });
        id
    }

    /// Remove a subscription
    ///
    /// Returns `false` if the subscription was not found.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.write();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        subscriptions.len() != before
    }

    /// Number of handlers subscribed to `kind`
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscriptions
            .read()
            .iter()
            .filter(|s| s.kind == kind)
            .count()
    }

    /// Deliver `event` to every handler subscribed to its kind
    ///
    /// Returns the number of handlers that reported [`HandleResult::Handled`].
    pub fn inject(&self, event: &Event) -> usize {
        let kind = event.kind();
        let handlers: Vec<Arc<dyn EventHandler>> = self
            .subscriptions
            .read()
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.handler.clone())
            .collect();

        if handlers.is_empty() {
            tracing::trace!("No handlers for {:?}", kind);
        }

        handlers
            .iter()
            .filter(|h| h.handle(event) == HandleResult::Handled)
            .count()
    }

    /// Deliver `event` and return a notifier that completes once delivery is done
    pub fn inject_with_notifier(&self, event: &Event) -> Notifier {
        let (notifier, completer) = Notifier::pending();
        self.inject(event);
        completer.complete();
        notifier
    }
}

#[derive(Default)]
struct NotifierState {
    done: Mutex<bool>,
    cond: Condvar,
}

/// Completion signal for an asynchronous engine operation
#[derive(Clone)]
pub struct Notifier {
    state: Arc<NotifierState>,
}

/// Completes the [`Notifier`] it was created with
pub struct Completer {
    state: Arc<NotifierState>,
}

impl Notifier {
    /// Create a pending notifier and the completer that finishes it
    pub fn pending() -> (Notifier, Completer) {
        let state = Arc::new(NotifierState::default());
        (
            Notifier {
                state: state.clone(),
            },
            Completer { state },
        )
    }

    /// A notifier that is already complete
    pub fn completed() -> Notifier {
        let (notifier, completer) = Self::pending();
        completer.complete();
        notifier
    }

    /// Check completion without blocking
    pub fn is_complete(&self) -> bool {
        *self.state.done.lock()
    }

    /// Block until the operation completes
    ///
    /// There is no timeout.
    pub fn wait(&self) {
        let mut done = self.state.done.lock();
        while !*done {
            self.state.cond.wait(&mut done);
        }
    }
}

impl Completer {
    /// Mark the operation complete and wake all waiters
    pub fn complete(self) {
        *self.state.done.lock() = true;
        self.state.cond.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;
    use std::time::Duration;

    fn counter(result: HandleResult) -> (Arc<dyn EventHandler>, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let handler = move |_: &Event| {
            seen.fetch_add(1, Ordering::SeqCst);
            result
        };
        (Arc::new(handler), count)
    }

    #[test]
    fn test_inject_reaches_matching_kind_only() {
        let dispatcher = EventDispatcher::new();
        let (keyboard, keyboard_count) = counter(HandleResult::Handled);
        let (warning, warning_count) = counter(HandleResult::Handled);
        dispatcher.subscribe(keyboard, EventKind::ShowKeyboard);
        dispatcher.subscribe(warning, EventKind::Warning);

        assert_eq!(dispatcher.inject(&Event::ShowKeyboard), 1);
        assert_eq!(keyboard_count.load(Ordering::SeqCst), 1);
        assert_eq!(warning_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handled_count() {
        let dispatcher = EventDispatcher::new();
        let (a, _) = counter(HandleResult::Handled);
        let (b, b_count) = counter(HandleResult::NotHandled);
        dispatcher.subscribe(a, EventKind::HideKeyboard);
        dispatcher.subscribe(b, EventKind::HideKeyboard);

        assert_eq!(dispatcher.inject(&Event::HideKeyboard), 1);
        assert_eq!(b_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let dispatcher = EventDispatcher::new();
        let (handler, count) = counter(HandleResult::Handled);
        let id = dispatcher.subscribe(handler, EventKind::ShowKeyboard);

        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));
        dispatcher.inject(&Event::ShowKeyboard);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handler_can_reinject() {
        let dispatcher = Arc::new(EventDispatcher::new());
        let (hide, hide_count) = counter(HandleResult::Handled);
        dispatcher.subscribe(hide, EventKind::HideKeyboard);

        let inner = dispatcher.clone();
        let forward = move |_: &Event| {
            inner.inject(&Event::HideKeyboard);
            HandleResult::Handled
        };
        dispatcher.subscribe(Arc::new(forward), EventKind::ShowKeyboard);

        dispatcher.inject(&Event::ShowKeyboard);
        assert_eq!(hide_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_inject_with_notifier_completes() {
        let dispatcher = EventDispatcher::new();
        let notifier = dispatcher.inject_with_notifier(&Event::HideKeyboard);
        assert!(notifier.is_complete());
        notifier.wait();
    }

    #[test]
    fn test_notifier_wait_blocks_until_complete() {
        let (notifier, completer) = Notifier::pending();
        assert!(!notifier.is_complete());

        let waiter = notifier.clone();
        let handle = thread::spawn(move || {
            waiter.wait();
            waiter.is_complete()
        });

        thread::sleep(Duration::from_millis(20));
        completer.complete();
        assert!(handle.join().unwrap());
    }
}
