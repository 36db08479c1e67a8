//! The toast store: shared state, dispatch, and synchronous listeners.

use smallvec::SmallVec;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, ThreadId};
use tracing::{debug, trace};

use crate::action::Action;
use crate::state::{ToasterState, DEFAULT_TOAST_LIMIT};
use crate::toast::Toast;

/// Callback invoked with the new state after every dispatch.
pub type Listener = Arc<dyn Fn(&ToasterState) + Send + Sync>;

/// Handle to a toast store.
///
/// Cloning is cheap and every clone refers to the same state. Independent
/// stores can be created freely, e.g. one per test.
///
/// ```
/// use toastkit_core::{Action, Store, Toast, ToastOptions, ToastType};
///
/// let store = Store::new();
/// let toast = Toast::create("Saved", ToastType::Success, ToastOptions::new().with_id("save"));
/// store.dispatch(Action::Upsert(toast));
///
/// assert!(store.state().contains("save"));
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<ToasterState>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener: AtomicU64,
    toast_limit: usize,
    /// Held for a whole reduce-and-notify turn.
    serial: Mutex<()>,
    /// Thread currently holding `serial`.
    owner: Mutex<Option<ThreadId>>,
    /// Actions dispatched by listeners during the current turn.
    nested: Mutex<VecDeque<Action>>,
}

impl Store {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_TOAST_LIMIT)
    }

    /// Create a store keeping at most `toast_limit` toasts (minimum 1).
    pub fn with_limit(toast_limit: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(ToasterState::new()),
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(0),
                toast_limit: toast_limit.max(1),
                serial: Mutex::new(()),
                owner: Mutex::new(None),
                nested: Mutex::new(VecDeque::new()),
            }),
        }
    }

    pub fn toast_limit(&self) -> usize {
        self.inner.toast_limit
    }

    /// Apply `action` and notify every listener before returning.
    ///
    /// Dispatches are serialized: a dispatch from another thread waits until
    /// the current one has notified every listener, so listeners observe
    /// states in dispatch order.
    ///
    /// A listener may dispatch. Its action is queued and applied, with its
    /// own notification, once the current notification finishes and before
    /// the outer `dispatch` returns. A listener must not block on another
    /// thread that dispatches to the same store.
    pub fn dispatch(&self, action: Action) {
        if self.dispatching_on_this_thread() {
            trace!(action = action.kind(), "queueing toast action dispatched by a listener");
            lock(&self.inner.nested).push_back(action);
            return;
        }

        let _turn = DispatchTurn::begin(&self.inner);
        let mut next = Some(action);
        while let Some(action) = next {
            self.apply_and_notify(action);
            next = lock(&self.inner.nested).pop_front();
        }
    }

    fn dispatching_on_this_thread(&self) -> bool {
        *lock(&self.inner.owner) == Some(thread::current().id())
    }

    fn apply_and_notify(&self, action: Action) {
        debug!(action = action.kind(), toast_id = ?action.toast_id(), "dispatching toast action");

        let snapshot = {
            let mut state = lock(&self.inner.state);
            let changed = state.apply(action, self.inner.toast_limit);
            trace!(changed, toasts = state.len(), "toast action applied");
            state.clone()
        };

        let listeners: SmallVec<[Listener; 4]> = lock(&self.inner.listeners)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        trace!(listeners = listeners.len(), "notifying toast listeners");
        for listener in &listeners {
            listener(&snapshot);
        }
    }

    /// Register `listener` to be called with the full state after every
    /// dispatch.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ToasterState) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.listeners).push((id, Arc::new(listener)));
        trace!(listener_id = id, "toast listener subscribed");

        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).len()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ToasterState {
        lock(&self.inner.state).clone()
    }

    /// Current toasts in display order.
    pub fn toasts(&self) -> Vec<Toast> {
        lock(&self.inner.state).toasts.clone()
    }

    /// Read the state in place without cloning it.
    ///
    /// `f` runs under the state lock and must not dispatch.
    pub fn read<R>(&self, f: impl FnOnce(&ToasterState) -> R) -> R {
        let state = lock(&self.inner.state);
        f(&*state)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("toast_limit", &self.inner.toast_limit)
            .field("toasts", &lock(&self.inner.state).len())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// One thread's exclusive reduce-and-notify turn.
struct DispatchTurn<'a> {
    inner: &'a Inner,
    _serial: MutexGuard<'a, ()>,
}

impl<'a> DispatchTurn<'a> {
    fn begin(inner: &'a Inner) -> Self {
        let serial = lock(&inner.serial);
        *lock(&inner.owner) = Some(thread::current().id());
        Self {
            inner,
            _serial: serial,
        }
    }
}

// Runs before `_serial` is released, and also when a listener panics.
impl Drop for DispatchTurn<'_> {
    fn drop(&mut self) {
        *lock(&self.inner.owner) = None;
        lock(&self.inner.nested).clear();
    }
}

/// Capability to deregister a listener.
///
/// Dropping it leaves the listener registered.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    store: Weak<Inner>,
}

impl Subscription {
    /// Stop receiving state updates. A no-op if the store is gone.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            lock(&inner.listeners).retain(|(id, _)| *id != self.id);
            trace!(listener_id = self.id, "toast listener unsubscribed");
        }
    }
}

// Listeners and resolvers never run under the state or listener locks, and a
// panicking listener releases `serial` through `DispatchTurn`, so the guarded
// data is still consistent after poisoning.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
