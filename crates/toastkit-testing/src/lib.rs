//! Testing utilities for toastkit.
//!
//! - [`StateRecorder`] subscribes to a store and keeps every state it was
//!   notified with, so tests can assert on the sequence of transitions.
//! - [`ToastLookup`] adds panicking lookups to [`ToasterState`] for terse
//!   assertions.
//!
//! ```
//! use toastkit_core::{ToastOptions, ToastType, Toaster};
//! use toastkit_testing::{StateRecorder, ToastLookup};
//!
//! let toaster = Toaster::new();
//! let recorder = StateRecorder::attach(toaster.store());
//!
//! let id = toaster.loading("Working", ToastOptions::new());
//! toaster.success("Done", ToastOptions::new().with_id(id.clone()));
//!
//! assert_eq!(recorder.len(), 2);
//! assert_eq!(recorder.last().toast(&id).kind, ToastType::Success);
//! assert_eq!(recorder.kinds_of(&id), [ToastType::Loading, ToastType::Success]);
//! ```

use std::sync::{Arc, Mutex, MutexGuard};
use toastkit_core::{Store, Subscription, Toast, ToastType, ToasterState};

/// Records every state a store notifies its listeners with.
pub struct StateRecorder {
    states: Arc<Mutex<Vec<ToasterState>>>,
    subscription: Option<Subscription>,
}

impl StateRecorder {
    /// Subscribe to `store` and start recording.
    pub fn attach(store: &Store) -> Self {
        let states = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&states);
        let subscription = store.subscribe(move |state| {
            sink.lock().unwrap().push(state.clone());
        });

        Self {
            states,
            subscription: Some(subscription),
        }
    }

    fn states(&self) -> MutexGuard<'_, Vec<ToasterState>> {
        self.states.lock().unwrap()
    }

    /// Number of notifications received.
    pub fn len(&self) -> usize {
        self.states().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states().is_empty()
    }

    /// All recorded states, oldest first.
    pub fn snapshots(&self) -> Vec<ToasterState> {
        self.states().clone()
    }

    /// The most recent state.
    ///
    /// # Panics
    ///
    /// Panics if nothing has been recorded.
    pub fn last(&self) -> ToasterState {
        self.states()
            .last()
            .cloned()
            .expect("no state has been recorded yet")
    }

    /// The type `id` had in each recorded state where it was present, with
    /// consecutive repeats collapsed.
    pub fn kinds_of(&self, id: &str) -> Vec<ToastType> {
        let mut kinds: Vec<ToastType> = Vec::new();
        for state in self.states().iter() {
            if let Some(toast) = state.get(id) {
                if kinds.last() != Some(&toast.kind) {
                    kinds.push(toast.kind);
                }
            }
        }
        kinds
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.states().clear();
    }

    /// Stop recording. Recorded states stay available.
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl Drop for StateRecorder {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Panicking lookups for assertions.
pub trait ToastLookup {
    /// The toast with `id`.
    ///
    /// # Panics
    ///
    /// Panics if no toast has that id.
    fn toast(&self, id: &str) -> &Toast;

    /// Ids in display order.
    fn ids(&self) -> Vec<&str>;

    /// Rendered message of the toast with `id`.
    fn message(&self, id: &str) -> String {
        self.toast(id).render_message()
    }
}

impl ToastLookup for ToasterState {
    fn toast(&self, id: &str) -> &Toast {
        match self.get(id) {
            Some(toast) => toast,
            None => panic!("no toast with id {id:?}, have {:?}", self.ids()),
        }
    }

    fn ids(&self) -> Vec<&str> {
        self.toasts.iter().map(|t| t.id.as_str()).collect()
    }
}
