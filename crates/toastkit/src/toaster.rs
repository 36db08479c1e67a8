//! The public toast API: shorthands, dismissal, and promise binding.

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::future::Future;
use std::panic;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::action::Action;
use crate::config::ToasterConfig;
use crate::error::Result;
use crate::store::Store;
use crate::toast::{DurationDefaults, Toast, ToastMessage, ToastOptions, ToastType};
use crate::value::ValueOrFn;

/// Messages shown while a bound operation runs and once it settles.
pub struct PromiseMessages<T, E> {
    pub loading: String,
    pub success: ValueOrFn<String, T>,
    pub error: ValueOrFn<String, E>,
}

impl<T, E> PromiseMessages<T, E> {
    pub fn new(
        loading: impl Into<String>,
        success: impl Into<ValueOrFn<String, T>>,
        error: impl Into<ValueOrFn<String, E>>,
    ) -> Self {
        Self {
            loading: loading.into(),
            success: success.into(),
            error: error.into(),
        }
    }
}

/// Options for a bound operation.
///
/// `base` applies to every stage; the per-stage options are merged over it.
#[derive(Debug, Clone, Default)]
pub struct PromiseOptions {
    pub base: ToastOptions,
    pub loading: ToastOptions,
    pub success: ToastOptions,
    pub error: ToastOptions,
}

impl PromiseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(mut self, options: ToastOptions) -> Self {
        self.base = options;
        self
    }

    pub fn with_loading(mut self, options: ToastOptions) -> Self {
        self.loading = options;
        self
    }

    pub fn with_success(mut self, options: ToastOptions) -> Self {
        self.success = options;
        self
    }

    pub fn with_error(mut self, options: ToastOptions) -> Self {
        self.error = options;
        self
    }
}

/// A bound operation running on a tokio task, returned by
/// [`Toaster::promise`].
///
/// Awaiting it yields the operation's own result. Dropping it detaches the
/// task; the operation keeps running and still settles the toast.
#[derive(Debug)]
pub struct PromiseHandle<T, E> {
    id: String,
    task: JoinHandle<std::result::Result<T, E>>,
}

impl<T, E> PromiseHandle<T, E> {
    /// Id of the toast tracking the operation.
    pub fn toast_id(&self) -> &str {
        &self.id
    }
}

impl<T, E> Future for PromiseHandle<T, E> {
    type Output = std::result::Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.task).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(err)) if err.is_panic() => panic::resume_unwind(err.into_panic()),
            // Only happens when the runtime shuts down under the task.
            Poll::Ready(Err(err)) => {
                panic!("bound operation for toast {} did not finish: {err}", this.id)
            }
        }
    }
}

/// Builder for [`Toaster`].
#[derive(Debug, Default)]
pub struct ToasterBuilder {
    config: ToasterConfig,
    store: Option<Store>,
}

impl ToasterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ToasterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_toast_limit(mut self, toast_limit: usize) -> Self {
        self.config.toast_limit = toast_limit;
        self
    }

    pub fn with_remove_delay(mut self, delay: Duration) -> Self {
        self.config.remove_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_durations(mut self, durations: DurationDefaults) -> Self {
        self.config.durations = durations;
        self
    }

    /// Drive an existing store instead of creating one.
    ///
    /// The store keeps its own toast limit.
    pub fn with_store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<Toaster> {
        self.config.validate()?;
        let store = self
            .store
            .unwrap_or_else(|| Store::with_limit(self.config.toast_limit));

        Ok(Toaster {
            store,
            config: Arc::new(self.config),
            removals: Arc::new(DashMap::new()),
        })
    }
}

/// Entry point for showing and retiring toasts.
///
/// Every call goes through [`Store::dispatch`]; the toaster adds the toast
/// factory defaults, the post-dismissal removal timers, and promise binding.
///
/// ```
/// use toastkit_core::{ToastOptions, Toaster};
///
/// let toaster = Toaster::new();
/// let id = toaster.success("Saved", ToastOptions::new());
///
/// toaster.dismiss(Some(&id));
/// assert!(!toaster.store().state().get(&id).unwrap().visible);
/// ```
#[derive(Clone)]
pub struct Toaster {
    store: Store,
    config: Arc<ToasterConfig>,
    removals: Arc<DashMap<String, JoinHandle<()>>>,
}

impl Toaster {
    /// A toaster with default config and a fresh store.
    pub fn new() -> Self {
        let config = ToasterConfig::default();
        Self {
            store: Store::with_limit(config.toast_limit),
            config: Arc::new(config),
            removals: Arc::new(DashMap::new()),
        }
    }

    pub fn builder() -> ToasterBuilder {
        ToasterBuilder::new()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &ToasterConfig {
        &self.config
    }

    /// Build a toast with this toaster's duration defaults, without showing it.
    pub fn create(
        &self,
        message: impl Into<ToastMessage>,
        kind: ToastType,
        options: ToastOptions,
    ) -> Toast {
        Toast::create_with(message, kind, options, &self.config.durations)
    }

    /// Show (or replace, if the id exists) a toast of `kind`. Returns its id.
    pub fn show(
        &self,
        message: impl Into<ToastMessage>,
        kind: ToastType,
        options: ToastOptions,
    ) -> String {
        let toast = self.create(message, kind, options);
        let id = toast.id.clone();
        self.cancel_removal(&id);
        self.store.dispatch(Action::Upsert(toast));
        id
    }

    pub fn plain(&self, message: impl Into<ToastMessage>, options: ToastOptions) -> String {
        self.show(message, ToastType::Blank, options)
    }

    pub fn error(&self, message: impl Into<ToastMessage>, options: ToastOptions) -> String {
        self.show(message, ToastType::Error, options)
    }

    pub fn success(&self, message: impl Into<ToastMessage>, options: ToastOptions) -> String {
        self.show(message, ToastType::Success, options)
    }

    pub fn loading(&self, message: impl Into<ToastMessage>, options: ToastOptions) -> String {
        self.show(message, ToastType::Loading, options)
    }

    pub fn custom(&self, message: impl Into<ToastMessage>, options: ToastOptions) -> String {
        self.show(message, ToastType::Custom, options)
    }

    /// Hide one toast, or all of them with `None`.
    ///
    /// Each hidden toast is removed after the configured grace interval when
    /// a tokio runtime is available.
    pub fn dismiss(&self, id: Option<&str>) {
        let targets: Vec<String> = self.store.read(|state| match id {
            Some(id) => state.get(id).map(|t| t.id.clone()).into_iter().collect(),
            None => state.toasts.iter().map(|t| t.id.clone()).collect(),
        });

        self.store.dispatch(Action::Dismiss(id.map(str::to_owned)));

        for target in targets {
            self.schedule_removal(target);
        }
    }

    /// Delete one toast, or all of them with `None`, right away.
    pub fn remove(&self, id: Option<&str>) {
        match id {
            Some(id) => self.cancel_removal(id),
            None => self.cancel_all_removals(),
        }
        self.store.dispatch(Action::Remove(id.map(str::to_owned)));
    }

    /// Dismiss every visible toast whose duration has elapsed. Returns their
    /// ids. Meant to be called from a renderer's tick.
    pub fn dismiss_expired(&self) -> Vec<String> {
        let expired = self.store.read(|state| state.expired_ids(Utc::now()));
        for id in &expired {
            self.dismiss(Some(id));
        }
        expired
    }

    pub fn pause(&self) {
        self.store.dispatch(Action::StartPause { at: Utc::now() });
    }

    pub fn resume(&self) {
        self.store.dispatch(Action::EndPause { at: Utc::now() });
    }

    pub fn update_height(&self, id: &str, height: f64) {
        self.store.dispatch(Action::UpdateHeight {
            id: id.to_owned(),
            height,
        });
    }

    /// Bind a toast to `operation`.
    ///
    /// A loading toast is shown immediately, before this returns, and
    /// `operation` starts on a spawned tokio task. Once it settles the same
    /// toast id is upserted as a success or error toast. Awaiting the
    /// returned handle yields the operation's own result untouched; dropping
    /// it detaches the task, which still settles the toast.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime. A panic in `operation` or in
    /// a message resolver is resumed when the handle is awaited, and the
    /// loading toast is left in place.
    pub fn promise<F, T, E>(
        &self,
        operation: F,
        messages: PromiseMessages<T, E>,
        options: PromiseOptions,
    ) -> PromiseHandle<T, E>
    where
        F: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (id, settle) = self.bind(operation, messages, options);
        PromiseHandle {
            task: tokio::spawn(settle),
            id,
        }
    }

    /// Executor-agnostic form of [`Toaster::promise`].
    ///
    /// The loading toast is shown immediately, but nothing else happens until
    /// the returned future is polled. Dropping it before completion cancels
    /// `operation` and leaves the loading toast showing. A panic in a message
    /// resolver unwinds out of the future.
    pub fn promise_lazy<F, T, E>(
        &self,
        operation: F,
        messages: PromiseMessages<T, E>,
        options: PromiseOptions,
    ) -> impl Future<Output = std::result::Result<T, E>>
    where
        F: Future<Output = std::result::Result<T, E>>,
    {
        self.bind(operation, messages, options).1
    }

    fn bind<F, T, E>(
        &self,
        operation: F,
        messages: PromiseMessages<T, E>,
        options: PromiseOptions,
    ) -> (String, impl Future<Output = std::result::Result<T, E>>)
    where
        F: Future<Output = std::result::Result<T, E>>,
    {
        let PromiseMessages {
            loading,
            success,
            error,
        } = messages;
        let id = self.loading(loading, options.base.merged(&options.loading));
        let toaster = self.clone();
        let toast_id = id.clone();

        let settle = async move {
            let outcome = operation.await;

            let (kind, message, stage) = match &outcome {
                Ok(value) => (ToastType::Success, success.resolve(value), &options.success),
                Err(err) => (ToastType::Error, error.resolve(err), &options.error),
            };
            debug!(toast_id = %toast_id, outcome = kind.as_str(), "bound operation settled");

            let mut terminal = options.base.merged(stage);
            terminal.id = Some(toast_id);
            toaster.show(message, kind, terminal);

            outcome
        };
        (id, settle)
    }

    /// Number of dismissed toasts still waiting for removal.
    pub fn pending_removals(&self) -> usize {
        self.removals.len()
    }

    fn schedule_removal(&self, id: String) {
        let Some(delay) = self.config.remove_delay() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            trace!(toast_id = %id, "no runtime, toast removal left to the caller");
            return;
        };

        match self.removals.entry(id) {
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                let id = slot.key().clone();
                let store = self.store.clone();
                let removals = Arc::clone(&self.removals);
                let delay_ms = self.config.remove_delay_ms;
                debug!(toast_id = %id, delay_ms, "toast removal scheduled");

                let handle = runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    // Skip if this schedule was cancelled or replaced meanwhile.
                    let current = tokio::task::id();
                    if removals.remove_if(&id, |_, h| h.id() == current).is_some() {
                        store.dispatch(Action::RemoveDismissed(id));
                    }
                });
                slot.insert(handle);
            }
        }
    }

    fn cancel_removal(&self, id: &str) {
        if let Some((_, handle)) = self.removals.remove(id) {
            handle.abort();
            debug!(toast_id = %id, "toast removal cancelled");
        }
    }

    fn cancel_all_removals(&self) {
        self.removals.retain(|_, handle| {
            handle.abort();
            false
        });
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Toaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toaster")
            .field("store", &self.store)
            .field("config", &self.config)
            .field("pending_removals", &self.removals.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::Role;

    #[test]
    fn shorthands_set_type_and_return_id() {
        let toaster = Toaster::new();

        let plain = toaster.plain("p", ToastOptions::new());
        let error = toaster.error("e", ToastOptions::new());
        let success = toaster.success("s", ToastOptions::new());
        let loading = toaster.loading("l", ToastOptions::new());
        let custom = toaster.custom("c", ToastOptions::new());

        let state = toaster.store().state();
        assert_eq!(state.get(&plain).unwrap().kind, ToastType::Blank);
        assert_eq!(state.get(&error).unwrap().kind, ToastType::Error);
        assert_eq!(state.get(&success).unwrap().kind, ToastType::Success);
        assert_eq!(state.get(&loading).unwrap().kind, ToastType::Loading);
        assert_eq!(state.get(&custom).unwrap().kind, ToastType::Custom);
        assert_eq!(state.len(), 5);
    }

    #[test]
    fn caller_id_deduplicates() {
        let toaster = Toaster::new();

        toaster.loading("Saving", ToastOptions::new().with_id("save"));
        toaster.success("Saved", ToastOptions::new().with_id("save"));

        let state = toaster.store().state();
        assert_eq!(state.len(), 1);
        assert_eq!(state.get("save").unwrap().render_message(), "Saved");
    }

    #[test]
    fn configured_durations_are_used() {
        let toaster = Toaster::builder()
            .with_durations(DurationDefaults {
                success: 750,
                ..DurationDefaults::default()
            })
            .build()
            .unwrap();

        let id = toaster.success("ok", ToastOptions::new());
        assert_eq!(toaster.store().state().get(&id).unwrap().duration, 750);
    }

    #[test]
    fn builder_rejects_zero_limit() {
        assert!(Toaster::builder().with_toast_limit(0).build().is_err());
    }

    #[test]
    fn dismiss_without_runtime_only_hides() {
        let toaster = Toaster::new();
        let id = toaster.plain("p", ToastOptions::new().with_role(Role::Alert));

        toaster.dismiss(Some(&id));

        let state = toaster.store().state();
        assert!(!state.get(&id).unwrap().visible);
        assert_eq!(toaster.pending_removals(), 0);

        toaster.remove(Some(&id));
        assert!(toaster.store().state().is_empty());
    }

    #[test]
    fn dismiss_expired_hides_elapsed_toasts() {
        let toaster = Toaster::new();
        let expired = toaster.plain("gone", ToastOptions::new().with_duration(1));
        let sticky = toaster.plain("stays", ToastOptions::new().with_duration(0));

        std::thread::sleep(Duration::from_millis(5));
        let dismissed = toaster.dismiss_expired();

        assert_eq!(dismissed, [expired.clone()]);
        let state = toaster.store().state();
        assert!(!state.get(&expired).unwrap().visible);
        assert!(state.get(&sticky).unwrap().visible);
    }

    #[test]
    fn pause_blocks_expiry() {
        let toaster = Toaster::new();
        toaster.plain("gone", ToastOptions::new().with_duration(1));

        toaster.pause();
        std::thread::sleep(Duration::from_millis(5));
        assert!(toaster.dismiss_expired().is_empty());

        toaster.resume();
        let state = toaster.store().state();
        assert!(!state.is_paused());
        assert!(state.toasts[0].pause_duration >= 5);
    }

    #[test]
    fn lazy_promise_shows_loading_before_being_polled() {
        let toaster = Toaster::new();
        let _pending = toaster.promise_lazy(
            std::future::pending::<std::result::Result<i32, String>>(),
            PromiseMessages::new("L", "S", "E"),
            PromiseOptions::new(),
        );

        let state = toaster.store().state();
        assert_eq!(state.len(), 1);
        assert_eq!(state.toasts[0].kind, ToastType::Loading);
        assert_eq!(state.toasts[0].render_message(), "L");
    }

    #[test]
    fn terminal_toast_gets_a_full_duration_after_a_slow_load() {
        let toaster = Toaster::builder()
            .with_durations(DurationDefaults {
                success: 50,
                ..DurationDefaults::default()
            })
            .build()
            .unwrap();

        toaster.loading("Saving", ToastOptions::new().with_id("save"));
        std::thread::sleep(Duration::from_millis(80));
        toaster.success("Saved", ToastOptions::new().with_id("save"));

        assert!(toaster.dismiss_expired().is_empty());
        assert!(toaster.store().state().get("save").unwrap().visible);
    }
}
