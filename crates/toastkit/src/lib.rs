//! # toastkit
//!
//! A state and lifecycle engine for toasts: short-lived notifications that
//! appear, time out, and disappear.
//!
//! ## Core Concepts
//!
//! - [`Toast`] = one notification record (id, type, message, timing)
//! - [`Action`] = a closed set of transitions (upsert, dismiss, remove, pause)
//! - [`Store`] = the toast collection; applies actions and notifies listeners
//! - [`Toaster`] = the API callers use: shorthands per type and promise binding
//!
//! Rendering is not part of this crate. A renderer subscribes to the store,
//! paints what it sees, and reports back (pause on hover, measured heights,
//! expiry ticks).
//!
//! ## Architecture
//!
//! ```text
//! Toaster.success("Saved")
//!     │
//!     ▼ Toast::create_with()      (id, created_at, per-type duration)
//! Store.dispatch(Action::Upsert)
//!     │
//!     ▼ ToasterState::apply()     (pure transition)
//!     │
//!     └─► listener(&state) ──► renderer
//!                                  │
//!                  dismiss / pause / update_height
//!                                  │
//!                                  ▼
//!                          Store.dispatch(..)
//! ```
//!
//! ## Key Invariants
//!
//! 1. **Ids are unique** - Upserting an existing id replaces it in place
//! 2. **Order is display order** - New toasts are appended, oldest first
//! 3. **`created_at` is set once** - Replacements keep the original timestamp
//! 4. **Dispatch is synchronous** - Listeners see the new state before
//!    `dispatch` returns
//! 5. **Unknown ids are no-ops** - Dismissing or removing a missing toast is
//!    never an error
//!
//! ## Promise Binding
//!
//! ```no_run
//! use toastkit_core::{PromiseMessages, PromiseOptions, Toaster, ValueOrFn};
//!
//! # async fn example() {
//! let toaster = Toaster::new();
//! let upload = async { Ok::<u32, String>(42) };
//!
//! let result = toaster
//!     .promise(
//!         upload,
//!         PromiseMessages::new(
//!             "Uploading...",
//!             ValueOrFn::from_fn(|n: &u32| format!("Uploaded {n} files")),
//!             ValueOrFn::from_fn(|e: &String| format!("Upload failed: {e}")),
//!         ),
//!         PromiseOptions::new(),
//!     )
//!     .await;
//!
//! assert_eq!(result, Ok(42));
//! # }
//! ```
//!
//! The loading toast appears as soon as `promise` is called, and the
//! operation runs on its own tokio task. When it settles, the same id becomes
//! a success or error toast whether or not anyone awaits the handle, and the
//! caller receives the operation's own result. `promise_lazy` is the
//! executor-agnostic form that only progresses while polled.

// Core modules
mod action;
mod config;
mod error;
mod state;
mod store;
mod toast;
mod toaster;
mod value;

pub mod id;

// Re-export core types
pub use crate::action::Action;
pub use crate::state::{ToasterState, DEFAULT_TOAST_LIMIT};
pub use crate::toast::{
    AriaLive, DurationDefaults, IconTheme, Role, Toast, ToastMessage, ToastOptions,
    ToastPosition, ToastType, FALLBACK_DURATION_MS,
};
pub use crate::value::ValueOrFn;

// Re-export store types
pub use store::{Listener, Store, Subscription};

// Re-export API types (primary entry point)
pub use toaster::{PromiseHandle, PromiseMessages, PromiseOptions, Toaster, ToasterBuilder};

// Re-export config and error types
pub use config::{ToasterConfig, DEFAULT_REMOVE_DELAY_MS};
pub use error::{Result, ToastError};
