//! The closed set of state transitions a store accepts.

use chrono::{DateTime, Utc};

use crate::toast::Toast;

/// A request to change the toast collection.
///
/// `Dismiss` and `Remove` with `None` apply to every toast. Any action naming
/// an id that is not present is a silent no-op.
#[derive(Debug, Clone)]
pub enum Action {
    /// Insert a toast, or merge it over the existing one with the same id.
    Upsert(Toast),
    /// Hide a toast (or all of them) without deleting the record.
    Dismiss(Option<String>),
    /// Delete a toast (or all of them).
    Remove(Option<String>),
    /// Delete a toast only if it is still dismissed. Used for removal after
    /// the dismissal grace interval, so a toast shown again in the meantime
    /// survives.
    RemoveDismissed(String),
    /// The renderer stopped the clock, e.g. on hover.
    StartPause { at: DateTime<Utc> },
    /// The renderer restarted the clock. Time since `StartPause` is credited
    /// to every toast's `pause_duration`.
    EndPause { at: DateTime<Utc> },
    /// Measured height of a rendered toast.
    UpdateHeight { id: String, height: f64 },
}

impl Action {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Upsert(_) => "upsert",
            Self::Dismiss(_) => "dismiss",
            Self::Remove(_) => "remove",
            Self::RemoveDismissed(_) => "remove_dismissed",
            Self::StartPause { .. } => "start_pause",
            Self::EndPause { .. } => "end_pause",
            Self::UpdateHeight { .. } => "update_height",
        }
    }

    /// Toast id the action targets, if it targets one.
    pub fn toast_id(&self) -> Option<&str> {
        match self {
            Self::Upsert(toast) => Some(&toast.id),
            Self::Dismiss(id) | Self::Remove(id) => id.as_deref(),
            Self::RemoveDismissed(id) | Self::UpdateHeight { id, .. } => Some(id),
            Self::StartPause { .. } | Self::EndPause { .. } => None,
        }
    }
}
