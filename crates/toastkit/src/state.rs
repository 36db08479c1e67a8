//! Toast collection state and the reducer that advances it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::action::Action;
use crate::toast::Toast;

/// Default maximum number of toasts kept in the collection.
pub const DEFAULT_TOAST_LIMIT: usize = 20;

/// Snapshot of everything a renderer needs.
///
/// Toasts are in display order, oldest first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToasterState {
    pub toasts: Vec<Toast>,
    pub paused_at: Option<DateTime<Utc>>,
}

impl ToasterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().filter(|t| t.visible)
    }

    /// Apply `action`, keeping at most `limit` toasts.
    ///
    /// Returns `false` when the action changed nothing.
    pub fn apply(&mut self, action: Action, limit: usize) -> bool {
        match action {
            Action::Upsert(toast) => {
                match self.toasts.iter_mut().find(|t| t.id == toast.id) {
                    Some(existing) => {
                        let merged = toast.merged_over(existing);
                        *existing = merged;
                    }
                    None => {
                        self.toasts.push(toast);
                        if self.toasts.len() > limit {
                            let excess = self.toasts.len() - limit;
                            self.toasts.drain(..excess);
                        }
                    }
                }
                true
            }
            Action::Dismiss(Some(id)) => match self.toasts.iter_mut().find(|t| t.id == id) {
                Some(toast) if toast.visible => {
                    toast.visible = false;
                    true
                }
                _ => false,
            },
            Action::Dismiss(None) => {
                let mut changed = false;
                for toast in self.toasts.iter_mut().filter(|t| t.visible) {
                    toast.visible = false;
                    changed = true;
                }
                changed
            }
            Action::Remove(Some(id)) => {
                let before = self.toasts.len();
                self.toasts.retain(|t| t.id != id);
                self.toasts.len() != before
            }
            Action::RemoveDismissed(id) => {
                let before = self.toasts.len();
                self.toasts.retain(|t| t.id != id || t.visible);
                self.toasts.len() != before
            }
            Action::Remove(None) => {
                let changed = !self.toasts.is_empty();
                self.toasts.clear();
                changed
            }
            Action::StartPause { at } => {
                self.paused_at = Some(at);
                true
            }
            Action::EndPause { at } => {
                let Some(paused_at) = self.paused_at.take() else {
                    return false;
                };
                let paused_ms = u64::try_from((at - paused_at).num_milliseconds()).unwrap_or(0);
                for toast in &mut self.toasts {
                    toast.pause_duration = toast.pause_duration.saturating_add(paused_ms);
                }
                true
            }
            Action::UpdateHeight { id, height } => {
                match self.toasts.iter_mut().find(|t| t.id == id) {
                    Some(toast) => {
                        toast.height = Some(height);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// Ids of visible toasts whose duration has run out at `now`.
    ///
    /// Nothing expires while the store is paused.
    pub fn expired_ids(&self, now: DateTime<Utc>) -> Vec<String> {
        if self.is_paused() {
            return Vec::new();
        }
        self.visible()
            .filter(|t| t.expires_at().is_some_and(|at| at <= now))
            .map(|t| t.id.clone())
            .collect()
    }

    /// Time from `now` until the next visible toast expires.
    ///
    /// `None` when paused or when no visible toast has a duration. An already
    /// expired toast yields a zero duration.
    pub fn next_expiry(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        if self.is_paused() {
            return None;
        }
        self.visible()
            .filter_map(Toast::expires_at)
            .min()
            .map(|at| (at - now).to_std().unwrap_or_default())
    }
}
