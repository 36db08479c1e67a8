//! Toast identifier generation.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a toast id that has not been handed out before in this process.
///
/// Ids come from a process-wide counter, so they are also distinct across
/// independent stores and threads.
pub fn generate() -> String {
    NEXT_ID.fetch_add(1, Ordering::Relaxed).to_string()
}
