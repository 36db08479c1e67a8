//! # Promise Demo
//!
//! Drives a toaster the way a UI would: a console "renderer" subscribes to the
//! store, a couple of async operations are bound to toasts, and a tick loop
//! retires toasts whose time is up.
//!
//! Run with `RUST_LOG=debug` to see every dispatched action.

use anyhow::{bail, Result};
use std::time::Duration;
use toastkit_core::{
    PromiseMessages, PromiseOptions, ToastOptions, ToastPosition, Toaster, ToasterConfig,
    ToasterState, ValueOrFn,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Renderer (prints each state it is notified with)
// ============================================================================

fn render(state: &ToasterState) {
    let line: Vec<String> = state
        .toasts
        .iter()
        .map(|t| {
            let marker = if t.visible { "" } else { " (leaving)" };
            format!("[{} #{}] {}{}", t.kind.as_str(), t.id, t.render_message(), marker)
        })
        .collect();

    if line.is_empty() {
        println!("  <no toasts>");
    } else {
        println!("  {}", line.join("  "));
    }
}

// ============================================================================
// Operations (stand-ins for real IO)
// ============================================================================

async fn upload(files: u32) -> Result<u32, String> {
    tokio::time::sleep(Duration::from_millis(800)).await;
    Ok(files)
}

async fn sync_settings() -> Result<(), String> {
    tokio::time::sleep(Duration::from_millis(400)).await;
    Err("server unreachable".to_string())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ToasterConfig::from_json_str(
        r#"{ "toast_limit": 5, "remove_delay_ms": 300, "durations": { "success": 1200 } }"#,
    )?;
    let toaster = Toaster::builder().with_config(config).build()?;
    let subscription = toaster.store().subscribe(render);

    toaster.plain("Welcome back", ToastOptions::new().with_duration(0));

    let corner = ToastOptions::new().with_position(ToastPosition::BottomRight);
    let uploads = toaster.promise(
        upload(3),
        PromiseMessages::new(
            "Uploading 3 files...",
            ValueOrFn::from_fn(|n: &u32| format!("Uploaded {n} files")),
            ValueOrFn::from_fn(|e: &String| format!("Upload failed: {e}")),
        ),
        PromiseOptions::new().with_base(corner),
    );

    let sync = toaster.promise(
        sync_settings(),
        PromiseMessages::new(
            "Syncing settings...",
            "Settings synced",
            ValueOrFn::from_fn(|e: &String| format!("Sync failed: {e}")),
        ),
        PromiseOptions::new(),
    );

    if sync.await.is_ok() {
        bail!("settings sync was expected to fail in this demo");
    }
    let uploaded = uploads.await.map_err(anyhow::Error::msg)?;
    info!(uploaded, "upload finished");

    // Tick like a renderer would until only the sticky welcome toast is left.
    while toaster.store().read(|state| state.visible().count()) > 1 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        toaster.dismiss_expired();
    }
    tokio::time::sleep(Duration::from_millis(400)).await;

    toaster.dismiss(None);
    tokio::time::sleep(Duration::from_millis(400)).await;

    subscription.unsubscribe();
    println!("done, {} toasts left", toaster.store().state().len());

    Ok(())
}
