//! Watch command.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::Settings;
use crate::generator::RouteGenerator;
use crate::watcher::PageWatcher;

/// Generate once, then regenerate on page changes until Ctrl-C.
pub async fn run(settings: Settings) -> Result<()> {
    let generator = Arc::new(RouteGenerator::new(settings.clone()));

    // An initial failure is reported but does not stop the watcher
    match generator.generate(None) {
        Ok(report) => println!("Generated {} routes", report.routes),
        Err(e) => eprintln!("Error: {e}"),
    }

    let watcher = PageWatcher::builder()
        .settings(&settings)
        .regenerator(generator)
        .start()
        .context("Failed to start page watcher")?;

    println!(
        "Watching {} (press Ctrl-C to stop)",
        watcher.page_root().display()
    );

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for Ctrl-C")?;
        }
        _ = watcher.stopped() => {}
    }

    watcher.stop().await;
    Ok(())
}
