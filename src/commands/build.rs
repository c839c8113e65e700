//! Build static pages

use anyhow::Result;
use notify::Watcher;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::builder::BuildError;
use crate::Folio;

/// Build the pages once
pub fn run(folio: &Folio) -> Result<()> {
    let start = Instant::now();

    let report = match folio.build() {
        Ok(report) => report,
        Err(e) => {
            if let Some(BuildError::PagesFailed {
                failures,
                diagnostics,
            }) = e.downcast_ref::<BuildError>()
            {
                for (page, error) in failures {
                    tracing::error!("{}: {}", page.display(), error);
                }
                if !diagnostics.is_empty() {
                    tracing::warn!("{} warning(s) while building pages", diagnostics.len());
                }
            }
            return Err(e);
        }
    };
    if !report.diagnostics.is_empty() {
        tracing::warn!(
            "{} warning(s) while building pages",
            report.diagnostics.len()
        );
    }

    tracing::info!("Built in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

/// Watch the source directory and config file, rebuilding on change
pub async fn watch(folio: &Folio) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(&folio.source_dir, notify::RecursiveMode::Recursive)?;

    let config_path = folio.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(Path::new(&config_path), notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching {:?} for changes. Press Ctrl+C to stop.", folio.source_dir);

    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                // Debounce: only rebuild if more than 500ms since last rebuild
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, rebuilding...");
                    if let Err(e) = reload(folio).and_then(|folio| run(&folio)) {
                        tracing::error!("Build failed: {}", e);
                    }
                    last_rebuild = Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

/// Re-read the configuration so edits to it apply on the next build
pub(crate) fn reload(folio: &Folio) -> Result<Folio> {
    Folio::new(&folio.base_dir)
}
