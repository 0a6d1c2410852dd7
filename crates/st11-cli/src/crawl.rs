//! The `crawl` command: start the worker, relay its events to the
//! terminal, honor Ctrl-C as the cooperative stop action, and export the
//! result set.
//!
//! The worker owns the whole browser-driven sequence; this side only
//! listens on the event channel and holds the cancellation token. Partial
//! results from a cancelled run are still displayed and exportable.

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use st11_core::Product;
use st11_scraper::{run_crawl, CrawlEvent, EventSender};

use crate::table::render_table;

pub(crate) async fn run(
    url: String,
    export: Option<PathBuf>,
    images_dir: Option<PathBuf>,
    headless: bool,
) -> anyhow::Result<()> {
    let url = url.trim().to_owned();
    if url.is_empty() {
        anyhow::bail!("a category URL is required");
    }

    let mut config = st11_core::load_app_config_from_env()?;
    if headless {
        config.headless = true;
    }
    if let Some(dir) = images_dir {
        config.image_dir = dir;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::info!(%url, "crawl starting");

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("stop requested; the current step will finish first");
                cancel.cancel();
            }
        });
    }

    let (events, mut rx) = EventSender::channel();
    let worker = {
        let config = config.clone();
        let url = url.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let result = run_crawl(&config, &url, &cancel, &events).await;
            if let Err(ref e) = result {
                events.error(e.to_string());
            }
            events.finished();
            result
        })
    };

    // Event loop: the one-directional stream from the worker drives all
    // terminal output until Finished arrives.
    let mut products: Vec<Product> = Vec::new();
    while let Some(event) = rx.recv().await {
        match event {
            CrawlEvent::Phase(phase) => tracing::info!(%phase, "phase change"),
            CrawlEvent::Log(line) => tracing::info!("{line}"),
            CrawlEvent::Products(list) => products = list,
            CrawlEvent::Error(message) => tracing::error!("{message}"),
            CrawlEvent::Finished => break,
        }
    }

    let outcome = worker
        .await?
        .map_err(|e| anyhow::anyhow!("crawl failed: {e}"))?;

    if !products.is_empty() {
        println!("{}", render_table(&products));
    }
    if outcome.was_cancelled() {
        tracing::warn!(
            products = products.len(),
            "run cancelled; results above are partial"
        );
    }

    if let Some(path) = export {
        if products.is_empty() {
            tracing::warn!(path = %path.display(), "nothing to export; no file written");
        } else {
            let summary = st11_export::export_products(&products, &path)?;
            println!(
                "saved {} rows ({} with embedded images) to {}",
                summary.rows,
                summary.embedded,
                path.display()
            );
        }
    }

    Ok(())
}
