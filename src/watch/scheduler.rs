// src/watch/scheduler.rs
use chrono::Utc;
use tokio::time::{self, MissedTickBehavior};

use crate::config::AppletConfig;
use crate::signal::SignalSink;
use crate::watch::fetcher::CategoryFetcher;
use crate::watch::types::Watermark;
use crate::watch::{run_cycle, CycleOutcome};

/// Fixed-interval polling loop. Owns the watermark for its whole lifetime and
/// runs cycles strictly one at a time: a cycle that outlives the period
/// delays the next tick instead of overlapping it, so two cycles can never
/// race the same watermark window.
pub async fn run_watcher<F, S>(cfg: AppletConfig, fetcher: F, sink: S) -> anyhow::Result<()>
where
    F: CategoryFetcher,
    S: SignalSink,
{
    let mut watermark = Watermark::new(Utc::now());
    let mut ticker = time::interval(time::Duration::from_secs(cfg.interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let now = Utc::now();
        let outcome = run_cycle(&fetcher, &cfg, watermark, now).await;
        watermark = outcome.watermark();

        match &outcome {
            CycleOutcome::Quiet { .. } => {
                tracing::debug!("quiet cycle");
            }
            CycleOutcome::Notify { signal, .. } | CycleOutcome::Report { signal, .. } => {
                // The outcome (and watermark) stand even if the surface is
                // unreachable; the sink has no vote in change detection.
                if let Err(err) = sink.send(signal).await {
                    tracing::warn!(error = %err, "signal sink failed");
                }
            }
        }
    }
}
