// src/watch/mod.rs
pub mod aggregate;
pub mod category;
pub mod classify;
pub mod fetcher;
pub mod scheduler;
pub mod types;

use chrono::{DateTime, Utc};

use crate::config::AppletConfig;
use crate::signal::Signal;
use crate::watch::aggregate::SignalDraft;
use crate::watch::classify::{classify, Classification};
use crate::watch::fetcher::CategoryFetcher;
use crate::watch::types::{ChangeEvent, Watermark};

/// Fixed first line of a reported-error signal; the second carries the detail.
const ERROR_HINT: &str =
    "The Teamwork service returned an error. Please check your API key and account.";

/// What one polling cycle decided. The watermark is threaded through rather
/// than mutated in place; it only moves on `Notify`.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Nothing changed and nothing went wrong; emit nothing.
    Quiet { watermark: Watermark },
    /// Changes were found: emit the coalesced signal, watermark advanced.
    Notify { signal: Signal, watermark: Watermark },
    /// A reportable fetch failure: emit the error signal, watermark held.
    Report { signal: Signal, watermark: Watermark },
}

impl CycleOutcome {
    pub fn watermark(&self) -> Watermark {
        match self {
            CycleOutcome::Quiet { watermark }
            | CycleOutcome::Notify { watermark, .. }
            | CycleOutcome::Report { watermark, .. } => *watermark,
        }
    }

    pub fn signal(&self) -> Option<&Signal> {
        match self {
            CycleOutcome::Quiet { .. } => None,
            CycleOutcome::Notify { signal, .. } | CycleOutcome::Report { signal, .. } => {
                Some(signal)
            }
        }
    }
}

/// Run one detection cycle: fetch each enabled category, classify its items
/// against the watermark, and coalesce every change into a single signal.
///
/// Error policy: connectivity failures are suppressed (logged, the category
/// contributes nothing, later categories still run). Any other fetch failure
/// aborts the rest of the cycle and reports. Changes already found in earlier
/// categories are discarded with it, so a half-scanned window is never marked
/// as notified.
pub async fn run_cycle(
    fetcher: &dyn CategoryFetcher,
    cfg: &AppletConfig,
    watermark: Watermark,
    now: DateTime<Utc>,
) -> CycleOutcome {
    let mut draft = SignalDraft::new(&cfg.subdomain);

    for category in cfg.enabled_categories() {
        let items = match fetcher.fetch(category).await {
            Ok(items) => items,
            Err(err) if err.is_connectivity() => {
                tracing::warn!(?category, error = %err, "fetch suppressed as transient");
                continue;
            }
            Err(err) => {
                tracing::error!(?category, error = %err, "fetch failed, reporting");
                let signal =
                    Signal::error(vec![ERROR_HINT.to_string(), format!("Detail: {err}")]);
                return CycleOutcome::Report { signal, watermark };
            }
        };

        if items.is_empty() {
            tracing::info!(?category, "empty collection");
            continue;
        }

        let spec = category.spec();
        for value in &items {
            let Some(item) = spec.parse_item(value) else {
                tracing::debug!(?category, "item missing required fields, skipped");
                continue;
            };
            match classify(&item, watermark) {
                Classification::Skip => {}
                Classification::Changed(kind) => {
                    tracing::info!(?category, ?kind, label = %item.label, "change detected");
                    draft.push(&ChangeEvent {
                        category,
                        kind,
                        item,
                    });
                }
            }
        }
    }

    match draft.finish(&cfg.color, &cfg.effect) {
        Some(signal) => CycleOutcome::Notify {
            signal,
            watermark: watermark.advanced_to(now),
        },
        None => CycleOutcome::Quiet { watermark },
    }
}
