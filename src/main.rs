//! Teamwork change watcher — binary entrypoint.
//! Loads the applet configuration, then polls the API forever, pushing one
//! coalesced signal per cycle to the host surface on stdout.

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use teamwork_pulse::watch::scheduler::run_watcher;
use teamwork_pulse::{config, HttpFetcher, StdoutSink};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("teamwork_pulse=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op where the host injects real env vars.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = config::load_default().context("load applet config")?;
    tracing::info!(
        subdomain = %cfg.subdomain,
        interval_secs = cfg.interval_secs,
        categories = ?cfg.enabled_categories(),
        "teamwork watcher starting"
    );

    let fetcher = HttpFetcher::new(&cfg).context("build fetcher")?;
    run_watcher(cfg, fetcher, StdoutSink).await
}
