//! Demo that drives two detection cycles over fixture responses and prints
//! the emitted signals (no live API, no device).

use chrono::{TimeZone, Utc};
use teamwork_pulse::{run_cycle, AppletConfig, Category, CycleOutcome, SignalSink, StaticFetcher, StdoutSink, Watermark};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let fetcher = StaticFetcher::new()
        .with_body(Category::Projects, include_str!("../../tests/fixtures/projects.json"))?
        .with_body(Category::Posts, include_str!("../../tests/fixtures/posts.json"))?;

    let mut cfg = AppletConfig {
        subdomain: "acme".into(),
        api_key: "demo".into(),
        ..AppletConfig::default()
    };
    cfg.categories.projects = true;
    cfg.categories.posts = true;

    let sink = StdoutSink;

    // First cycle: watermark predates the fixture activity, so every recent
    // item coalesces into one signal.
    let watermark = Watermark::new(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
    let outcome = run_cycle(&fetcher, &cfg, watermark, now).await;
    if let Some(signal) = outcome.signal() {
        sink.send(signal).await?;
    }

    // Second cycle: the advanced watermark covers the fixtures, nothing fires.
    let outcome = run_cycle(&fetcher, &cfg, outcome.watermark(), now).await;
    match outcome {
        CycleOutcome::Quiet { .. } => println!("second cycle quiet, as expected"),
        other => println!("unexpected second-cycle outcome: {other:?}"),
    }

    println!("signal-demo done");
    Ok(())
}
