// tests/fixture_smoke.rs
use chrono::{TimeZone, Utc};
use teamwork_pulse::{run_cycle, AppletConfig, Category, StaticFetcher, Watermark};

#[tokio::test]
async fn smoke_fixture_bodies_roll_up_into_one_signal() {
    let fetcher = StaticFetcher::new()
        .with_body(
            Category::Projects,
            include_str!("fixtures/projects.json"),
        )
        .unwrap()
        .with_body(Category::Posts, include_str!("fixtures/posts.json"))
        .unwrap();

    let mut cfg = AppletConfig {
        subdomain: "acme".into(),
        api_key: "twp_test".into(),
        ..AppletConfig::default()
    };
    cfg.categories.projects = true;
    cfg.categories.posts = true;

    // Watermark before the fixture activity: the two recent projects and the
    // post fire; the archived 2024 project does not.
    let wm = Watermark::new(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();

    let outcome = run_cycle(&fetcher, &cfg, wm, now).await;
    let signal = outcome.signal().expect("signal emitted");
    let message = signal.message().unwrap();
    assert_eq!(message.matches("<br>").count(), 2);
    assert!(message.contains("New project: Acme Rebrand."));
    assert!(message.contains("Update in Website Refresh project."));
    assert!(message.contains("Update in Kickoff notes post in Acme Rebrand project."));
    assert!(!message.contains("Archived Skunkworks"));
    assert_eq!(outcome.watermark().instant(), now);
}
