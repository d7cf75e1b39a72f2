// Guard service integration tests
// End-to-end flows across the cache, bypass ledger, user lists and counters

mod common;

use std::time::Duration;

use common::short_lived_service;
use phishguard_core::{GuardCommand, GuardReply, PageSignals, ThreatLevel};

#[tokio::test]
async fn test_cache_serves_repeat_analyses() {
    let service = short_lived_service();

    let first = service
        .analyze_url("https://repeat.example.com/", None, false)
        .await;
    let second = service
        .analyze_url("https://repeat.example.com/", None, false)
        .await;

    assert_eq!(
        first.analyzed_at, second.analyzed_at,
        "second call should be served from the cache"
    );
    assert_eq!(
        service.stats().await.sites_scanned,
        1,
        "cache hits are not new scans"
    );
}

#[tokio::test]
async fn test_cache_expires_after_ttl() {
    let service = short_lived_service();

    service
        .analyze_url("https://short-lived.example.com/", None, false)
        .await;
    tokio::time::sleep(Duration::from_millis(60)).await;
    service
        .analyze_url("https://short-lived.example.com/", None, false)
        .await;

    assert_eq!(
        service.stats().await.sites_scanned,
        2,
        "an expired entry forces a fresh scan"
    );
}

#[tokio::test]
async fn test_forced_analysis_recomputes() {
    let service = short_lived_service();

    service
        .analyze_url("https://forced.example.com/", None, false)
        .await;
    service
        .analyze_url("https://forced.example.com/", None, true)
        .await;

    assert_eq!(service.stats().await.sites_scanned, 2);
}

#[tokio::test]
async fn test_page_signal_reports_are_not_cached() {
    let service = short_lived_service();
    let signals = PageSignals {
        external_form_count: 1,
        has_password_field: false,
    };

    service
        .analyze_url("https://with-signals.example.com/", Some(&signals), false)
        .await;

    assert_eq!(
        service.cache_size().await,
        0,
        "reports built from page observations are not a function of the URL alone"
    );
}

#[tokio::test]
async fn test_error_reports_are_not_cached() {
    let service = short_lived_service();

    let report = service.analyze_url("not a url", None, false).await;

    assert!(report.is_error());
    assert_eq!(report.score, 0);
    assert_eq!(service.cache_size().await, 0);
}

#[tokio::test]
async fn test_bypass_short_circuits_until_expiry() {
    let service = short_lived_service();
    service.grant_bypass("https://risky.tk/login").await;

    let bypassed = service
        .analyze_url("https://risky.tk/login", None, false)
        .await;
    assert!(bypassed.bypassed);
    assert_eq!(bypassed.score, 0);
    assert!(!service.should_block(&bypassed));

    let forced = service
        .analyze_url("https://risky.tk/login", None, true)
        .await;
    assert!(!forced.bypassed);
    assert!(
        forced.score > 0,
        "forced analysis should surface the real score"
    );

    tokio::time::sleep(Duration::from_millis(60)).await;
    let after_expiry = service
        .analyze_url("https://risky.tk/login", None, false)
        .await;
    assert!(!after_expiry.bypassed, "bypass should expire");
}

#[tokio::test]
async fn test_blacklist_invalidates_cached_reports() {
    let service = short_lived_service();

    let before = service
        .analyze_url("https://innocent-site.com/", None, false)
        .await;
    assert!(before.score < 50);

    service.add_to_blacklist("innocent-site.com").await;

    let after = service
        .analyze_url("https://innocent-site.com/", None, false)
        .await;
    assert_eq!(
        after.score, 100,
        "a score computed before the mutation must not be served after it"
    );
    assert!(after.blacklisted);
    assert_eq!(after.threat_level(), ThreatLevel::Critical);
}

#[tokio::test]
async fn test_whitelist_overrides_heuristics() {
    let service = short_lived_service();

    let before = service.analyze_url("http://login-verify.tk/", None, false).await;
    assert!(before.score >= 50);

    service.add_to_whitelist("login-verify.tk").await;

    let after = service.analyze_url("http://login-verify.tk/", None, false).await;
    assert_eq!(after.score, 0);
    assert!(after.whitelisted);
}

#[tokio::test]
async fn test_list_removal_restores_scoring() {
    let service = short_lived_service();
    service.add_to_whitelist("login-verify.tk").await;

    let while_listed = service
        .analyze_url("http://login-verify.tk/", None, false)
        .await;
    assert_eq!(while_listed.score, 0);

    service.remove_from_whitelist("login-verify.tk").await;

    let after_removal = service
        .analyze_url("http://login-verify.tk/", None, false)
        .await;
    assert!(
        after_removal.score >= 50,
        "removal must drop the cached whitelisted report"
    );
}

#[tokio::test]
async fn test_list_mutation_revokes_matching_bypasses() {
    let service = short_lived_service();

    service.grant_bypass("https://evil.tk/a").await;
    service.grant_bypass("https://unrelated.com/b").await;
    assert_eq!(service.bypass_count().await, 2);

    service.add_to_blacklist("evil.tk").await;
    assert_eq!(
        service.bypass_count().await,
        1,
        "bypasses for the mutated domain are revoked"
    );

    let report = service.analyze_url("https://evil.tk/a", None, false).await;
    assert_eq!(report.score, 100);
}

#[tokio::test]
async fn test_execute_analyze_url_from_wire_json() {
    let service = short_lived_service();
    let command: GuardCommand =
        serde_json::from_str(r#"{"action":"analyzeUrl","url":"http://login.paypa1.com/"}"#)
            .unwrap();

    match service.execute(command).await {
        GuardReply::Report(report) => {
            assert!(report.score >= 50);
            assert!(report
                .signals
                .iter()
                .any(|s| s.reason.contains("Impersonates")));
        },
        other => panic!("unexpected reply: {:?}", other),
    }
}

#[tokio::test]
async fn test_execute_bypass_then_stats() {
    let service = short_lived_service();

    let grant: GuardCommand =
        serde_json::from_str(r#"{"action":"setTemporaryBypass","url":"https://warned.tk/"}"#)
            .unwrap();
    assert!(matches!(
        service.execute(grant).await,
        GuardReply::Acknowledged
    ));

    let report = service.analyze_url("https://warned.tk/", None, false).await;
    assert!(report.bypassed);

    match service.execute(GuardCommand::GetStats).await {
        GuardReply::Stats(stats) => {
            assert_eq!(stats.bypasses_used, 1);
            assert_eq!(
                stats.sites_scanned, 0,
                "bypassed analyses are not counted as scans"
            );
        },
        other => panic!("unexpected reply: {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_analyses_share_one_service() {
    let service = short_lived_service();

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .analyze_url(&format!("https://site-{}.example.com/", i), None, false)
                .await
        }));
    }
    for handle in handles {
        let report = handle.await.unwrap();
        assert!(!report.is_error());
    }

    assert_eq!(service.stats().await.sites_scanned, 8);
    assert_eq!(service.cache_size().await, 8);
}
