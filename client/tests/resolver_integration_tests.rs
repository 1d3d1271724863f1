//! Integration tests for the resolution chain using a wiremock server.

use psn_client::backup::BackupCache;
use psn_client::profile::{BackupInfo, BackupRecord, ResolutionOutcome};
use psn_client::resolver::{ProfileResolver, ResolverError};
use psn_client::transport::HttpTransport;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIER_TIMEOUT: Duration = Duration::from_secs(5);

fn resolver(
    server: &MockServer,
    data_dir: &Path,
    session_token: Option<&str>,
) -> ProfileResolver<HttpTransport> {
    let transport = HttpTransport::new(&server.uri(), session_token, TIER_TIMEOUT);
    ProfileResolver::new(transport, BackupCache::new(data_dir), TIER_TIMEOUT)
}

fn seed_backup(data_dir: &Path, wallet: &str) {
    BackupCache::new(data_dir)
        .put(&BackupRecord {
            wallet: wallet.into(),
            info: Some(BackupInfo {
                name: Some("Old Name".into()),
                email: None,
                user_id: None,
            }),
        })
        .unwrap();
}

#[tokio::test]
async fn primary_success_resolves_and_backs_up_wallet() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "wallet": "0xABC",
            "usdt_balance": 10
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = resolver(&mock_server, dir.path(), None);
    let outcome = resolver.resolve().await.unwrap();

    match outcome {
        ResolutionOutcome::Resolved(profile) => {
            assert_eq!(profile.wallet, "0xABC");
            assert_eq!(profile.usdt_balance, 10);
        }
        other => panic!("Expected Resolved, got {other:?}"),
    }

    let record = BackupCache::new(dir.path()).get().unwrap().unwrap();
    assert_eq!(record.wallet, "0xABC");
}

#[tokio::test]
async fn unauthenticated_primary_falls_through_to_session_info() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    seed_backup(dir.path(), "0x111");

    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user/session-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "walletAddress": "0xDEF"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = resolver(&mock_server, dir.path(), None);
    let outcome = resolver.resolve().await.unwrap();

    match outcome {
        ResolutionOutcome::PartiallyResolved(session) => {
            assert_eq!(session.wallet_address, "0xDEF");
        }
        other => panic!("Expected PartiallyResolved, got {other:?}"),
    }

    // The seeded record was overwritten by the session tier
    let record = BackupCache::new(dir.path()).get().unwrap().unwrap();
    assert_eq!(record.wallet, "0xDEF");
}

#[tokio::test]
async fn malformed_primary_payload_falls_through_to_session_info() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user/session-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "walletAddress": "0xDEF"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = resolver(&mock_server, dir.path(), None);
    let outcome = resolver.resolve().await.unwrap();

    assert!(matches!(
        outcome,
        ResolutionOutcome::PartiallyResolved(_)
    ));
}

#[tokio::test]
async fn both_sources_down_recovers_from_backup_with_no_extra_calls() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    seed_backup(dir.path(), "0x111");

    // expect(1) on both mocks: exactly two failing attempts, then the
    // local backup with zero additional network calls.
    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user/session-info"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = resolver(&mock_server, dir.path(), None);
    let outcome = resolver.resolve().await.unwrap();

    match outcome {
        ResolutionOutcome::RecoveredFromBackup(record) => {
            assert_eq!(record.wallet, "0x111");
            assert_eq!(record.info.unwrap().name.as_deref(), Some("Old Name"));
        }
        other => panic!("Expected RecoveredFromBackup, got {other:?}"),
    }
}

#[tokio::test]
async fn both_sources_down_and_empty_backup_is_unauthenticated() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user/session-info"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let resolver = resolver(&mock_server, dir.path(), None);
    let outcome = resolver.resolve().await.unwrap();

    assert_eq!(outcome, ResolutionOutcome::Unauthenticated);
}

#[tokio::test]
async fn corrupted_info_blob_still_recovers_address() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    seed_backup(dir.path(), "0x111");
    std::fs::write(dir.path().join("backup_info.json"), "{ garbage").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user/session-info"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let resolver = resolver(&mock_server, dir.path(), None);
    let outcome = resolver.resolve().await.unwrap();

    match outcome {
        ResolutionOutcome::RecoveredFromBackup(record) => {
            assert_eq!(record.wallet, "0x111");
            assert!(record.info.is_none());
        }
        other => panic!("Expected RecoveredFromBackup, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_primary_times_out_and_advances_to_session_info() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"wallet": "0xABC"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user/session-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "walletAddress": "0xDEF"
        })))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(&mock_server.uri(), None, Duration::from_millis(200));
    let resolver = ProfileResolver::new(
        transport,
        BackupCache::new(dir.path()),
        Duration::from_millis(200),
    );

    let outcome = resolver.resolve().await.unwrap();
    assert!(matches!(
        outcome,
        ResolutionOutcome::PartiallyResolved(_)
    ));
}

#[tokio::test]
async fn concurrent_triggers_share_one_round_trip_sequence() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    // A second chain would violate the expect(1) bound.
    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"wallet": "0xABC"}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = Arc::new(resolver(&mock_server, dir.path(), None));

    let first = tokio::spawn({
        let resolver = resolver.clone();
        async move { resolver.resolve().await }
    });
    let second = tokio::spawn({
        let resolver = resolver.clone();
        async move { resolver.resolve().await }
    });

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();

    assert_eq!(first, second);
    assert!(matches!(first, ResolutionOutcome::Resolved(_)));
}

#[tokio::test]
async fn cancelled_resolution_yields_no_outcome_and_no_backup_write() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"wallet": "0xABC"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let resolver = Arc::new(resolver(&mock_server, dir.path(), None));

    let in_flight = tokio::spawn({
        let resolver = resolver.clone();
        async move { resolver.resolve().await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    resolver.cancel().await;

    let result = in_flight.await.unwrap();
    assert_eq!(result, Err(ResolverError::Cancelled));

    // The late-arriving response must not reach the backup store
    assert!(BackupCache::new(dir.path()).get().unwrap().is_none());
}

#[tokio::test]
async fn session_cookie_is_attached_to_tier_requests() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .and(header("cookie", "session_token=tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "wallet": "0xABC"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = resolver(&mock_server, dir.path(), Some("tok-1"));
    let outcome = resolver.resolve().await.unwrap();

    assert!(matches!(outcome, ResolutionOutcome::Resolved(_)));
}

#[tokio::test]
async fn resolver_can_run_again_after_a_completed_chain() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "wallet": "0xABC"
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let resolver = resolver(&mock_server, dir.path(), None);

    let first = resolver.resolve().await.unwrap();
    let second = resolver.resolve().await.unwrap();

    assert_eq!(first, second);
}
