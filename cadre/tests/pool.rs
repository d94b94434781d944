//! Connection pool lifecycle, credential retention, and introspection.

use cadre::prelude::*;
use cadre::testing::ScriptedConnector;
use serde_json::json;

fn mail_profile() -> ServerProfile {
    ServerProfile::new("mail.example.com", 993, true)
}

fn pool() -> (ConnectionPool<ScriptedConnector>, ScriptedConnector, DiagnosticLog) {
    let connector = ScriptedConnector::new();
    let diagnostics = DiagnosticLog::new();
    let pool = ConnectionPool::new(connector.clone(), diagnostics.clone());
    (pool, connector, diagnostics)
}

#[tokio::test]
async fn connect_on_unknown_id_fails_and_creates_nothing() {
    let (mut pool, connector, _) = pool();
    let err = pool.connect("ghost", ConnectOptions::new()).await.unwrap_err();
    assert!(matches!(err, PoolError::UnknownConnection(_)));
    assert!(!pool.contains("ghost"));
    assert_eq!(connector.attempts(), 0);
}

#[tokio::test]
async fn connect_without_any_credentials_fails_without_an_attempt() {
    let (mut pool, connector, diagnostics) = pool();
    pool.add(mail_profile(), Some("acct1"));

    let err = pool.connect("acct1", ConnectOptions::new()).await.unwrap_err();
    assert!(matches!(err, PoolError::CredentialsMissing(_)));
    assert_eq!(connector.attempts(), 0);
    assert!(!pool.is_connected("acct1"));
    assert_eq!(diagnostics.len(), 1);
}

#[tokio::test]
async fn retained_credentials_are_reused_after_cleanup() {
    let (mut pool, connector, _) = pool();
    pool.add(mail_profile(), Some("acct1"));

    // Scenario: explicit credentials with retention, then reconnect bare.
    pool.connect(
        "acct1",
        ConnectOptions::new().user("u").password("p").retain(),
    )
    .await
    .unwrap();
    assert!(pool.is_connected("acct1"));
    assert_eq!(connector.attempts(), 1);

    pool.cleanup("acct1").await;
    assert!(!pool.is_connected("acct1"));
    assert_eq!(connector.closes(), 1);

    pool.connect("acct1", ConnectOptions::new()).await.unwrap();
    assert!(pool.is_connected("acct1"));
    assert_eq!(connector.attempts(), 2);
    assert_eq!(connector.records()[1].credentials, Credentials::new("u", "p"));
}

#[tokio::test]
async fn live_handle_is_reused_without_a_new_attempt() {
    let (mut pool, connector, _) = pool();
    pool.add(mail_profile(), Some("acct1"));
    pool.connect("acct1", ConnectOptions::new().user("u").password("p"))
        .await
        .unwrap();

    // No credentials needed while the handle is live.
    pool.connect("acct1", ConnectOptions::new()).await.unwrap();
    pool.connect("acct1", ConnectOptions::new()).await.unwrap();
    assert_eq!(connector.attempts(), 1);
}

#[tokio::test]
async fn explicit_credentials_override_retained_per_field() {
    let (mut pool, connector, _) = pool();
    pool.add(mail_profile(), Some("acct1"));
    pool.connect(
        "acct1",
        ConnectOptions::new().user("u1").password("p1").retain(),
    )
    .await
    .unwrap();
    pool.cleanup("acct1").await;

    // Full explicit pair wins outright.
    pool.connect("acct1", ConnectOptions::new().user("u2").password("p2"))
        .await
        .unwrap();
    assert_eq!(connector.records()[1].credentials, Credentials::new("u2", "p2"));
    pool.cleanup("acct1").await;

    // A missing field falls back to the retained value.
    pool.connect("acct1", ConnectOptions::new().user("u3"))
        .await
        .unwrap();
    assert_eq!(connector.records()[2].credentials, Credentials::new("u3", "p1"));
}

#[tokio::test]
async fn failed_connect_stores_nothing() {
    let (mut pool, connector, _) = pool();
    pool.add(mail_profile(), Some("acct1"));
    connector.set_failing(true);

    let err = pool
        .connect(
            "acct1",
            ConnectOptions::new().user("u").password("p").retain(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PoolError::Connect { .. }));
    assert!(!pool.is_connected("acct1"));
    // Retention was requested but must not survive a failure.
    let report = pool.dump("acct1", true).unwrap();
    assert_eq!(report.user, None);
    assert_eq!(report.password, None);

    // Descriptor is intact; a later attempt can still succeed.
    connector.set_failing(false);
    pool.connect("acct1", ConnectOptions::new().user("u").password("p"))
        .await
        .unwrap();
    assert!(pool.is_connected("acct1"));
}

#[tokio::test]
async fn cache_seed_reaches_the_connector() {
    let (mut pool, connector, _) = pool();
    pool.add(mail_profile(), Some("acct1"));
    pool.connect(
        "acct1",
        ConnectOptions::new().user("u").password("p").cache(&b"blob"[..]),
    )
    .await
    .unwrap();
    assert_eq!(connector.records()[0].cache.as_deref(), Some(&b"blob"[..]));
    assert_eq!(connector.records()[0].profile, mail_profile());
}

#[tokio::test]
async fn dump_sanitization() {
    let (mut pool, _, _) = pool();
    pool.add(mail_profile(), Some("acct1"));
    pool.connect(
        "acct1",
        ConnectOptions::new().user("u").password("p").retain(),
    )
    .await
    .unwrap();
    pool.cleanup("acct1").await;

    // Full dump keeps server details and retained credentials after cleanup.
    let full = pool.dump("acct1", true).unwrap();
    assert_eq!(
        serde_json::to_value(&full).unwrap(),
        json!({
            "server": "mail.example.com",
            "port": 993,
            "tls": true,
            "user": "u",
            "password": "p",
        })
    );

    // Sanitized dump never carries credential fields.
    let sanitized = pool.dump("acct1", false).unwrap();
    let rendered = serde_json::to_value(&sanitized).unwrap();
    assert_eq!(
        rendered,
        json!({"server": "mail.example.com", "port": 993, "tls": true})
    );

    assert!(pool.dump("missing", true).is_none());
}

#[tokio::test]
async fn dump_all_covers_every_descriptor() {
    let (mut pool, _, _) = pool();
    pool.add(mail_profile(), Some("acct1"));
    pool.add(ServerProfile::new("mail2.example.com", 143, false), None);

    let reports = pool.dump_all(false);
    assert_eq!(reports.len(), 2);
    assert!(reports.contains_key("acct1"));
    assert!(reports.contains_key("0"));
}

#[tokio::test]
async fn auto_ids_are_sequential() {
    let (mut pool, _, _) = pool();
    assert_eq!(pool.add(mail_profile(), None), "0");
    assert_eq!(pool.add(mail_profile(), None), "1");
    assert_eq!(pool.add(mail_profile(), Some("named")), "named");
    assert_eq!(pool.add(mail_profile(), None), "2");
    assert_eq!(pool.len(), 4);
}

#[tokio::test]
async fn forget_credentials_leaves_the_connection_up() {
    let (mut pool, _, _) = pool();
    pool.add(mail_profile(), Some("acct1"));
    pool.connect(
        "acct1",
        ConnectOptions::new().user("u").password("p").retain(),
    )
    .await
    .unwrap();

    pool.forget_credentials("acct1");
    assert!(pool.is_connected("acct1"));
    let report = pool.dump("acct1", true).unwrap();
    assert_eq!(report.user, None);

    // Absent id is a no-op.
    pool.forget_credentials("missing");
}

#[tokio::test]
async fn cleanup_is_idempotent_and_scoped() {
    let (mut pool, connector, _) = pool();
    pool.add(mail_profile(), Some("a"));
    pool.add(mail_profile(), Some("b"));
    pool.connect("a", ConnectOptions::new().user("u").password("p"))
        .await
        .unwrap();
    pool.connect("b", ConnectOptions::new().user("u").password("p"))
        .await
        .unwrap();

    pool.cleanup("a").await;
    pool.cleanup("a").await;
    assert_eq!(connector.closes(), 1);
    assert!(pool.is_connected("b"));

    pool.cleanup_all().await;
    assert_eq!(connector.closes(), 2);
    assert!(!pool.is_connected("b"));
}

#[tokio::test]
async fn remove_deletes_the_descriptor() {
    let (mut pool, _, _) = pool();
    pool.add(mail_profile(), Some("acct1"));
    pool.remove("acct1").unwrap();
    assert!(!pool.contains("acct1"));
    assert!(matches!(
        pool.remove("acct1"),
        Err(PoolError::UnknownConnection(_))
    ));
}
