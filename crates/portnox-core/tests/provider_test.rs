#![allow(clippy::unwrap_used)]
// Integration tests for resource operations against a wiremock server.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{any, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portnox_api::{PortnoxClient, RetryPolicy, TransportConfig};
use portnox_core::{
    AccountConfig, AddressConfig, AddressesConfig, AddressesState, CoreError, ImportId, MacEntry,
    Provider, ReadOutcome, Severity,
};

// ── Helpers ─────────────────────────────────────────────────────────

const BASE: &str = "/CloudPortalBackEnd/api/mac-based-accounts";

async fn setup() -> (MockServer, Provider) {
    let server = MockServer::start().await;
    let key: SecretString = "test-key".to_string().into();
    let client = PortnoxClient::from_api_key(
        &format!("{}/CloudPortalBackEnd", server.uri()),
        &key,
        &TransportConfig::default(),
        RetryPolicy::new(3, Duration::ZERO).with_max_jitter(Duration::ZERO),
    )
    .unwrap();
    (server, Provider::from_client(client))
}

fn entry(mac: &str, description: &str) -> MacEntry {
    MacEntry::new(mac, description, None)
}

fn state(account: &str, entries: Vec<MacEntry>) -> AddressesState {
    AddressesState {
        id: account.into(),
        account_name: account.into(),
        mac_addresses: entries,
    }
}

fn declared(account: &str, entries: Vec<MacEntry>) -> AddressesConfig {
    AddressesConfig {
        account_name: account.into(),
        mac_addresses: entries,
    }
}

fn ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({}))
}

// ── Reconciliation ──────────────────────────────────────────────────

#[tokio::test]
async fn test_update_removes_dropped_key_then_adds_batch() {
    let (server, provider) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{BASE}/mac-whitelist-remove")))
        .and(body_json(json!({
            "AccountName": "lobby",
            "MacWhiteList": [{ "Mac": "AA:BB:CC:DD:EE:03" }]
        })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{BASE}/mac-whitelist-add")))
        .and(body_json(json!({
            "AccountName": "lobby",
            "MacWhiteList": [
                { "Mac": "AA:BB:CC:DD:EE:01", "Description": "foo" },
                { "Mac": "AA:BB:CC:DD:EE:02", "Description": "bar" }
            ]
        })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let previous = state(
        "lobby",
        vec![entry("AA:BB:CC:DD:EE:01", "foo"), entry("AA:BB:CC:DD:EE:03", "baz")],
    );
    let config = declared(
        "lobby",
        vec![entry("AA:BB:CC:DD:EE:01", "foo"), entry("AA:BB:CC:DD:EE:02", "bar")],
    );

    let next = provider.update_addresses(&previous, &config).await.unwrap();
    assert_eq!(next.mac_addresses, config.mac_addresses);

    let requests = server.received_requests().await.unwrap();
    let methods: Vec<&str> = requests.iter().map(|r| r.method.as_str()).collect();
    assert_eq!(methods, vec!["DELETE", "POST"]);
}

#[tokio::test]
async fn test_unchanged_update_issues_no_calls() {
    let (server, provider) = setup().await;

    Mock::given(any()).respond_with(ok()).expect(0).mount(&server).await;

    let entries = vec![entry("AA:BB:CC:DD:EE:01", "foo"), entry("AA:BB:CC:DD:EE:02", "bar")];
    let previous = state("lobby", entries.clone());
    let config = declared("lobby", entries.into_iter().rev().collect());

    let next = provider.update_addresses(&previous, &config).await.unwrap();
    assert_eq!(next.mac_addresses, config.mac_addresses);
}

#[tokio::test]
async fn test_changed_description_removes_old_values_first() {
    let (server, provider) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{BASE}/mac-whitelist-remove")))
        .and(body_json(json!({
            "AccountName": "lobby",
            "MacWhiteList": [{
                "Mac": "AA:BB:CC:DD:EE:01",
                "Description": "old",
                "Expiration": "2030-01-01T00:00:00Z"
            }]
        })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{BASE}/mac-whitelist-add")))
        .and(body_json(json!({
            "AccountName": "lobby",
            "MacWhiteList": [{ "Mac": "AA:BB:CC:DD:EE:01", "Description": "new" }]
        })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let previous = state(
        "lobby",
        vec![MacEntry::new(
            "AA:BB:CC:DD:EE:01",
            "old",
            Some("2030-01-01T00:00:00Z".into()),
        )],
    );
    let config = declared("lobby", vec![entry("AA:BB:CC:DD:EE:01", "new")]);

    provider.update_addresses(&previous, &config).await.unwrap();
}

#[tokio::test]
async fn test_update_rejects_account_rename() {
    let (server, provider) = setup().await;
    Mock::given(any()).respond_with(ok()).expect(0).mount(&server).await;

    let result = provider
        .update_addresses(&state("lobby", vec![]), &declared("office", vec![]))
        .await;
    assert!(matches!(result, Err(CoreError::Validation { .. })));
}

#[tokio::test]
async fn test_invalid_mac_fails_before_any_call() {
    let (server, provider) = setup().await;
    Mock::given(any()).respond_with(ok()).expect(0).mount(&server).await;

    let result = provider
        .create_addresses(&declared("lobby", vec![entry("not-a-mac", "tv")]))
        .await;
    assert!(matches!(result, Err(CoreError::Validation { .. })));
}

#[tokio::test]
async fn test_create_keeps_declared_order() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path(format!("{BASE}/mac-whitelist-add")))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let config = declared(
        "lobby",
        vec![entry("AA:BB:CC:DD:EE:09", "z"), entry("AA:BB:CC:DD:EE:01", "a")],
    );
    let created = provider.create_addresses(&config).await.unwrap();

    assert_eq!(created.id, "lobby");
    assert_eq!(created.mac_addresses, config.mac_addresses);
}

#[tokio::test]
async fn test_delete_removes_each_entry_by_mac() {
    let (server, provider) = setup().await;

    for mac in ["AA:BB:CC:DD:EE:01", "AA:BB:CC:DD:EE:02"] {
        Mock::given(method("DELETE"))
            .and(path(format!("{BASE}/mac-whitelist-remove")))
            .and(body_json(json!({
                "AccountName": "lobby",
                "MacWhiteList": [{ "Mac": mac }]
            })))
            .respond_with(ok())
            .expect(1)
            .mount(&server)
            .await;
    }

    let tracked = state(
        "lobby",
        vec![entry("AA:BB:CC:DD:EE:01", "a"), entry("AA:BB:CC:DD:EE:02", "b")],
    );
    provider.delete_addresses(&tracked).await.unwrap();
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_read_restores_declared_order() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path(format!("{BASE}/search")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Accounts": [{
                "AccountName": "lobby",
                "AgentlessOptions": {
                    "MacWhiteList": { "_items": [
                        { "Mac": "AA:BB:CC:DD:EE:FF", "Description": "untracked" },
                        { "Mac": "AA:BB:CC:DD:EE:02", "Description": "b" },
                        { "Mac": "AA:BB:CC:DD:EE:01", "Description": "a" }
                    ]}
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entries = vec![entry("AA:BB:CC:DD:EE:01", "a"), entry("AA:BB:CC:DD:EE:02", "b")];
    let tracked = state("lobby", entries.clone());
    let config = declared("lobby", entries.clone());

    let refreshed = provider.read_addresses(&tracked, Some(&config)).await.unwrap();
    assert_eq!(refreshed.mac_addresses, entries);
}

#[tokio::test]
async fn test_read_with_empty_search_is_an_error() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path(format!("{BASE}/search")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Accounts": [] })))
        .mount(&server)
        .await;

    let result = provider.read_addresses(&state("lobby", vec![]), None).await;
    assert!(matches!(result, Err(CoreError::NoAccountInSearch { ref name }) if name == "lobby"));
}

#[tokio::test]
async fn test_account_read_not_found_clears_identity() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/lobby")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "InternalErrorCode": 5357,
            "InternalError": "Account not found"
        })))
        .mount(&server)
        .await;

    let outcome = provider
        .read_account("lobby", &AccountConfig::default())
        .await
        .unwrap();

    match outcome {
        ReadOutcome::Gone(diagnostic) => {
            assert_eq!(diagnostic.severity, Severity::Warning);
            assert_eq!(diagnostic.summary, "Resource not found");
        }
        ReadOutcome::Found(state) => panic!("expected Gone, got {state:?}"),
    }
}

#[tokio::test]
async fn test_account_read_reports_whitelist_only_when_declared() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/lobby")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "AccountId": "acc-1",
            "AccountName": "lobby",
            "AgentlessOptions": {
                "MacWhiteList": [
                    { "Mac": "AA:BB:CC:DD:EE:02", "Description": "b" },
                    { "Mac": "AA:BB:CC:DD:EE:01", "Description": "a" }
                ]
            }
        })))
        .mount(&server)
        .await;

    let without = provider
        .read_account("lobby", &AccountConfig::default())
        .await
        .unwrap()
        .found()
        .unwrap();
    assert!(without.account.mac_whitelist.is_empty());
    assert_eq!(without.account.account_id.as_deref(), Some("acc-1"));

    let config = AccountConfig {
        account_name: "lobby".into(),
        mac_whitelist: Some(vec![entry("AA:BB:CC:DD:EE:01", "a"), entry("AA:BB:CC:DD:EE:02", "b")]),
        ..AccountConfig::default()
    };
    let with = provider
        .read_account("lobby", &config)
        .await
        .unwrap()
        .found()
        .unwrap();
    assert_eq!(Some(with.account.mac_whitelist), config.mac_whitelist);
}

#[tokio::test]
async fn test_account_read_empty_declared_whitelist_reports_none() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/lobby")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "AccountName": "lobby",
            "AgentlessOptions": {
                "MacWhiteList": [{ "Mac": "AA:BB:CC:DD:EE:01", "Description": "a" }]
            }
        })))
        .mount(&server)
        .await;

    let config = AccountConfig {
        account_name: "lobby".into(),
        mac_whitelist: Some(vec![]),
        ..AccountConfig::default()
    };
    let found = provider
        .read_account("lobby", &config)
        .await
        .unwrap()
        .found()
        .unwrap();
    assert!(found.account.mac_whitelist.is_empty());
}

#[tokio::test]
async fn test_account_read_rejects_array_body() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/lobby")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["x", "y"])))
        .mount(&server)
        .await;

    let result = provider.read_account("lobby", &AccountConfig::default()).await;
    assert!(matches!(result, Err(CoreError::Decode { .. })), "{result:?}");

    let result = provider.read_account_data("lobby").await;
    assert!(matches!(result, Err(CoreError::Decode { .. })), "{result:?}");
}

#[tokio::test]
async fn test_account_data_source_fields() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/lobby")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "AccountName": "lobby",
            "BlockReason": "",
            "IdentityType": 3,
            "IsBlockByAdmin": true,
            "OrgId": "org-9",
            "AgentlessOptions": {
                "VendorsWhiteList": [{ "VendorName": "Acme", "VendorPrefixes": ["00:11:22", 5] }],
                "SecureMabOptions": { "Action": 1, "Enabled": true }
            }
        })))
        .mount(&server)
        .await;

    let account = provider.read_account_data("lobby").await.unwrap();

    assert_eq!(account.identity_type, Some(3));
    assert_eq!(account.is_block_by_admin, Some(true));
    assert_eq!(account.org_id.as_deref(), Some("org-9"));
    assert_eq!(account.last_updated_by, "");
    assert_eq!(account.vendors_whitelist[0].vendor_prefixes, vec!["00:11:22".to_owned()]);
    assert_eq!(account.secure_mab_options["action"], "1");
    assert_eq!(account.secure_mab_options["enabled"], "true");
}

#[tokio::test]
async fn test_account_data_source_missing_account_is_fatal() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/ghost")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = provider.read_account_data("ghost").await;
    assert!(matches!(result, Err(CoreError::AccountNotFound { .. })));
}

// ── Account and single address ──────────────────────────────────────

#[tokio::test]
async fn test_create_account_with_inline_whitelist() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path(BASE))
        .and(body_json(json!({
            "MacBasedAccounts": [{ "AccountName": "lobby" }],
            "MacWhiteList": [{ "Mac": "AA:BB:CC:DD:EE:01", "Description": "tv" }]
        })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let config = AccountConfig {
        account_name: "lobby".into(),
        mac_whitelist: Some(vec![entry("AA:BB:CC:DD:EE:01", "tv")]),
        ..AccountConfig::default()
    };
    let created = provider.create_account(&config).await.unwrap();
    assert_eq!(created.id, "lobby");
}

#[tokio::test]
async fn test_single_address_lifecycle() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path(format!("{BASE}/mac-whitelist-add")))
        .and(body_json(json!({
            "AccountName": "lobby",
            "MacWhiteList": [{
                "Mac": "AA:BB:CC:DD:EE:01",
                "Description": "tv",
                "Expiration": "2030-01-01T00:00:00Z"
            }]
        })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("{BASE}/mac-whitelist-remove")))
        .and(body_json(json!({
            "AccountName": "lobby",
            "MacWhiteList": [{
                "Mac": "AA:BB:CC:DD:EE:01",
                "Description": "tv",
                "Expiration": "2030-01-01T00:00:00Z"
            }]
        })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let config = AddressConfig {
        account_name: "lobby".into(),
        entry: MacEntry::new("AA:BB:CC:DD:EE:01", "tv", Some("2030-01-01T00:00:00Z".into())),
    };
    let created = provider.create_address(&config).await.unwrap();
    assert_eq!(created.id, "lobby:AA:BB:CC:DD:EE:01");

    provider.delete_address(&created).await.unwrap();
}

// ── Import ──────────────────────────────────────────────────────────

async fn mount_account_with_entries(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("{BASE}/lobby")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "AccountName": "lobby",
            "AgentlessOptions": {
                "MacWhiteList": [
                    { "Mac": "AA:BB:CC:DD:EE:03", "Description": "c", "Expiration": "" },
                    null,
                    { "Mac": "AA:BB:CC:DD:EE:01", "Description": null }
                ]
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_import_sorts_by_mac() {
    let (server, provider) = setup().await;
    mount_account_with_entries(&server).await;

    let imported = provider
        .import_addresses(&"lobby".parse::<ImportId>().unwrap())
        .await
        .unwrap();

    assert_eq!(
        imported.mac_addresses,
        vec![entry("AA:BB:CC:DD:EE:01", ""), entry("AA:BB:CC:DD:EE:03", "c")]
    );
}

#[tokio::test]
async fn test_import_with_filter() {
    let (server, provider) = setup().await;
    mount_account_with_entries(&server).await;

    let id: ImportId = "lobby,AA:BB:CC:DD:EE:03".parse().unwrap();
    let imported = provider.import_addresses(&id).await.unwrap();
    assert_eq!(imported.mac_addresses, vec![entry("AA:BB:CC:DD:EE:03", "c")]);

    let id: ImportId = "lobby,AA:BB:CC:DD:EE:77".parse().unwrap();
    let result = provider.import_addresses(&id).await;
    assert!(matches!(result, Err(CoreError::ImportFilterUnmatched { .. })));
}

#[tokio::test]
async fn test_import_requires_agentless_options() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/bare")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "AccountName": "bare" })))
        .mount(&server)
        .await;

    let result = provider
        .import_addresses(&"bare".parse::<ImportId>().unwrap())
        .await;
    assert!(matches!(result, Err(CoreError::MissingAgentlessOptions { .. })));
}
