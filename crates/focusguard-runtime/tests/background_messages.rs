//! Background context: install defaults and runtime message handling.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::Arc;

use serde_json::json;

use focusguard_core::state::StorageRecord;
use focusguard_runtime::background::Background;
use focusguard_runtime::messaging::Incoming;
use focusguard_runtime::store::StateStore;

use common::{runtime, wait_until, RecordingTabs};

#[tokio::test]
async fn install_keeps_existing_state() {
    let rt = runtime();
    let mut rec = StorageRecord::new();
    rec.insert("allowedDomains".into(), json!(["example.org"]));
    rec.insert("isBlocking".into(), json!(true));
    rt.store().set(rec).await.unwrap();

    let bg = Background::new(rt.store(), Arc::new(RecordingTabs::default()), rt.metrics());
    assert!(!bg.on_installed().await.unwrap());

    let state = rt.settings().state().await.unwrap();
    assert_eq!(state.allowed_domains, vec!["example.org"]);
    assert!(state.is_blocking);
}

#[tokio::test]
async fn install_repairs_only_malformed_fields() {
    let rt = runtime();
    let mut rec = StorageRecord::new();
    rec.insert("allowedDomains".into(), json!(["example.org"]));
    rec.insert("isBlocking".into(), json!("yes"));
    rt.store().set(rec).await.unwrap();

    let bg = Background::new(rt.store(), Arc::new(RecordingTabs::default()), rt.metrics());
    assert!(bg.on_installed().await.unwrap());

    let raw = rt.store().get(&["allowedDomains", "isBlocking"]).await.unwrap();
    assert_eq!(raw.get("allowedDomains"), Some(&json!(["example.org"])));
    assert_eq!(raw.get("isBlocking"), Some(&json!(false)));
}

#[tokio::test]
async fn unknown_action_is_rejected() {
    let rt = runtime();
    let tabs = Arc::new(RecordingTabs::default());
    let bg = Background::new(rt.store(), tabs.clone(), rt.metrics());

    let err = bg
        .handle_message(&Incoming { sender: 9, raw: r#"{"action":"reloadTab"}"#.into() })
        .await
        .expect_err("unknown action");
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
    assert!(tabs.closed().is_empty());

    bg.handle_message(&Incoming { sender: 9, raw: r#"{"action":"closeTab"}"#.into() })
        .await
        .unwrap();
    assert_eq!(tabs.closed(), vec![9]);
}

#[tokio::test]
async fn bus_survives_bad_messages() {
    let rt = runtime();
    let tabs = Arc::new(RecordingTabs::default());
    let _bg = rt.start_background(tabs.clone()).await.unwrap();

    let bus = rt.bus();
    bus.post_raw(5, "garbage".into()).await.unwrap();
    bus.post_raw(6, r#"{"action":"closeTab"}"#.into()).await.unwrap();

    assert!(wait_until(|| tabs.closed() == vec![6]).await);
}

#[tokio::test]
async fn background_starts_once() {
    let rt = runtime();
    let _bg = rt.start_background(Arc::new(RecordingTabs::default())).await.unwrap();
    let err = rt
        .start_background(Arc::new(RecordingTabs::default()))
        .await
        .expect_err("second start");
    assert_eq!(err.code().as_str(), "INTERNAL");
}
