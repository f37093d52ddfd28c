//! Shared helpers for navigation integration tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use waymark_navigation::{Navigation, RequestState};
use waymark_test_utils::{TestGate, test_services};

pub use waymark_test_utils::{TestEntity, sample_items, test_entity, test_registry, test_routes};

/// Parse `items` as the `main` navigation for an anonymous visitor.
pub fn navigation(items: Vec<Value>) -> Navigation {
    navigation_for(items, TestGate::anonymous())
}

pub fn navigation_for(items: Vec<Value>, gate: TestGate) -> Navigation {
    Navigation::new(
        "main",
        items,
        test_services(gate, Arc::new(RequestState::new())),
    )
    .unwrap()
}

/// Fresh directory under the system temp dir, unique per test.
pub fn temp_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("waymark-{}-{test}", std::process::id()));
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
