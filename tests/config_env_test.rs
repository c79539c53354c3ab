//! Environment-driven configuration tests.
//!
//! These mutate process environment variables, so they run serially.

use std::time::Duration;

use panel_state::state::SettlePolicy;
use panel_state::StateConfig;
use serial_test::serial;

const VARS: &[&str] = &[
    "PANEL_STATE_API_URL",
    "PANEL_STATE_API_TOKEN",
    "PANEL_STATE_STORE_PATH",
    "PANEL_STATE_DEBOUNCE_MS",
    "PANEL_STATE_MODAL_GRACE_MS",
    "PANEL_STATE_PAGE_SIZE",
    "PANEL_STATE_SETTLE_POLICY",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();
    assert_eq!(StateConfig::from_env(), StateConfig::default());
}

#[test]
#[serial]
fn test_from_env_reads_all_settings() {
    clear_env();
    std::env::set_var("PANEL_STATE_API_URL", "https://admin.example.test/api");
    std::env::set_var("PANEL_STATE_API_TOKEN", "secret");
    std::env::set_var("PANEL_STATE_STORE_PATH", "/tmp/panel-state.json");
    std::env::set_var("PANEL_STATE_DEBOUNCE_MS", "300");
    std::env::set_var("PANEL_STATE_MODAL_GRACE_MS", "0");
    std::env::set_var("PANEL_STATE_PAGE_SIZE", "50");
    std::env::set_var("PANEL_STATE_SETTLE_POLICY", "latest-issued");

    let config = StateConfig::from_env();
    clear_env();

    assert_eq!(config.api_url, "https://admin.example.test/api");
    assert_eq!(config.api_token.as_deref(), Some("secret"));
    assert_eq!(config.store_path.as_deref(), Some(std::path::Path::new("/tmp/panel-state.json")));
    assert_eq!(config.debounce_delay, Duration::from_millis(300));
    assert_eq!(config.modal_grace, Duration::ZERO);
    assert_eq!(config.page_size, 50);
    assert_eq!(config.settle_policy, SettlePolicy::LatestIssued);
}

#[test]
#[serial]
fn test_from_env_ignores_invalid_values() {
    clear_env();
    std::env::set_var("PANEL_STATE_API_TOKEN", "");
    std::env::set_var("PANEL_STATE_DEBOUNCE_MS", "soon");
    std::env::set_var("PANEL_STATE_PAGE_SIZE", "0");
    std::env::set_var("PANEL_STATE_SETTLE_POLICY", "newest");

    let config = StateConfig::from_env();
    clear_env();

    assert_eq!(config.api_token, None);
    assert_eq!(config.debounce_delay, Duration::from_millis(500));
    assert_eq!(config.page_size, 1);
    assert_eq!(config.settle_policy, SettlePolicy::LastSettled);
}
