use super::*;

/// # Safety
/// Env-var tests share process globals; keep them in one test to avoid races.
unsafe fn clear_autonet_env() {
    unsafe {
        std::env::remove_var("AUTONET_API_URL");
        std::env::remove_var("AUTONET_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("AUTONET_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("AUTONET_POLL_INTERVAL_SECS");
    }
}

// =============================================================================
// from_env
// =============================================================================

#[test]
fn from_env_defaults_then_overrides() {
    unsafe { clear_autonet_env() };

    let cfg = ClientConfig::from_env();
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.timeouts, Timeouts::default());
    assert_eq!(cfg.poll_interval, Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS));

    unsafe {
        std::env::set_var("AUTONET_API_URL", "https://fleet.example.test/api/");
        std::env::set_var("AUTONET_REQUEST_TIMEOUT_SECS", "60");
        std::env::set_var("AUTONET_CONNECT_TIMEOUT_SECS", "not-a-number");
        std::env::set_var("AUTONET_POLL_INTERVAL_SECS", "0");
    }

    let cfg = ClientConfig::from_env();
    assert_eq!(cfg.api_url, "https://fleet.example.test/api");
    assert_eq!(cfg.timeouts.request_secs, 60);
    assert_eq!(cfg.timeouts.connect_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
    assert_eq!(cfg.poll_interval, Duration::from_secs(1));

    unsafe { std::env::set_var("AUTONET_API_URL", "   ") };
    assert_eq!(ClientConfig::from_env().api_url, DEFAULT_API_URL);

    unsafe { clear_autonet_env() };
}

// =============================================================================
// endpoints
// =============================================================================

#[test]
fn api_endpoint_joins_path() {
    let cfg = ClientConfig::new("http://localhost:8000/api/");
    assert_eq!(cfg.api_endpoint("/login"), "http://localhost:8000/api/login");
}

#[test]
fn backend_host_strips_api_suffix() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.backend_host(), "http://localhost:8000");
    assert_eq!(cfg.host_endpoint("/auth/google"), "http://localhost:8000/auth/google");
}

#[test]
fn backend_host_without_api_suffix_is_unchanged() {
    let cfg = ClientConfig::new("http://127.0.0.1:9000");
    assert_eq!(cfg.backend_host(), "http://127.0.0.1:9000");
}
