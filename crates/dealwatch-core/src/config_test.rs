use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn defaults_apply_with_empty_environment() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.deals_path.to_str().unwrap(), "./data/deals.json");
    assert_eq!(cfg.categories_path.to_str().unwrap(), "./config/categories.yaml");
    assert_eq!(cfg.base_url, "https://www.hktvmall.com");
    assert_eq!(
        cfg.search_api_url,
        "https://www.hktvmall.com/hktv/en/ajax/search_products"
    );
    assert_eq!(cfg.page_size, 600);
    assert_eq!(cfg.max_pages, 100);
    assert_eq!(cfg.request_delay_ms, 2000);
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "dealwatch/0.1 (deal-tracker)");
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_secs, 1);
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.replica.is_none());
}

#[test]
fn overrides_apply() {
    let mut map = HashMap::new();
    map.insert("DEALWATCH_PAGE_SIZE", "120");
    map.insert("DEALWATCH_MAX_PAGES", "5");
    map.insert("DEALWATCH_REQUEST_DELAY_MS", "500");
    map.insert("DEALWATCH_LOG_LEVEL", "debug");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.page_size, 120);
    assert_eq!(cfg.max_pages, 5);
    assert_eq!(cfg.request_delay_ms, 500);
    assert_eq!(cfg.log_level, "debug");
}

#[test]
fn invalid_page_size_is_rejected() {
    let mut map = HashMap::new();
    map.insert("DEALWATCH_PAGE_SIZE", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DEALWATCH_PAGE_SIZE"),
        "expected InvalidEnvVar(DEALWATCH_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn invalid_request_delay_is_rejected() {
    let mut map = HashMap::new();
    map.insert("DEALWATCH_REQUEST_DELAY_MS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DEALWATCH_REQUEST_DELAY_MS"),
        "expected InvalidEnvVar(DEALWATCH_REQUEST_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn replica_absent_without_endpoint() {
    let mut map = HashMap::new();
    // Bucket and token alone do not enable replication.
    map.insert("DEALWATCH_REPLICA_BUCKET", "snapshots");
    map.insert("DEALWATCH_REPLICA_TOKEN", "secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.replica.is_none());
}

#[test]
fn replica_endpoint_requires_bucket_and_token() {
    let mut map = HashMap::new();
    map.insert("DEALWATCH_REPLICA_ENDPOINT", "https://objects.example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "DEALWATCH_REPLICA_BUCKET"),
        "expected MissingEnvVar(DEALWATCH_REPLICA_BUCKET), got: {result:?}"
    );

    map.insert("DEALWATCH_REPLICA_BUCKET", "snapshots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "DEALWATCH_REPLICA_TOKEN"),
        "expected MissingEnvVar(DEALWATCH_REPLICA_TOKEN), got: {result:?}"
    );
}

#[test]
fn replica_object_key_defaults_to_deals_json() {
    let mut map = HashMap::new();
    map.insert("DEALWATCH_REPLICA_ENDPOINT", "https://objects.example.com");
    map.insert("DEALWATCH_REPLICA_BUCKET", "snapshots");
    map.insert("DEALWATCH_REPLICA_TOKEN", "secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let replica = cfg.replica.expect("replica config should be present");
    assert_eq!(replica.endpoint, "https://objects.example.com");
    assert_eq!(replica.bucket, "snapshots");
    assert_eq!(replica.object_key, "deals.json");
}

#[test]
fn replica_object_key_override() {
    let mut map = HashMap::new();
    map.insert("DEALWATCH_REPLICA_ENDPOINT", "https://objects.example.com");
    map.insert("DEALWATCH_REPLICA_BUCKET", "snapshots");
    map.insert("DEALWATCH_REPLICA_TOKEN", "secret");
    map.insert("DEALWATCH_REPLICA_OBJECT_KEY", "pet-deals/latest.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.replica.unwrap().object_key, "pet-deals/latest.json");
}

#[test]
fn debug_redacts_replica_token() {
    let mut map = HashMap::new();
    map.insert("DEALWATCH_REPLICA_ENDPOINT", "https://objects.example.com");
    map.insert("DEALWATCH_REPLICA_BUCKET", "snapshots");
    map.insert("DEALWATCH_REPLICA_TOKEN", "super-secret-token");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret-token"));
    assert!(rendered.contains("[redacted]"));
}
