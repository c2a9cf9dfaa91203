use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

#[test]
fn defaults_point_at_local_catalog() {
    let settings = Settings::default();
    assert_eq!(settings.base_url, "http://localhost:3000");
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn toml_values_override_defaults() {
    let mut settings = Settings::default();
    apply_toml(
        &mut settings,
        "base_url = \"http://cinema.test:8080\"\nlog_filter = \"debug\"\n",
    )
    .expect("parse");
    assert_eq!(settings.base_url, "http://cinema.test:8080");
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn toml_rejects_unknown_keys() {
    let mut settings = Settings::default();
    assert!(apply_toml(&mut settings, "server_bind = \"0.0.0.0\"\n").is_err());
}

#[test]
fn app_prefixed_env_wins_over_catalog_env() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("CATALOG_BASE_URL", "http://first.test"),
        ("APP__BASE_URL", "http://second.test"),
        ("APP__LOG_FILTER", "client_core=trace"),
    ]);
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, |key| env.get(key).map(|v| v.to_string()));
    assert_eq!(settings.base_url, "http://second.test");
    assert_eq!(settings.log_filter, "client_core=trace");
}

#[test]
fn base_url_requires_http_scheme_and_host() {
    assert!(parse_base_url("http://localhost:3000").is_ok());
    assert!(parse_base_url(" https://cinema.test/api/ ").is_ok());
    assert!(matches!(
        parse_base_url("ftp://cinema.test"),
        Err(ClientError::InvalidBaseUrl { .. })
    ));
    assert!(parse_base_url("localhost:3000").is_err());
    assert!(parse_base_url("http://cinema.test/?page=2").is_err());
}

#[test]
fn explicit_config_file_must_exist() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let missing = env::temp_dir().join(format!("box_office_missing_{suffix}.toml"));
    assert!(load_settings(Some(&missing)).is_err());
}

#[test]
fn loads_explicit_config_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("box_office_config_{suffix}.toml"));
    fs::write(&path, "log_filter = \"warn\"\n").expect("write config");

    let settings = load_settings(Some(&path)).expect("load");
    assert_eq!(settings.log_filter, "warn");

    fs::remove_file(path).expect("cleanup");
}
