use insertbench::AppConfig;
use std::time::Duration;

#[test]
fn test_file_layer_overrides_environment() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.bench.json"),
        r#"{
            "APP_DB_HOST": "db.internal",
            "APP_DB_USER": "bench",
            "APP_DB_PORT": "3310",
            "APP_DB_MAX_OPEN_CONNECTIONS": "4",
            "APP_DB_CONNECT_TIMEOUT_MS": "250"
        }"#,
    )
    .unwrap();

    let config = AppConfig::load(Some(dir.path()), "bench").unwrap();
    assert_eq!(config.db_host, "db.internal");
    assert_eq!(config.db_port, 3310);

    let conn = config.connection_config().with_defaults();
    assert_eq!(conn.max_open_connections, 4);
    assert_eq!(conn.connect_timeout, Duration::from_millis(250));
    assert_eq!(conn.data_source_name(), format!("mysql://bench:{}@db.internal:3310/{}", config.db_pass, config.db_name));
}

#[test]
fn test_invalid_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.broken.json"), "not json").unwrap();

    let err = AppConfig::load(Some(dir.path()), "broken").unwrap_err();
    assert!(err.to_string().contains("config.broken.json"));
}
