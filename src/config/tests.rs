//! 配置模块测试

use super::*;
use crate::error::ErrorKind;
use std::io::Write;

const SAMPLE_YAML: &str = r#"
logging:
  level: debug
consumer:
  interface: io.demo.OrderService
  aliases: [bj, sh, gz]
  timeout_ms: 3000
  failover:
    max_retry: 2
    retry_errors: [transport, overload]
  methods:
    create:
      timeout_ms: 800
      max_retry: 0
    query:
      only_once_per_node: true
      timeout_policy: reset
"#;

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_load_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "cluster.yaml", SAMPLE_YAML);

    let config = load_config(&path).unwrap();

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.consumer.interface, "io.demo.OrderService");
    assert_eq!(config.consumer.aliases, vec!["bj", "sh", "gz"]);
    assert_eq!(config.consumer.cluster, DEFAULT_CLUSTER);
    assert_eq!(config.consumer.timeout_ms, 3000);
    assert_eq!(config.consumer.failover.max_retry, 2);
    assert_eq!(
        config.consumer.failover.retry_errors,
        vec![ErrorKind::Transport, ErrorKind::Overload]
    );
    assert_eq!(config.consumer.failover.timeout_policy, DEFAULT_TIMEOUT_POLICY);
}

#[test]
fn test_load_json_config_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "cluster.json",
        r#"{"consumer": {"interface": "Echo", "aliases": ["a"]}}"#,
    );

    let config = load_config(&path).unwrap();

    assert_eq!(config.logging, LoggingConfig::default());
    assert_eq!(config.consumer.timeout_ms, DEFAULT_TIMEOUT_MS);
    assert_eq!(config.consumer.failover, FailoverConfig::default());
    assert!(!config.consumer.alias_adaptive);
    assert!(config.consumer.methods.is_empty());
}

#[test]
fn test_resolve_method_merges_overrides() {
    let config: ClusterConfig = serde_yaml::from_str(SAMPLE_YAML).unwrap();
    let consumer = &config.consumer;

    let (timeout_ms, failover) = consumer.resolve_method("create");
    assert_eq!(timeout_ms, 800);
    assert_eq!(failover.max_retry, 0);
    assert_eq!(failover.retry_errors, consumer.failover.retry_errors);

    let (timeout_ms, failover) = consumer.resolve_method("query");
    assert_eq!(timeout_ms, 3000);
    assert_eq!(failover.max_retry, 2);
    assert!(failover.only_once_per_node);
    assert_eq!(failover.timeout_policy, "reset");

    let (timeout_ms, failover) = consumer.resolve_method("unknown");
    assert_eq!(timeout_ms, 3000);
    assert_eq!(failover, consumer.failover);
}

#[test]
fn test_validate_rejects_empty_aliases() {
    let consumer = ConsumerConfig::new("Echo", vec![]);
    assert!(consumer.validate().is_err());
}

#[test]
fn test_validate_rejects_duplicate_aliases() {
    let consumer = ConsumerConfig::new("Echo", vec!["a".to_string(), "a".to_string()]);
    let err = consumer.validate().unwrap_err();
    assert!(err.contains("重复"));
}

#[test]
fn test_validate_rejects_zero_timeout() {
    let mut consumer = ConsumerConfig::new("Echo", vec!["a".to_string()]);
    consumer.timeout_ms = 0;
    assert!(consumer.validate().is_err());

    let mut consumer = ConsumerConfig::new("Echo", vec!["a".to_string()]);
    consumer.methods.insert(
        "echo".to_string(),
        MethodConfig {
            timeout_ms: Some(0),
            ..Default::default()
        },
    );
    assert!(consumer.validate().is_err());
}

#[test]
fn test_load_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "cluster.yml",
        "consumer:\n  interface: Echo\n  aliases: []\n",
    );

    match load_config(&path) {
        Err(ConfigError::Invalid(_)) => {}
        other => panic!("Expected Invalid error, got {:?}", other),
    }
}

#[test]
fn test_load_unsupported_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "cluster.toml", "consumer = 1");

    assert!(matches!(
        load_config(&path),
        Err(ConfigError::UnsupportedFormat(ext)) if ext == "toml"
    ));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_config(&dir.path().join("missing.yaml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_load_malformed_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "cluster.yaml", "consumer: [unclosed");
    assert!(matches!(load_config(&path), Err(ConfigError::Yaml(_))));
}

#[test]
fn test_default_config_path() {
    let path = default_config_path();
    assert!(path.ends_with("rpc-cluster/cluster.yaml"));
}
