use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn layer_with(size: usize, workers: usize) -> ConfigLayer {
    ConfigLayer {
        size: Some(size),
        workers: Some(workers),
        seed: Some(1),
        ..Default::default()
    }
}

#[test]
fn test_defaults_use_maxima() {
    let config = RunConfig::resolve(ConfigLayer::default()).unwrap();

    assert_eq!(config.size, DEFAULT_MAX_SIZE);
    assert_eq!(config.workers, DEFAULT_MAX_WORKERS);
    assert_eq!(config.value_range(), 0..=98);
    assert_eq!(config.strategy, SyncStrategy::Join);
    assert_eq!(config.format, ReportFormat::Text);
    assert!(!config.print_grid);
}

#[test]
fn test_requests_within_bounds_are_kept() {
    let config = RunConfig::resolve(layer_with(500, 4)).unwrap();
    assert_eq!(config.size, 500);
    assert_eq!(config.workers, 4);
    assert_eq!(config.seed, 1);
}

#[test]
fn test_requests_above_maxima_are_clamped() {
    let config = RunConfig::resolve(layer_with(20_000, 64)).unwrap();
    assert_eq!(config.size, DEFAULT_MAX_SIZE);
    assert_eq!(config.workers, DEFAULT_MAX_WORKERS);
}

#[test]
fn test_custom_maxima_clamp() {
    let layer = ConfigLayer {
        max_size: Some(8),
        max_workers: Some(3),
        ..layer_with(100, 100)
    };

    let config = RunConfig::resolve(layer).unwrap();

    assert_eq!(config.size, 8);
    assert_eq!(config.workers, 3);
}

#[test]
fn test_zero_size_rejected() {
    let err = RunConfig::resolve(layer_with(0, 2)).unwrap_err();
    assert!(err.is_configuration_error());
    assert!(err.to_string().contains("size"));
}

#[test]
fn test_zero_workers_rejected() {
    let err = RunConfig::resolve(layer_with(4, 0)).unwrap_err();
    assert!(err.to_string().contains("workers"));
}

#[test]
fn test_max_size_above_hard_limit_rejected() {
    let layer = ConfigLayer {
        max_size: Some(HARD_MAX_SIZE + 1),
        ..Default::default()
    };
    let err = RunConfig::resolve(layer).unwrap_err();
    assert!(err.to_string().contains("max_size"));
}

#[test]
fn test_inverted_value_range_rejected() {
    let layer = ConfigLayer {
        min_value: Some(10),
        max_value: Some(-10),
        ..layer_with(4, 2)
    };
    assert!(RunConfig::resolve(layer).is_err());
}

#[test]
fn test_merge_prefers_overrides() {
    let file = ConfigLayer {
        size: Some(100),
        workers: Some(4),
        strategy: Some(SyncStrategy::Barrier),
        ..Default::default()
    };
    let cli = ConfigLayer {
        workers: Some(8),
        ..Default::default()
    };

    let merged = file.merge(cli);

    assert_eq!(merged.size, Some(100));
    assert_eq!(merged.workers, Some(8));
    assert_eq!(merged.strategy, Some(SyncStrategy::Barrier));
}

#[test]
fn test_load_from_toml() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
size = 64
workers = 4
min_value = -5
max_value = 5
seed = 99
strategy = "barrier"
format = "json-pretty"
print_grid = true
"#
    )
    .unwrap();

    let layer = ConfigLayer::load(file.path()).unwrap();
    let config = RunConfig::resolve(layer).unwrap();

    assert_eq!(config.size, 64);
    assert_eq!(config.workers, 4);
    assert_eq!(config.value_range(), -5..=5);
    assert_eq!(config.seed, 99);
    assert_eq!(config.strategy, SyncStrategy::Barrier);
    assert_eq!(config.format, ReportFormat::JsonPretty);
    assert!(config.print_grid);
}

#[test]
fn test_load_rejects_unknown_keys() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "sizee = 4").unwrap();

    let err = ConfigLayer::load(file.path()).unwrap_err();
    assert!(matches!(err, MatrixSumError::ConfigParse { .. }));
}

#[test]
fn test_load_missing_file() {
    let err = ConfigLayer::load(Path::new("/nonexistent/matrix-sum.toml")).unwrap_err();
    assert!(matches!(err, MatrixSumError::ConfigRead { .. }));
    assert!(err.is_configuration_error());
}
