//! Tests for error handling

use flock_config::ConfigError;
use std::io;
use std::path::PathBuf;

/// ConfigError::Io displays correctly
#[test]
fn test_io_error_display() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err = ConfigError::Io(io_err);

    let display = format!("{}", err);
    assert!(display.contains("CONFIG IO ERROR"));
    assert!(display.contains("file not found"));
}

/// ConfigError::Json displays correctly
#[test]
fn test_json_error_display() {
    let json_err: serde_json::Error =
        serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
    let err = ConfigError::Json(json_err);

    assert!(err.to_string().contains("CONFIG PARSE ERROR"));
}

/// ConfigError::NotFound displays the path
#[test]
fn test_not_found_error_display() {
    let err = ConfigError::NotFound(PathBuf::from("/some/path"));

    let display = format!("{}", err);
    assert!(display.contains("CONFIG NOT FOUND"));
    assert!(display.contains("/some/path"));
}

/// ConfigError::Io from io::Error conversion
#[test]
fn test_io_error_from() {
    let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "no permission");
    let err: ConfigError = io_err.into();

    match err {
        ConfigError::Io(_) => (),
        _ => panic!("Expected Io variant"),
    }
}

/// ConfigError implements std::error::Error
#[test]
fn test_error_trait() {
    fn check_error_trait<T: std::error::Error>() {}
    check_error_trait::<ConfigError>();
}
