//! Error code and message tests.

use basket_core::errors::error_code;
use basket_core::{AnalysisError, BasketErrorCode, ConfigError, ExportError, ParseError};

#[test]
fn every_parse_error_has_a_distinct_code() {
    let errors = [
        ParseError::EmptyInput,
        ParseError::Unreadable {
            message: "x".into(),
        },
        ParseError::MissingColumn {
            column: "item".into(),
            available: "a, b".into(),
        },
        ParseError::InvalidOption {
            message: "x".into(),
        },
        ParseError::NoTransactions {
            rows_read: 3,
            rows_skipped: 3,
        },
    ];
    let mut codes: Vec<&str> = errors.iter().map(|e| e.error_code()).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), errors.len());
    assert!(codes.iter().all(|c| c.starts_with("PARSE_")));
}

#[test]
fn analysis_errors_forward_parse_codes() {
    let err = AnalysisError::from(ParseError::EmptyInput);
    assert_eq!(err.error_code(), error_code::PARSE_EMPTY_INPUT);
    assert_eq!(err.to_string(), ParseError::EmptyInput.to_string());
}

#[test]
fn coded_message_prefixes_the_code() {
    let err = AnalysisError::invalid_parameter("min_support", 1.5, "in (0, 1]");
    assert_eq!(
        err.coded_message(),
        "[INVALID_PARAMETER] Invalid parameter min_support = 1.5: must be in (0, 1]"
    );
}

#[test]
fn retryability_follows_the_taxonomy() {
    assert!(AnalysisError::cancelled("counting(k=2)").is_retryable());
    assert!(AnalysisError::ResourceExhausted {
        level: 3,
        count: 10,
        limit: 5
    }
    .is_retryable());
    assert!(!AnalysisError::from(ParseError::EmptyInput).is_retryable());
    assert!(!AnalysisError::invalid_parameter("top_n", 0, ">= 1").is_retryable());
}

#[test]
fn resource_exhaustion_suggests_raising_support() {
    let err = AnalysisError::ResourceExhausted {
        level: 4,
        count: 2_000_000,
        limit: 1_000_000,
    };
    assert!(err.to_string().contains("raise min_support"));
    assert_eq!(err.error_code(), "RESOURCE_EXHAUSTED");
}

#[test]
fn config_and_export_errors_have_codes() {
    let config = ConfigError::InvalidEnvVar {
        key: "BASKET_MINING_TOP_N".into(),
        value: "lots".into(),
    };
    assert_eq!(config.error_code(), error_code::CONFIG_ERROR);
    assert!(config.coded_message().contains("BASKET_MINING_TOP_N"));

    let export = ExportError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
    assert_eq!(export.error_code(), error_code::EXPORT_ERROR);
}
