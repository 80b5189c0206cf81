//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::money::MoneyError;
use core_kernel::temporal::TemporalError;
use core_kernel::StorageBackend;

#[test]
fn test_wraps_money_error_transparently() {
    let money_error = MoneyError::UnknownCurrency("XXX".to_string());
    let core_error: CoreError = money_error.clone().into();

    assert!(matches!(core_error, CoreError::Money(MoneyError::UnknownCurrency(_))));
    assert_eq!(core_error.to_string(), money_error.to_string());
    assert!(!core_error.is_temporal());
}

#[test]
fn test_wraps_temporal_error() {
    let core_error: CoreError = TemporalError::InvalidMonth(13).into();

    assert!(core_error.is_temporal());
    assert!(core_error.to_string().contains("13"));
}

#[test]
fn test_unknown_storage_backend_names_input() {
    let err = "redis".parse::<StorageBackend>().unwrap_err();

    match &err {
        CoreError::UnknownVariant { kind, value, .. } => {
            assert_eq!(*kind, "storage backend");
            assert_eq!(value, "redis");
        }
        other => panic!("Expected UnknownVariant, got {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "unknown storage backend 'redis', expected 'memory' or 'postgres'"
    );
}
