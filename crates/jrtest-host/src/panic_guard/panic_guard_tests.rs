#![allow(non_snake_case)]

use super::*;

#[test]
fn catch_panic___successful_function___returns_ok() {
    let result = catch_panic(None, || 42);

    assert_eq!(result.unwrap(), 42);
}

#[test]
fn catch_panic___panicking_function___returns_internal() {
    let result: ServiceResult<()> = catch_panic(None, || {
        panic!("Test panic");
    });

    assert!(matches!(result, Err(ServiceError::Internal(_))));
}

#[test]
fn catch_panic___panic_with_string___includes_message() {
    let result: ServiceResult<()> = catch_panic(None, || {
        panic!("{} went wrong", "audit lookup");
    });

    let err = result.unwrap_err();
    assert!(err.to_string().contains("audit lookup went wrong"));
}

#[test]
fn catch_panic___panic_with_str___includes_message() {
    let result: ServiceResult<()> = catch_panic(None, || {
        panic!("static message");
    });

    assert!(result.unwrap_err().to_string().contains("static message"));
}

#[test]
fn catch_panic___unknown_payload___generic_message() {
    let result: ServiceResult<()> = catch_panic(None, || {
        std::panic::panic_any(17_u32);
    });

    assert!(result.unwrap_err().to_string().contains("unknown payload"));
}

#[test]
fn catch_panic___error_maps_to_500() {
    let result: ServiceResult<()> = catch_panic(None, || panic!("boom"));

    assert_eq!(result.unwrap_err().status_code(), 500);
}
