//! Tests for the contract checks.

use thicket_common::contracts::{
    self, ContractViolation, MUST_BE_FALSE, MUST_BE_TRUE, MUST_NOT_BE_EMPTY, MUST_NOT_BE_NULL,
    MUST_NOT_CONTAIN_NULLS,
};

#[test]
fn test_not_null_passes_value_through() {
    assert_eq!(contracts::not_null(Some(7), MUST_NOT_BE_NULL), Ok(7));
}

#[test]
fn test_not_null_fails_on_none() {
    let err = contracts::not_null::<u8>(None, MUST_NOT_BE_NULL).unwrap_err();
    assert_eq!(err, ContractViolation::NullValue(MUST_NOT_BE_NULL.to_string()));
    assert_eq!(err.message(), "Object must not be null");
}

#[test]
fn test_is_true_and_is_false() {
    assert!(contracts::is_true(true, MUST_BE_TRUE).is_ok());
    assert!(contracts::is_false(false, MUST_BE_FALSE).is_ok());

    let err = contracts::is_true(false, "stack must hold html").unwrap_err();
    assert!(matches!(err, ContractViolation::ExpectedTrue(_)));
    assert_eq!(err.to_string(), "contract violated: stack must hold html");

    let err = contracts::is_false(true, MUST_BE_FALSE).unwrap_err();
    assert!(matches!(err, ContractViolation::ExpectedFalse(_)));
}

#[test]
fn test_no_null_elements_reports_first_gap() {
    assert!(contracts::no_null_elements(&[Some(1), Some(2)], MUST_NOT_CONTAIN_NULLS).is_ok());
    assert!(contracts::no_null_elements::<u8>(&[], MUST_NOT_CONTAIN_NULLS).is_ok());

    let err =
        contracts::no_null_elements(&[Some('a'), None, None], MUST_NOT_CONTAIN_NULLS).unwrap_err();
    assert_eq!(
        err,
        ContractViolation::NullElement {
            index: 1,
            message: MUST_NOT_CONTAIN_NULLS.to_string(),
        }
    );
    assert!(err.to_string().contains("index 1"));
}

#[test]
fn test_not_empty() {
    assert_eq!(contracts::not_empty(Some("p"), MUST_NOT_BE_EMPTY), Ok("p"));
    assert!(matches!(
        contracts::not_empty(Some(""), MUST_NOT_BE_EMPTY),
        Err(ContractViolation::EmptyString(_))
    ));
    assert!(matches!(
        contracts::not_empty(None, MUST_NOT_BE_EMPTY),
        Err(ContractViolation::EmptyString(_))
    ));
}

#[test]
fn test_unreachable_always_fails() {
    let result: Result<(), _> = contracts::unreachable("marker in reconstruct phase");
    let err = result.unwrap_err();
    assert_eq!(err.message(), "marker in reconstruct phase");
    assert_eq!(
        err.to_string(),
        "unreachable state: marker in reconstruct phase"
    );
}

#[test]
fn test_fail_is_distinct_from_unreachable() {
    let err = contracts::fail::<u8>("tokenizer ran past its input").unwrap_err();
    assert_eq!(
        err,
        ContractViolation::Failed("tokenizer ran past its input".to_string())
    );
    assert_eq!(err.message(), "tokenizer ran past its input");
    assert_eq!(
        err.to_string(),
        "contract violated: tokenizer ran past its input"
    );
}
