//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error bodies carry a single `error` message
//! - Engine failures surface as the right variant

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use restdb::prelude::*;

fn engine_store() -> Store {
    Store::from_value(json!({
        "users": [{"id": 1, "name": "Ann", "bookmarks": []}]
    }))
    .unwrap()
}

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_resource_not_found_returns_404() {
        let err = EngineError::resource_not_found("widgets");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "RESOURCE_NOT_FOUND");
    }

    #[test]
    fn test_record_not_found_returns_404() {
        let err = EngineError::record_not_found("users", "999");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "RECORD_NOT_FOUND");
    }

    #[test]
    fn test_invalid_method_returns_405() {
        let err = Action::from_method(&Method::TRACE).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_malformed_input_returns_400() {
        let err = EngineError::malformed("body must be an object");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_error_returns_500() {
        let err: EngineError = StorageError::Lock("poisoned".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// =============================================================================
// Engine Error Tests
// =============================================================================

mod engine_error_tests {
    use super::*;

    #[test]
    fn test_unknown_resource() {
        let engine = QueryEngine::default();
        let mut store = engine_store();

        let err = engine
            .execute(
                &mut store,
                Request::read(Target::collection("widgets"), QueryParams::new()),
                &TimestampIdGenerator::new(),
            )
            .unwrap_err();

        assert!(matches!(err, EngineError::ResourceNotFound { resource } if resource == "widgets"));
    }

    #[test]
    fn test_missing_record_on_each_write() {
        let engine = QueryEngine::default();
        let ids = TimestampIdGenerator::new();

        for action in [Action::Replace, Action::Merge, Action::Delete] {
            let mut store = engine_store();
            let err = engine
                .execute(
                    &mut store,
                    Request::write(action, Target::record("users", "999"), json!({})),
                    &ids,
                )
                .unwrap_err();

            assert!(
                matches!(&err, EngineError::RecordNotFound { id, .. } if id == "999"),
                "{:?} gave {:?}",
                action,
                err
            );
            assert_eq!(store, engine_store());
        }
    }

    #[test]
    fn test_nested_lookup_on_missing_parent() {
        let engine = QueryEngine::default();
        let mut store = engine_store();

        let err = engine
            .execute(
                &mut store,
                Request::read(
                    Target::nested("users", "42", "bookmarks"),
                    QueryParams::new(),
                ),
                &TimestampIdGenerator::new(),
            )
            .unwrap_err();

        assert!(matches!(err, EngineError::RecordNotFound { .. }));
    }

    #[test]
    fn test_non_object_payload() {
        let engine = QueryEngine::default();
        let mut store = engine_store();

        let err = engine
            .execute(
                &mut store,
                Request::write(Action::Create, Target::collection("users"), json!("text")),
                &TimestampIdGenerator::new(),
            )
            .unwrap_err();

        assert!(matches!(err, EngineError::MalformedInput { .. }));
    }
}

// =============================================================================
// IntoResponse Tests
// =============================================================================

mod into_response_tests {
    use super::*;

    #[test]
    fn test_not_found_into_response_status() {
        let response = EngineError::record_not_found("users", "7").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_into_response_status() {
        let response = EngineError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_value(EngineError::resource_not_found("widgets").to_response())
            .unwrap();
        assert_eq!(body, json!({"error": "Resource 'widgets' not found"}));
    }
}
