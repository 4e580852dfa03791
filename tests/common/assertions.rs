//! Custom assertion macros and utilities
//!
//! Assertions that print the response body on failure, which is most of
//! what you need to debug an HTTP test.

/// Assert the status of a `(StatusCode, Value)` response and return the body
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $expected:expr) => {{
        let (status, body) = $response;
        assert_eq!(status, $expected, "unexpected status, body: {}", body);
        body
    }};
}

/// Assert an error response: status plus a substring of the `error` field
#[macro_export]
macro_rules! assert_error {
    ($response:expr, $expected:expr, $needle:expr) => {{
        let (status, body) = $response;
        assert_eq!(status, $expected, "unexpected status, body: {}", body);
        let message = body["error"].as_str().unwrap_or_default().to_string();
        assert!(
            message.contains($needle),
            "Expected error '{}' to contain '{}'",
            message,
            $needle
        );
        assert_eq!(body["status"], $expected.as_u16());
    }};
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}
