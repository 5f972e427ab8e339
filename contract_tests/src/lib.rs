//! # Wire Contract Tests
//!
//! This crate provides "golden" tests for the wire protocol to ensure
//! its message shapes don't drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: the wire contract is written as code
//! - **Testability first**: contract tests fail when a shape changes
//! - **Bit-exact**: a peer in any language parses these exact shapes
//!
//! The request shape is `{id, method, params?}`; a response is exactly
//! one of `{id, result}` or `{id, error}` per id.

pub mod messages;

/// Common helpers for wire-shape assertions.
pub mod test_helpers {
    use serde_json::Value;

    /// Asserts `value` is an object with exactly the given keys.
    pub fn verify_object_keys(value: &Value, expected: &[&str]) {
        let object = value.as_object().expect("wire message must be an object");
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        let mut expected: Vec<&str> = expected.to_vec();
        expected.sort_unstable();
        assert_eq!(
            keys, expected,
            "wire shape changed: expected keys {:?}, got {:?}",
            expected, keys
        );
    }

    /// Asserts the id field is a plain JSON integer.
    pub fn verify_integer_id(value: &Value, expected: u64) {
        let id = value
            .get("id")
            .expect("wire message must carry an id")
            .as_u64()
            .expect("id must be an integer");
        assert_eq!(id, expected);
    }
}
