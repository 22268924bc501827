//! Tests for label parsing and the persisted annotation store.

mod store_tests;
