//! Integration tests against a real SQLite store

pub mod cache_test;
pub mod coordinator_test;
pub mod outbox_test;
