//! Property-based tests for the outbox and drain cycle

pub mod outbox_proptest;
