//! Test suite for the front-desk sync engine
//!
//! This module organizes all tests

pub mod common;
pub mod integration;
pub mod property;
