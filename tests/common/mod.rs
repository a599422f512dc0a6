// tests/common/mod.rs

#![allow(dead_code)]

pub use konawatch_test_utils::init_tracing;
