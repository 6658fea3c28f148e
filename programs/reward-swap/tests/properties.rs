//! Property-based tests: randomized operation sequences against a live pool.

mod common;
mod property_tests;
