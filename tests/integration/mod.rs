// Integration test modules
pub mod config_tests;
pub mod end_to_end_tests;
pub mod explanation_service_tests;

// Test utilities
#[path = "../common/mod.rs"]
pub mod common;
