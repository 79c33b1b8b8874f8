//! Input validation for explain-bridge

pub mod path_validation;

pub use path_validation::validate_path;
